//! Batch message-to-speech runner
//!
//! Processes contacts one at a time. Every failure is caught at the record
//! boundary and turned into a [`RecordOutcome`]; one bad record never stops
//! the rest of the batch.

use super::input::BatchRecord;
use super::report::{BatchReport, RecordOutcome};
use crate::message::{build_prompt, MessageTemplate, TextGenerator};
use crate::sanitize::sanitize;
use crate::speech::{Synth, VoiceConfig};
use crate::{Result, VoiceBatchError};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Where message text comes from
#[derive(Debug, Clone)]
pub enum MessageMode {
    /// Ask the generative-text provider for a message on this topic
    AiGenerated { topic: String },
    /// Fill the contact into a fixed template
    TemplateFilled(MessageTemplate),
}

impl MessageMode {
    pub fn is_ai(&self) -> bool {
        matches!(self, MessageMode::AiGenerated { .. })
    }
}

/// Output directories for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub audio_dir: PathBuf,
    pub text_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(audio_dir: impl Into<PathBuf>, text_dir: impl Into<PathBuf>) -> Self {
        Self {
            audio_dir: audio_dir.into(),
            text_dir: text_dir.into(),
        }
    }

    /// Create the output directories
    pub fn prepare(&self, with_text: bool) -> Result<()> {
        fs::create_dir_all(&self.audio_dir)?;
        if with_text {
            fs::create_dir_all(&self.text_dir)?;
        }
        Ok(())
    }

    pub fn audio_path(&self, email: &str) -> PathBuf {
        self.audio_dir.join(format!("{}.mp3", sanitize(email)))
    }

    pub fn text_path(&self, email: &str) -> PathBuf {
        self.text_dir.join(format!("{}.txt", sanitize(email)))
    }
}

/// Runs a batch against a synthesizer and, in AI mode, a text generator
pub struct BatchMessenger<'a> {
    synth: &'a mut dyn Synth,
    generator: Option<&'a dyn TextGenerator>,
    voice: VoiceConfig,
    layout: OutputLayout,
    delay: Duration,
}

impl<'a> BatchMessenger<'a> {
    pub fn new(synth: &'a mut dyn Synth, voice: VoiceConfig, layout: OutputLayout) -> Self {
        Self {
            synth,
            generator: None,
            voice,
            layout,
            delay: Duration::from_secs(1),
        }
    }

    /// Text generator used in AI mode
    pub fn with_generator(mut self, generator: &'a dyn TextGenerator) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Pause after each attempted record
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Process every record in input order
    pub fn run(&mut self, records: &[BatchRecord], mode: &MessageMode) -> BatchReport {
        let mut report = BatchReport::new(records.len());
        let mut done = 0;

        info!(
            "Starting batch of {} rows ({} mode)",
            records.len(),
            if mode.is_ai() { "AI" } else { "template" }
        );

        for record in records {
            if !record.is_complete() {
                println!("Skipping incomplete row {}: {:?}", record.row, record);
                report.record(RecordOutcome::SkippedIncomplete { row: record.row });
                continue;
            }

            done += 1;
            println!("\n[{}/{}] Processing {}...", done, records.len(), record.email);

            let outcome = self.process(record, mode);
            log_outcome(&outcome);
            report.record(outcome);

            if !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
        }

        info!("Batch finished: {}", report);
        report
    }

    fn process(&mut self, record: &BatchRecord, mode: &MessageMode) -> RecordOutcome {
        let email = record.email.clone();

        let message = match self.compose(record, mode) {
            Ok(message) => message,
            Err(e) => {
                return RecordOutcome::MessageGenerationFailed {
                    email,
                    error: e.to_string(),
                }
            }
        };
        println!("Message: {}", message);

        // A failed text copy does not block the audio
        let text_path = if mode.is_ai() {
            let path = self.layout.text_path(&email);
            match write_file(&path, message.as_bytes()) {
                Ok(()) => {
                    println!("AI message saved to: {}", path.display());
                    println!("Copy this message into the manualMessage setting to reuse it");
                    Some(path)
                }
                Err(e) => {
                    println!("Could not save AI message: {}", e);
                    warn!("Could not write message text for {}: {}", email, e);
                    None
                }
            }
        } else {
            None
        };

        let audio = match self.synth.synthesize(&message, &self.voice) {
            Ok(audio) => audio,
            Err(e) => {
                return RecordOutcome::AudioGenerationFailed {
                    email,
                    message,
                    error: e.to_string(),
                }
            }
        };

        let audio_path = self.layout.audio_path(&email);
        if let Err(e) = write_file(&audio_path, &audio) {
            return RecordOutcome::PersistenceFailed {
                email,
                message,
                error: e.to_string(),
            };
        }

        RecordOutcome::Success {
            email,
            message,
            audio_path,
            text_path,
        }
    }

    fn compose(&self, record: &BatchRecord, mode: &MessageMode) -> Result<String> {
        match mode {
            MessageMode::TemplateFilled(template) => Ok(template.render(&record.name, &record.email)),
            MessageMode::AiGenerated { topic } => {
                let generator = self.generator.ok_or_else(|| {
                    VoiceBatchError::Generation("no text generator configured".to_string())
                })?;
                debug!("Generating message for row {} via {}", record.row, generator.name());
                generator.generate(&build_prompt(&record.name, topic))
            }
        }
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents)?;
    Ok(())
}

fn log_outcome(outcome: &RecordOutcome) {
    match outcome {
        RecordOutcome::Success { audio_path, .. } => {
            println!("Audio saved: {}", audio_path.display());
        }
        RecordOutcome::MessageGenerationFailed { email, error } => {
            println!("Message creation error: {}", error);
            warn!("Message generation failed for {}: {}", email, error);
        }
        RecordOutcome::AudioGenerationFailed { email, error, .. } => {
            println!("TTS error: {}", error);
            warn!("Speech synthesis failed for {}: {}", email, error);
        }
        RecordOutcome::PersistenceFailed { email, error, .. } => {
            println!("Write error: {}", error);
            warn!("Could not write output for {}: {}", email, error);
        }
        RecordOutcome::SkippedIncomplete { .. } => {}
    }
}
