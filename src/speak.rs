//! Single message to speech
//!
//! Converts one configured text into one audio file. The file is named after
//! the first email address in the text, or `output_audio` when there is none.

use crate::sanitize::{find_email, sanitize_strict};
use crate::speech::{Synth, VoiceConfig};
use crate::{Result, VoiceBatchError};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// File stem used when the text contains no email address
pub const FALLBACK_STEM: &str = "output_audio";

/// Output file stem for a message
pub fn output_stem(text: &str) -> String {
    find_email(text)
        .map(sanitize_strict)
        .unwrap_or_else(|| FALLBACK_STEM.to_string())
}

/// Synthesize `text` and write it to `<out_dir>/<stem>.mp3`
pub fn speak_to_file(
    synth: &mut dyn Synth,
    voice: &VoiceConfig,
    text: &str,
    out_dir: &Path,
) -> Result<PathBuf> {
    let text = text.trim();
    if text.is_empty() {
        return Err(VoiceBatchError::Config(
            "no text to speak (set `text` in the configuration or pass --text)".to_string(),
        ));
    }

    let audio = synth.synthesize(text, voice)?;

    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(format!("{}.mp3", output_stem(text)));
    fs::write(&path, &audio)?;

    info!("Wrote {} bytes of audio to {}", audio.len(), path.display());
    Ok(path)
}
