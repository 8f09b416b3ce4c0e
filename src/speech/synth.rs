//! Speech synthesizer abstraction
//!
//! Provides a unified interface over cloud text-to-speech providers.
//! The batch hands each composed message to a synthesizer and writes the
//! returned audio bytes to disk.

use crate::config::{SpeechConfig, SpeechProvider};
use crate::Result;
use log::info;

/// Voice parameters passed with every synthesis request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceConfig {
    /// Language code (keyless provider)
    pub language: String,
    /// Provider voice identifier
    pub voice_id: Option<String>,
    /// Provider model identifier
    pub model_id: Option<String>,
    /// Provider output format
    pub output_format: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            voice_id: None,
            model_id: None,
            output_format: "mp3_44100_128".to_string(),
        }
    }
}

impl From<&SpeechConfig> for VoiceConfig {
    fn from(config: &SpeechConfig) -> Self {
        Self {
            language: config.language.clone(),
            voice_id: config.voice_id.clone(),
            model_id: config.model_id.clone(),
            output_format: config.output_format.clone(),
        }
    }
}

/// Speech synthesizer trait
///
/// All backends implement this to turn message text into encoded audio.
pub trait Synth {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Convert text to audio bytes (MP3)
    fn synthesize(&mut self, text: &str, voice: &VoiceConfig) -> Result<Vec<u8>>;
}

/// Create the synthesizer selected in the configuration
pub fn create_synth(config: &SpeechConfig) -> Result<Box<dyn Synth>> {
    match config.provider {
        SpeechProvider::GoogleTranslate => {
            use super::backends::google_translate::GoogleTranslateSynth;

            let synth = GoogleTranslateSynth::new(
                config
                    .base_url
                    .as_deref()
                    .unwrap_or(super::backends::google_translate::DEFAULT_BASE_URL),
                config.timeout(),
            )?;
            info!("Using Google Translate speech backend");
            Ok(Box::new(synth))
        }
        SpeechProvider::ElevenLabs => {
            use super::backends::elevenlabs::ElevenLabsSynth;

            let synth = ElevenLabsSynth::new(
                config.api_key.as_deref().unwrap_or(""),
                config
                    .base_url
                    .as_deref()
                    .unwrap_or(super::backends::elevenlabs::DEFAULT_BASE_URL),
                config.timeout(),
            )?;
            info!("Using ElevenLabs speech backend");
            Ok(Box::new(synth))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_from_config() {
        let config = SpeechConfig {
            voice_id: Some("v1".into()),
            language: "de".into(),
            ..SpeechConfig::default()
        };
        let voice = VoiceConfig::from(&config);
        assert_eq!(voice.voice_id.as_deref(), Some("v1"));
        assert_eq!(voice.language, "de");
    }

    #[test]
    fn test_create_default_synth() {
        let synth = create_synth(&SpeechConfig::default()).unwrap();
        assert_eq!(synth.name(), "google_translate");
    }

    #[test]
    fn test_elevenlabs_requires_key() {
        let config = SpeechConfig {
            provider: SpeechProvider::ElevenLabs,
            ..SpeechConfig::default()
        };
        assert!(create_synth(&config).is_err());
    }
}
