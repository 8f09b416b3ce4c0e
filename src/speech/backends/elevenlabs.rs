//! ElevenLabs speech backend

use crate::speech::{Synth, VoiceConfig};
use crate::{Result, VoiceBatchError};
use log::{debug, error};
use reqwest::blocking::Client;
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";
pub const DEFAULT_MODEL: &str = "eleven_multilingual_v2";

pub struct ElevenLabsSynth {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ElevenLabsSynth {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(VoiceBatchError::Config(
                "speech.apiKey is required for the ElevenLabs backend".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VoiceBatchError::Speech(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
        })
    }
}

impl Synth for ElevenLabsSynth {
    fn name(&self) -> &'static str {
        "elevenlabs"
    }

    fn synthesize(&mut self, text: &str, voice: &VoiceConfig) -> Result<Vec<u8>> {
        if text.trim().is_empty() {
            return Err(VoiceBatchError::Speech("no text to speak".to_string()));
        }
        let voice_id = voice
            .voice_id
            .as_deref()
            .ok_or_else(|| VoiceBatchError::Config("speech.voiceId is required".to_string()))?;
        let model_id = voice.model_id.as_deref().unwrap_or(DEFAULT_MODEL);

        debug!("Synthesizing {} chars with voice {}", text.len(), voice_id);

        let url = format!("{}/v1/text-to-speech/{}", self.base_url, voice_id);
        let response = self
            .client
            .post(url)
            .query(&[("output_format", voice.output_format.as_str())])
            .header("xi-api-key", &self.api_key)
            .header("Accept", "audio/mpeg")
            .json(&json!({ "text": text, "model_id": model_id }))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            error!("ElevenLabs returned HTTP {}", status);
            return Err(VoiceBatchError::provider(status.as_u16(), &body));
        }

        Ok(response.bytes()?.to_vec())
    }
}
