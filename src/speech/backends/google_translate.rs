//! Keyless Google Translate speech backend
//!
//! Uses the public `translate_tts` endpoint. Each request carries at most
//! [`MAX_CHUNK_CHARS`] characters; the MP3 segments returned for each chunk
//! are concatenated into one stream, which players handle as a single file.

use crate::speech::chunk::{split_for_speech, MAX_CHUNK_CHARS};
use crate::speech::{Synth, VoiceConfig};
use crate::{Result, VoiceBatchError};
use log::{debug, error};
use reqwest::blocking::Client;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://translate.google.com";

const USER_AGENT: &str = "Mozilla/5.0 (compatible; voicebatch)";

pub struct GoogleTranslateSynth {
    client: Client,
    base_url: String,
}

impl GoogleTranslateSynth {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| VoiceBatchError::Speech(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn fetch_chunk(&self, chunk: &str, idx: usize, total: usize, language: &str) -> Result<Vec<u8>> {
        let url = format!("{}/translate_tts", self.base_url);
        let total = total.to_string();
        let idx = idx.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = self
            .client
            .get(url)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language),
                ("q", chunk),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            error!("translate_tts returned HTTP {}", status);
            return Err(VoiceBatchError::provider(status.as_u16(), &body));
        }

        Ok(response.bytes()?.to_vec())
    }
}

impl Synth for GoogleTranslateSynth {
    fn name(&self) -> &'static str {
        "google_translate"
    }

    fn synthesize(&mut self, text: &str, voice: &VoiceConfig) -> Result<Vec<u8>> {
        let chunks = split_for_speech(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(VoiceBatchError::Speech("no text to speak".to_string()));
        }

        debug!("Synthesizing {} chunk(s) in {}", chunks.len(), voice.language);

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            audio.extend(self.fetch_chunk(chunk, idx, chunks.len(), &voice.language)?);
        }
        Ok(audio)
    }
}
