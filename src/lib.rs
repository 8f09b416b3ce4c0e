//! voicebatch - License-gated batch text-to-speech
//!
//! Reads a contact list, composes a short message per contact (from a fixed
//! template or a generative-text provider), converts it to speech through a
//! cloud TTS provider and writes one audio file per contact.

pub mod batch;
pub mod config;
pub mod error;
pub mod license;
pub mod message;
pub mod platform;
pub mod sanitize;
pub mod speak;
pub mod speech;

pub use error::{Result, VoiceBatchError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
