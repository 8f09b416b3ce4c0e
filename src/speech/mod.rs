//! Speech synthesis system

pub mod backends;
pub mod chunk;
pub mod synth;

pub use chunk::split_for_speech;
pub use synth::{create_synth, Synth, VoiceConfig};
