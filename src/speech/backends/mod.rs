//! Cloud speech backends

// Keyless Google Translate endpoint (default)
pub mod google_translate;

// ElevenLabs API, requires a key and voice id
pub mod elevenlabs;
