//! Message composition: fixed templates and generated text

pub mod gemini;
pub mod generator;
pub mod template;

pub use gemini::GeminiGenerator;
pub use generator::{build_prompt, TextGenerator};
pub use template::{MessageTemplate, TemplateError};
