//! Generative-text collaborator
//!
//! The batch only needs one operation from a language model: turn a prompt
//! into a short plain-text message. Length limits are requested in the
//! prompt and enforced by the provider, not checked here.

use crate::Result;

/// A provider that turns a prompt into message text
pub trait TextGenerator {
    /// Provider name for logs
    fn name(&self) -> &'static str;

    /// Generate message text for a prompt
    fn generate(&self, prompt: &str) -> Result<String>;
}

/// Prompt asking for a short spoken message for one contact
pub fn build_prompt(name: &str, topic: &str) -> String {
    format!(
        "Create a SHORT voice message under 15 seconds.\n\
         Include the name: {}\n\
         Topic: {}\n\
         \n\
         Output ONLY the message text, no formatting.",
        name, topic
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_name_and_topic() {
        let prompt = build_prompt("Ann", "webinar reminder");
        assert!(prompt.contains("Include the name: Ann"));
        assert!(prompt.contains("Topic: webinar reminder"));
        assert!(prompt.contains("no formatting"));
    }
}
