//! Output file naming
//!
//! Output files are keyed by the contact's email address. These helpers turn
//! an address into something every common filesystem accepts.
//!
//! Collision-freedom is best effort only: `a.b@x.com` and `a_b@x.com` map to
//! the same name.

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters that are unsafe in file names on at least one platform
pub const BLOCKED_CHARS: [char; 12] = ['@', '.', ' ', '/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Replacement for every blocked character
pub const PLACEHOLDER: char = '_';

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w.-]+@[\w.-]+").expect("email pattern is valid"));

static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("word pattern is valid"));

/// Replace each blocked character with the placeholder
///
/// Idempotent since the placeholder itself is never blocked.
pub fn sanitize(email: &str) -> String {
    email
        .chars()
        .map(|c| if BLOCKED_CHARS.contains(&c) { PLACEHOLDER } else { c })
        .collect()
}

/// Replace everything outside `[A-Za-z0-9_]` with the placeholder
pub fn sanitize_strict(text: &str) -> String {
    NON_WORD.replace_all(text, "_").into_owned()
}

/// First email-looking token in free text
pub fn find_email(text: &str) -> Option<&str> {
    EMAIL_PATTERN.find(text).map(|m| m.as_str())
}
