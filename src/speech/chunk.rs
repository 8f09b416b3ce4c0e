//! Splitting text into request-sized pieces
//!
//! The keyless speech endpoint rejects long inputs, so messages are cut on
//! word boundaries and the resulting audio segments are concatenated.

/// Longest piece the keyless endpoint accepts, in characters
pub const MAX_CHUNK_CHARS: usize = 100;

/// Split text into chunks of at most `max_chars` characters
///
/// Words are never split unless a single word is longer than the limit.
/// Whitespace between words collapses to a single space.
pub fn split_for_speech(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
