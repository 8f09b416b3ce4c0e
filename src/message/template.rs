//! Fixed message templates with `{name}` and `{email}` placeholders
//!
//! Templates are parsed once at startup so a broken template fails before
//! any record is processed. `{{` and `}}` produce literal braces.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template is empty")]
    Empty,

    #[error("unknown placeholder {{{0}}} (supported: {{name}}, {{email}})")]
    UnknownPlaceholder(String),

    #[error("unclosed '{{' at byte {0}")]
    Unclosed(usize),

    #[error("stray '}}' at byte {0} (use '}}}}' for a literal brace)")]
    StrayClose(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Name,
    Email,
}

/// A parsed message template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    segments: Vec<Segment>,
}

impl MessageTemplate {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        if source.trim().is_empty() {
            return Err(TemplateError::Empty);
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, ch)) = chars.next() {
            match ch {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut key = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        key.push(c);
                    }
                    if !closed {
                        return Err(TemplateError::Unclosed(pos));
                    }

                    let segment = match key.trim() {
                        "name" => Segment::Name,
                        "email" => Segment::Email,
                        _ => return Err(TemplateError::UnknownPlaceholder(key)),
                    };
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(segment);
                }
                '}' => return Err(TemplateError::StrayClose(pos)),
                _ => literal.push(ch),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Substitute a contact into the template
    pub fn render(&self, name: &str, email: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Name => out.push_str(name),
                Segment::Email => out.push_str(email),
            }
        }
        out
    }
}
