//! Utilities for extracting structured data from generation output.
//!
//! The capability is not format-guaranteed: payloads arrive as bare JSON,
//! JSON wrapped in markdown code fences, or JSON embedded in explanatory
//! prose. Extraction tries the fence first, then the first balanced object
//! or array in the text.

use fabula_error::{ValidationError, ValidationErrorKind};

/// Extract a structured payload from raw generation output.
///
/// Strategies, in order:
/// 1. Markdown code fence: ` ```json ... ``` ` (or an unlabeled fence)
/// 2. First balanced `{ ... }` or `[ ... ]`, whichever opens earlier
///
/// # Errors
///
/// Fails when no candidate payload is present in the output.
///
/// # Examples
///
/// ```
/// let raw = "Here you go:\n```json\n{\"title\": \"T\"}\n```\n";
/// let payload = fabula_agent::extract_structured(raw).unwrap();
/// assert_eq!(payload, "{\"title\": \"T\"}");
/// ```
pub fn extract_structured(raw: &str) -> Result<String, ValidationError> {
    if let Some(payload) = from_code_fence(raw) {
        return Ok(payload);
    }

    let object = raw.find('{');
    let array = raw.find('[');
    let candidates: &[(char, char)] = match (object, array) {
        (Some(o), Some(a)) if a < o => &[('[', ']'), ('{', '}')],
        (None, Some(_)) => &[('[', ']')],
        (Some(_), _) => &[('{', '}'), ('[', ']')],
        (None, None) => &[],
    };

    for (open, close) in candidates {
        if let Some(payload) = balanced(raw, *open, *close) {
            return Ok(payload);
        }
    }

    Err(ValidationError::new(ValidationErrorKind::NoPayload(format!(
        "no JSON object, array, or code fence in {} bytes of output",
        raw.len()
    ))))
}

/// Pull the body out of a markdown code fence.
///
/// A missing closing fence (truncated response) yields everything after the
/// opening fence.
fn from_code_fence(raw: &str) -> Option<String> {
    let start = raw.find("```")?;
    let after_fence = &raw[start + 3..];

    // skip a language tag if the fence has one
    let body_start = after_fence
        .find('\n')
        .map(|n| n + 1)
        .filter(|_| {
            after_fence
                .lines()
                .next()
                .is_some_and(|tag| tag.trim().chars().all(|c| c.is_ascii_alphanumeric()))
        })
        .unwrap_or(0);

    let body = &after_fence[body_start..];
    match body.find("```") {
        Some(end) => Some(body[..end].trim().to_string()),
        None => Some(body.trim().to_string()),
    }
}

/// Extract the first balanced span between `open` and `close`, respecting
/// JSON string literals and escapes.
fn balanced(raw: &str, open: char, close: char) -> Option<String> {
    let start = raw.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in raw[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(raw[start..start + offset + close.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }

    None
}
