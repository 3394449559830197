//! Output types from generation responses.

use serde::{Deserialize, Serialize};

/// Supported output types from the generation capability.
///
/// The pipeline treats generation output as raw text and leaves
/// interpretation to the response validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Output {
    /// Plain text output.
    Text(String),
}

impl Output {
    /// Borrow the text content, if this output is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Output::Text(text) => Some(text),
        }
    }
}
