//! Request and response types for generation.

use crate::{Message, Output};
use serde::{Deserialize, Serialize};

/// A generation request under a declared contract.
///
/// # Examples
///
/// ```
/// use fabula_core::{GenerateRequest, Message, Role};
///
/// let request = GenerateRequest {
///     messages: vec![Message {
///         role: Role::User,
///         content: "Genre: fantasy".to_string(),
///     }],
///     max_tokens: Some(1000),
///     temperature: Some(0.7),
///     model: Some("gemini-2.0-flash".to_string()),
/// };
///
/// assert_eq!(request.messages.len(), 1);
/// assert_eq!(request.max_tokens, Some(1000));
/// ```
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, Default, derive_builder::Builder,
)]
#[builder(default)]
pub struct GenerateRequest {
    /// The messages to send
    pub messages: Vec<Message>,
    /// Maximum number of tokens to generate
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Model identifier to use
    pub model: Option<String>,
}

impl GenerateRequest {
    /// Start building a request.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }
}

/// The unified response object.
///
/// # Examples
///
/// ```
/// use fabula_core::{GenerateResponse, Output};
///
/// let response = GenerateResponse {
///     outputs: vec![Output::Text("{\"title\": \"...\"}".to_string())],
/// };
///
/// assert_eq!(response.outputs.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The generated outputs from the model
    pub outputs: Vec<Output>,
}

impl GenerateResponse {
    /// Concatenate all textual outputs into a single string.
    pub fn text(&self) -> String {
        self.outputs
            .iter()
            .filter_map(Output::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
