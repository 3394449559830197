//! Message types for generation requests.

use crate::Role;
use serde::{Deserialize, Serialize};

/// A single message in a generation request.
///
/// # Examples
///
/// ```
/// use fabula_core::{Message, Role};
///
/// let message = Message {
///     role: Role::User,
///     content: "Genre: mystery".to_string(),
/// };
///
/// assert_eq!(message.role, Role::User);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct Message {
    /// The role of the message sender
    pub role: Role,
    /// The text content of the message
    pub content: String,
}

impl Message {
    /// Convenience constructor for a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Convenience constructor for a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}
