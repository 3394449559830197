//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// The role a message plays in a generation request.
///
/// # Examples
///
/// ```
/// use fabula_core::Role;
///
/// let user_role = Role::User;
/// let system_role = Role::System;
/// assert_ne!(user_role, system_role);
///
/// // Display implementation
/// assert_eq!(format!("{}", Role::System), "System");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Role {
    /// System messages provide context and instructions
    System,
    /// User messages carry the request-specific prompt
    User,
    /// Assistant messages are model output fed back as context
    Assistant,
}
