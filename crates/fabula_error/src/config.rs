//! Configuration error types.

/// Configuration error with source location.
///
/// Raised when loading or resolving agent/tool definitions fails. A
/// configuration error is always fatal at load time: the registry refuses to
/// come up with a dangling reference or an out-of-range parameter.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use fabula_error::ConfigError;
    ///
    /// let err = ConfigError::new("unknown tool: llm_tool_missing");
    /// assert!(err.message.contains("unknown tool"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
