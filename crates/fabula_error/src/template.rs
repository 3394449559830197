//! Prompt template error types.

/// Template rendering error with source location.
///
/// Indicates a configuration defect (a placeholder with no matching
/// variable); never retried.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Template Error: {} at line {} in {}", message, line, file)]
pub struct TemplateError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl TemplateError {
    /// Create a new TemplateError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use fabula_error::TemplateError;
    ///
    /// let err = TemplateError::new("missing variable: genre");
    /// assert!(err.message.contains("genre"));
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
