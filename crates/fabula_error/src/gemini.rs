//! Gemini-specific error types.

/// Gemini-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GeminiErrorKind {
    /// Failed to create Gemini client
    #[display("Failed to create Gemini client: {}", _0)]
    ClientCreation(String),
    /// API request failed
    #[display("Gemini API request failed: {}", _0)]
    ApiRequest(String),
    /// HTTP error with status code and message
    #[display("HTTP {} error: {}", status_code, message)]
    HttpError {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// The API returned no usable text output
    #[display("Empty response from Gemini")]
    EmptyResponse,
}

/// Gemini error with source location tracking.
///
/// # Examples
///
/// ```
/// use fabula_error::{GeminiError, GeminiErrorKind};
///
/// let err = GeminiError::new(GeminiErrorKind::EmptyResponse);
/// assert!(format!("{}", err).contains("Empty response"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gemini Error: {} at line {} in {}", kind, line, file)]
pub struct GeminiError {
    /// The kind of error that occurred
    pub kind: GeminiErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GeminiError {
    /// Create a new Gemini error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GeminiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
