//! Response validation error types.

/// Specific error conditions for payload validation.
///
/// This is the most failure-prone boundary in the pipeline: the generation
/// capability is not format-guaranteed, so every condition here names what
/// was wrong with the payload rather than defaulting fields silently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ValidationErrorKind {
    /// No structured payload could be located in the raw output
    #[display("No structured payload found in response: {}", _0)]
    NoPayload(String),
    /// The extracted payload failed to parse
    #[display("Failed to parse payload: {}", _0)]
    Parse(String),
    /// A required field is absent
    #[display("Missing required field: {}", _0)]
    MissingField(String),
    /// A required field is present but empty
    #[display("Required field is empty: {}", _0)]
    EmptyField(String),
    /// Suggestion payload did not contain exactly the required count
    #[display("Expected exactly 3 suggestions, got {}", _0)]
    SuggestionCount(usize),
}

/// Validation error with source location tracking.
///
/// # Examples
///
/// ```
/// use fabula_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::MissingField("plot.conflict".into()));
/// assert!(format!("{}", err).contains("plot.conflict"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The kind of error that occurred
    pub kind: ValidationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new validation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
