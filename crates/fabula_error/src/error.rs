//! Top-level error wrapper types.

use crate::{
    ConfigError, GeminiError, InvocationError, StorageError, TemplateError, ValidationError,
};

/// This is the foundation error enum aggregating every failure domain in the
/// pipeline.
///
/// # Examples
///
/// ```
/// use fabula_error::{ConfigError, FabulaError};
///
/// let config_err = ConfigError::new("unknown agent: ghost_v1");
/// let err: FabulaError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum FabulaErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Prompt template rendering error
    #[from(TemplateError)]
    Template(TemplateError),
    /// External capability invocation error
    #[from(InvocationError)]
    Invocation(InvocationError),
    /// Response payload validation error
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Gemini provider error
    #[from(GeminiError)]
    Gemini(GeminiError),
}

/// Fabula error with kind discrimination.
///
/// # Examples
///
/// ```
/// use fabula_error::{FabulaResult, TemplateError};
///
/// fn might_fail() -> FabulaResult<()> {
///     Err(TemplateError::new("missing variable: genre"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Fabula Error: {}", _0)]
pub struct FabulaError(Box<FabulaErrorKind>);

impl FabulaError {
    /// Create a new error from a kind.
    pub fn new(kind: FabulaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FabulaErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to FabulaErrorKind
impl<T> From<T> for FabulaError
where
    T: Into<FabulaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Fabula operations.
///
/// # Examples
///
/// ```
/// use fabula_error::{FabulaResult, StorageError, StorageErrorKind};
///
/// fn persist() -> FabulaResult<()> {
///     Err(StorageError::new(StorageErrorKind::FileWrite("disk full".into())))?
/// }
/// ```
pub type FabulaResult<T> = std::result::Result<T, FabulaError>;
