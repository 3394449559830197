//! Tool invocation error types.

/// Specific error conditions for external capability invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum InvocationErrorKind {
    /// Transport-level failure reaching the generation capability
    #[display("Transport failure: {}", _0)]
    Transport(String),
    /// The capability call exceeded the caller-supplied timeout
    #[display("Generation timed out after {}ms", _0)]
    Timeout(u64),
    /// Authentication or authorization failure
    #[display("Authentication failure: {}", _0)]
    Auth(String),
    /// The capability rejected the call due to rate limiting
    #[display("Rate limited: {}", _0)]
    RateLimited(String),
}

/// Invocation error with source location tracking.
///
/// The pipeline never retries an invocation error automatically; the cause
/// (transport, timeout, auth, rate limit) is preserved for the caller.
///
/// # Examples
///
/// ```
/// use fabula_error::{InvocationError, InvocationErrorKind};
///
/// let err = InvocationError::new(InvocationErrorKind::Timeout(5000));
/// assert!(format!("{}", err).contains("timed out"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Invocation Error: {} at line {} in {}", kind, line, file)]
pub struct InvocationError {
    /// The kind of error that occurred
    pub kind: InvocationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl InvocationError {
    /// Create a new invocation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: InvocationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
