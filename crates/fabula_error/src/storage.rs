//! Storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create a partition directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write a representation
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read a persisted artifact
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Failed to promote a temp file to its final name
    #[display("Failed to promote file: {}", _0)]
    Promote(String),
    /// Failed to serialize the structured representation
    #[display("Failed to serialize artifact: {}", _0)]
    Serialize(String),
    /// All disambiguating suffixes for a timestamp key were taken
    #[display("Key collision exhausted for partition {}", _0)]
    CollisionExhausted(String),
    /// The genre could not be sanitized into a usable partition token
    #[display("Invalid partition: {}", _0)]
    InvalidPartition(String),
    /// Artifact not found at the given location
    #[display("Artifact not found: {}", _0)]
    NotFound(String),
}

/// Storage error with location tracking.
///
/// A storage failure guarantees no partial artifact remains committed: the
/// store rolls both representations back before surfacing one of these.
///
/// # Examples
///
/// ```
/// use fabula_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NotFound("/stories/fantasy".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
