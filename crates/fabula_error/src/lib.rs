//! Error types for the Fabula story generation pipeline.
//!
//! This crate provides the foundation error types used throughout the Fabula
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use fabula_error::{ConfigError, FabulaResult};
//!
//! fn resolve() -> FabulaResult<String> {
//!     Err(ConfigError::new("unknown agent: missing_v1"))?
//! }
//!
//! match resolve() {
//!     Ok(id) => println!("Resolved: {}", id),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod gemini;
mod invocation;
mod storage;
mod template;
mod validation;

pub use config::ConfigError;
pub use error::{FabulaError, FabulaErrorKind, FabulaResult};
pub use gemini::{GeminiError, GeminiErrorKind};
pub use invocation::{InvocationError, InvocationErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use template::TemplateError;
pub use validation::{ValidationError, ValidationErrorKind};
