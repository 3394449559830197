//! Generation capability drivers for Fabula.
//!
//! This crate implements the [`fabula_interface::FabulaDriver`] trait for
//! concrete providers. Currently the sole backend is Google Gemini via the
//! `gemini-rust` SDK.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;

pub use gemini::GeminiClient;
