//! Trait definitions for generation capability backends.
//!
//! The pipeline never inspects or negotiates the capability's own protocol;
//! it is treated as a capability behind [`FabulaDriver`], not a protocol
//! client.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use async_trait::async_trait;
use fabula_core::{GenerateRequest, GenerateResponse};
use fabula_error::FabulaResult;

/// Core trait that all generation backends must implement.
///
/// This is the sole suspension point in a dispatch: every other pipeline
/// step (resolution, rendering, validation, persistence) is synchronous.
#[async_trait]
pub trait FabulaDriver: Send + Sync {
    /// Generate model output for a request.
    ///
    /// A transport, auth, or rate-limit failure surfaces as an
    /// invocation-kind error carrying the underlying cause; the driver
    /// never retries on the pipeline's behalf.
    async fn generate(&self, req: &GenerateRequest) -> FabulaResult<GenerateResponse>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Default model identifier used when a request does not name one.
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: FabulaDriver + ?Sized> FabulaDriver for std::sync::Arc<T> {
    async fn generate(&self, req: &GenerateRequest) -> FabulaResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
