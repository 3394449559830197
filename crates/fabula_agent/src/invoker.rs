//! Tool invocation: one external capability call under a declared contract.

use fabula_config::ToolDefinition;
use fabula_core::{GenerateRequest, Message};
use fabula_error::{
    FabulaError, FabulaErrorKind, GeminiErrorKind, InvocationError, InvocationErrorKind,
};
use fabula_interface::FabulaDriver;
use std::time::Duration;

/// Per-call overrides for a tool's default model parameters.
///
/// An override always wins over the tool default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    /// Model identifier override
    pub model: Option<String>,
    /// Temperature override
    pub temperature: Option<f32>,
    /// Max-token budget override
    pub max_tokens: Option<u32>,
}

/// Wraps a single generation capability with its declared invocation
/// parameters and a uniform call contract.
///
/// The invocation is the sole suspension point in the pipeline. The invoker
/// never retries; retry policy belongs to the dispatcher.
pub struct ToolInvoker<'a, D: FabulaDriver> {
    driver: &'a D,
    tool: &'a ToolDefinition,
    timeout: Option<Duration>,
}

impl<'a, D: FabulaDriver> ToolInvoker<'a, D> {
    /// Create an invoker for a resolved tool.
    pub fn new(driver: &'a D, tool: &'a ToolDefinition) -> Self {
        Self {
            driver,
            tool,
            timeout: None,
        }
    }

    /// Bound the capability call with a caller-supplied timeout.
    ///
    /// On expiry the call is abandoned and a timeout-kind invocation error
    /// is surfaced; no partial artifact can result.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Invoke the capability with merged parameters and return its raw text.
    ///
    /// # Errors
    ///
    /// Fails with an invocation error carrying the underlying cause
    /// (transport, timeout, auth, rate limit). Never retried here.
    #[tracing::instrument(skip_all, fields(tool = %self.tool.id(), provider = self.driver.provider_name()))]
    pub async fn invoke(
        &self,
        system: &str,
        user: &str,
        overrides: &Overrides,
    ) -> Result<String, InvocationError> {
        let request = GenerateRequest {
            messages: vec![Message::system(system), Message::user(user)],
            model: Some(
                overrides
                    .model
                    .clone()
                    .unwrap_or_else(|| self.tool.model().clone()),
            ),
            temperature: Some(overrides.temperature.unwrap_or(*self.tool.temperature())),
            max_tokens: Some(overrides.max_tokens.unwrap_or(*self.tool.max_tokens())),
        };

        let response = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.driver.generate(&request))
                .await
                .map_err(|_| {
                    InvocationError::new(InvocationErrorKind::Timeout(timeout.as_millis() as u64))
                })?,
            None => self.driver.generate(&request).await,
        };

        response.map(|r| r.text()).map_err(classify)
    }
}

/// Classify a driver failure into an invocation error, preserving the cause.
///
/// Provider HTTP statuses map onto auth and rate-limit kinds; anything else
/// is a transport failure.
fn classify(err: FabulaError) -> InvocationError {
    match err.kind() {
        FabulaErrorKind::Invocation(invocation) => invocation.clone(),
        FabulaErrorKind::Gemini(gemini) => match &gemini.kind {
            GeminiErrorKind::HttpError {
                status_code: 401 | 403,
                message,
            } => InvocationError::new(InvocationErrorKind::Auth(message.clone())),
            GeminiErrorKind::HttpError {
                status_code: 429,
                message,
            } => InvocationError::new(InvocationErrorKind::RateLimited(message.clone())),
            other => InvocationError::new(InvocationErrorKind::Transport(other.to_string())),
        },
        other => InvocationError::new(InvocationErrorKind::Transport(other.to_string())),
    }
}
