//! Google Gemini driver.
//!
//! Wraps the `gemini-rust` SDK behind [`FabulaDriver`]. The client keeps a
//! small pool of per-model SDK handles created lazily on first use, so a
//! request that overrides the model does not pay client construction twice.
//! The driver performs no retries; retry policy lives with the caller.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::instrument;

use gemini_rust::{client::Model, Gemini};

use fabula_core::{GenerateRequest, GenerateResponse, Output, Role};
use fabula_error::{FabulaResult, GeminiError, GeminiErrorKind};
use fabula_interface::FabulaDriver;

/// Client for the Google Gemini API.
///
/// # Example
///
/// ```no_run
/// use fabula_models::GeminiClient;
/// use fabula_core::{GenerateRequest, Message};
/// use fabula_interface::FabulaDriver;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GeminiClient::new(std::env::var("GEMINI_API_KEY")?);
///
/// let request = GenerateRequest {
///     messages: vec![Message::user("Genre: mystery")],
///     ..Default::default()
/// };
/// let response = client.generate(&request).await?;
/// println!("{}", response.text());
/// # Ok(())
/// # }
/// ```
pub struct GeminiClient {
    /// Cache of per-model SDK handles
    clients: Arc<Mutex<HashMap<String, Gemini>>>,
    /// API key for creating new handles
    api_key: String,
    /// Default model when a request does not name one
    model_name: String,
}

/// Default model used when neither the request nor the caller names one.
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model_name", &self.model_name)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a new client with the default model.
    ///
    /// The API key is supplied by startup code; this crate never reads
    /// environment state itself.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_default_model(api_key, DEFAULT_MODEL)
    }

    /// Create a new client with an explicit default model.
    pub fn with_default_model(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            clients: Arc::new(Mutex::new(HashMap::new())),
            api_key: api_key.into(),
            model_name: model.into(),
        }
    }

    /// Convert a model name string to a gemini-rust Model enum variant.
    ///
    /// Unrecognized names use `Model::Custom` with the "models/" prefix the
    /// API requires.
    fn model_name_to_enum(name: &str) -> Model {
        match name {
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-flash-lite" => Model::Gemini25FlashLite,
            "gemini-2.5-pro" => Model::Gemini25Pro,
            other => {
                if other.starts_with("models/") {
                    Model::Custom(other.to_string())
                } else {
                    Model::Custom(format!("models/{}", other))
                }
            }
        }
    }

    /// Get or create the SDK handle for a model.
    fn client_for(&self, model_name: &str) -> Result<Gemini, GeminiError> {
        let mut clients = self.clients.lock().unwrap();
        if let Some(client) = clients.get(model_name) {
            return Ok(client.clone());
        }

        let model_enum = Self::model_name_to_enum(model_name);
        let client = Gemini::with_model(&self.api_key, model_enum)
            .map_err(|e| GeminiError::new(GeminiErrorKind::ClientCreation(e.to_string())))?;
        clients.insert(model_name.to_string(), client.clone());
        Ok(client)
    }

    #[instrument(skip(self, req), fields(model = req.model.as_deref().unwrap_or(&self.model_name)))]
    async fn generate_internal(&self, req: &GenerateRequest) -> Result<GenerateResponse, GeminiError> {
        let model_name = req.model.as_deref().unwrap_or(&self.model_name);
        let client = self.client_for(model_name)?;

        let mut builder = client.generate_content();
        let mut system_prompt: Option<&str> = None;

        for msg in &req.messages {
            match msg.role {
                Role::System => {
                    system_prompt = Some(&msg.content);
                }
                Role::User => {
                    builder = builder.with_user_message(&msg.content);
                }
                Role::Assistant => {
                    builder = builder.with_model_message(&msg.content);
                }
            }
        }

        if let Some(prompt) = system_prompt {
            builder = builder.with_system_prompt(prompt);
        }

        if let Some(temperature) = req.temperature {
            builder = builder.with_temperature(temperature);
        }

        if let Some(max_tokens) = req.max_tokens {
            builder = builder.with_max_output_tokens(max_tokens as i32);
        }

        let response = builder.execute().await.map_err(Self::parse_gemini_error)?;

        let text = response.text();
        if text.trim().is_empty() {
            return Err(GeminiError::new(GeminiErrorKind::EmptyResponse));
        }

        Ok(GenerateResponse {
            outputs: vec![Output::Text(text)],
        })
    }

    /// Parse gemini-rust errors to extract HTTP status codes.
    ///
    /// Converts generic API error strings into structured errors with
    /// status codes when available.
    fn parse_gemini_error(err: impl std::fmt::Display) -> GeminiError {
        let err_msg = err.to_string();

        if let Some(status_code) = Self::extract_status_code(&err_msg) {
            GeminiError::new(GeminiErrorKind::HttpError {
                status_code,
                message: err_msg,
            })
        } else {
            GeminiError::new(GeminiErrorKind::ApiRequest(err_msg))
        }
    }

    /// Extract an HTTP status code from an error message string.
    ///
    /// Parses strings like "bad response from server; code 503; ...".
    fn extract_status_code(error_msg: &str) -> Option<u16> {
        let code_start = error_msg.find("code ")?;
        let code_str = &error_msg[code_start + 5..];
        let end = code_str
            .find(|c: char| !c.is_numeric())
            .unwrap_or(code_str.len());
        code_str[..end].parse().ok()
    }
}

#[async_trait]
impl FabulaDriver for GeminiClient {
    async fn generate(&self, req: &GenerateRequest) -> FabulaResult<GenerateResponse> {
        self.generate_internal(req).await.map_err(Into::into)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::GeminiClient;

    #[test]
    fn extracts_status_codes_from_error_strings() {
        assert_eq!(
            GeminiClient::extract_status_code("bad response from server; code 503; description"),
            Some(503)
        );
        assert_eq!(
            GeminiClient::extract_status_code("error code 429"),
            Some(429)
        );
        assert_eq!(GeminiClient::extract_status_code("connection refused"), None);
    }
}
