use async_trait::async_trait;
use thiserror::Error;

use crate::llm::gemini::types::GenerateContentRequest;
use crate::llm::gemini::types::GenerateContentResponse;

pub mod gemini;

/// Fatal outcome of a provider call. Never turned into a fallback label.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// Connection, TLS, timeout or body read failure.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The provider answered with a top-level `error` object.
    #[error("Request failed: {message} (HTTP {status})")]
    Api { status: u16, message: String },

    /// Non-success status without a readable `error` object.
    #[error("Request failed: HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// What came back from a call that did not fail.
#[derive(Debug, Clone)]
pub enum Reply {
    Parsed(GenerateContentResponse),
    /// Success status but the body was not the expected JSON.
    Unparseable,
}

#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Issue exactly one generate call.
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<Reply, ProviderError>;

    /// Model id, for logs and the health endpoint.
    fn model_id(&self) -> &str;
}
