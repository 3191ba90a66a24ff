use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Completion service returned no content")]
    EmptyResponse,

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Stream error: {0}")]
    Stream(String),
}

pub type Result<T> = std::result::Result<T, LLMError>;

/// Text fragments in arrival order.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Model name sent with every request.
    fn model(&self) -> &str;

    /// Single-shot chat completion.
    ///
    /// # Arguments
    /// * `system_instruction` - Fixed behavioral contract for the model
    /// * `user_message` - Labeled input and mode
    async fn complete(&self, system_instruction: &str, user_message: &str) -> Result<String>;

    /// Streaming chat completion. Malformed frames are dropped inside the stream; an `Err`
    /// item means the transport failed and no further fragments follow.
    async fn complete_stream(
        &self,
        system_instruction: &str,
        user_message: &str,
    ) -> Result<FragmentStream>;
}
