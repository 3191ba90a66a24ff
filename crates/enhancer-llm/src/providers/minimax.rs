use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use crate::config::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT};
use crate::provider::{CompletionProvider, FragmentStream, LLMError, Result};

use super::common::openai_compat::{
    build_completion_body, parse_completion_response, parse_stream_data, StreamFrame,
};
use super::common::sse::{fragment_stream_from_sse, SseAction};

const COMPLETION_PATH: &str = "/text/chatcompletion_v2";

pub struct MiniMaxProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    group_id: Option<String>,
    timeout: Duration,
}

impl MiniMaxProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            group_id: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Route requests to a specific account group via the `GroupId` query parameter.
    pub fn with_group_id(mut self, group_id: Option<String>) -> Self {
        self.group_id = group_id;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), COMPLETION_PATH)
    }

    fn request(&self, body: &Value) -> RequestBuilder {
        let mut request = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(body);

        if let Some(group_id) = &self.group_id {
            request = request.query(&[("GroupId", group_id)]);
        }

        request
    }

    fn map_send_error(&self, err: reqwest::Error) -> LLMError {
        if err.is_timeout() {
            LLMError::Timeout(self.timeout)
        } else {
            LLMError::Http(err)
        }
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(LLMError::Api { status, body })
}

#[async_trait]
impl CompletionProvider for MiniMaxProvider {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system_instruction: &str, user_message: &str) -> Result<String> {
        let body = build_completion_body(&self.model, system_instruction, user_message, false);

        log::debug!("MiniMax completion request to {} (model: {})", self.endpoint(), self.model);

        let response = self
            .request(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| self.map_send_error(err))?;
        let response = ensure_success(response).await?;

        let text = response
            .text()
            .await
            .map_err(|err| self.map_send_error(err))?;
        parse_completion_response(&text)
    }

    async fn complete_stream(
        &self,
        system_instruction: &str,
        user_message: &str,
    ) -> Result<FragmentStream> {
        let body = build_completion_body(&self.model, system_instruction, user_message, true);

        log::debug!("MiniMax streaming request to {} (model: {})", self.endpoint(), self.model);

        // Bound the wait for response headers; the body is bounded per event below.
        let response = tokio::time::timeout(self.timeout, self.request(&body).send())
            .await
            .map_err(|_| LLMError::Timeout(self.timeout))?
            .map_err(|err| self.map_send_error(err))?;
        let response = ensure_success(response).await?;

        let stream = fragment_stream_from_sse(response, self.timeout, |data| {
            match parse_stream_data(data) {
                StreamFrame::Delta(content) => SseAction::Emit(content),
                StreamFrame::Skip => SseAction::Skip,
                StreamFrame::Done => SseAction::Finish,
            }
        });

        Ok(stream)
    }
}
