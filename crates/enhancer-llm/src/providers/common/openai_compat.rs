//! OpenAI-compatible chat completion request/response helpers.
//!
//! The MiniMax v2 chat endpoint accepts the OpenAI request shape and answers with
//! `choices[0].message.content` (single-shot) or `choices[0].delta.content` frames
//! (streaming).

use serde::Deserialize;
use serde_json::{json, Value};

use crate::provider::{LLMError, Result};

pub const TEMPERATURE: f64 = 0.7;
pub const MAX_TOKENS: u32 = 4096;
pub const DONE_SENTINEL: &str = "[DONE]";

/// Build the request body. Sampling parameters are fixed so output stays in the
/// sectioned format.
pub fn build_completion_body(
    model: &str,
    system_instruction: &str,
    user_message: &str,
    stream: bool,
) -> Value {
    let mut body = json!({
        "model": model,
        "messages": [
            { "role": "system", "content": system_instruction },
            { "role": "user", "content": user_message },
        ],
        "temperature": TEMPERATURE,
        "max_tokens": MAX_TOKENS,
    });

    if stream {
        body["stream"] = json!(true);
    }

    body
}

// --- single-shot response ---

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
    base_resp: Option<BaseResponse>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// MiniMax reports some failures in-band with HTTP 200.
#[derive(Debug, Deserialize)]
struct BaseResponse {
    status_code: Option<i64>,
    status_msg: Option<String>,
}

/// Extract `choices[0].message.content` from a response body.
pub fn parse_completion_response(body: &str) -> Result<String> {
    let response: CompletionResponse = serde_json::from_str(body)?;

    let Some(choice) = response.choices.into_iter().next() else {
        let detail = response
            .base_resp
            .map(|base| {
                format!(
                    "status_code={} status_msg={}",
                    base.status_code.unwrap_or_default(),
                    base.status_msg.unwrap_or_default()
                )
            })
            .unwrap_or_else(|| "missing choices".to_string());
        return Err(LLMError::MalformedResponse(detail));
    };

    let content = choice
        .message
        .and_then(|message| message.content)
        .ok_or_else(|| LLMError::MalformedResponse("missing message content".to_string()))?;

    if content.trim().is_empty() {
        return Err(LLMError::EmptyResponse);
    }

    Ok(content)
}

// --- streaming frames ---

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Deserialize, Default)]
struct StreamDelta {
    content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    Delta(String),
    Skip,
    Done,
}

/// Parse an SSE `data:` payload in lenient mode.
///
/// - `"[DONE]"` -> `StreamFrame::Done`
/// - Invalid JSON, or a frame without text -> `StreamFrame::Skip`
pub fn parse_stream_data(data: &str) -> StreamFrame {
    let data = data.trim();
    if data == DONE_SENTINEL {
        return StreamFrame::Done;
    }
    if data.is_empty() {
        return StreamFrame::Skip;
    }

    match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => chunk
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .filter(|content| !content.is_empty())
            .map(StreamFrame::Delta)
            .unwrap_or(StreamFrame::Skip),
        Err(err) => {
            log::debug!("Skipping malformed stream frame: {err}");
            StreamFrame::Skip
        }
    }
}
