pub mod enhance;
pub mod health;
pub mod history;
pub mod stream;

use serde::Deserialize;

use enhancer_core::EnhancementRequest;

use crate::error::AppError;

/// Wire shape of an enhancement request. Both fields may be absent or null.
#[derive(Debug, Default, Deserialize)]
pub struct EnhanceRequestBody {
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
}

/// Decode and validate a raw request body.
pub fn parse_request(body: &[u8]) -> Result<EnhancementRequest, AppError> {
    let body: EnhanceRequestBody =
        serde_json::from_slice(body).map_err(|_| AppError::invalid_body())?;

    EnhancementRequest::new(body.input.unwrap_or_default(), body.mode.as_deref())
        .map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejection(body: &str) -> String {
        match parse_request(body.as_bytes()) {
            Err(AppError::InvalidRequest(message)) => message,
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }

    #[test]
    fn accepts_input_with_optional_mode() {
        let request = parse_request(br#"{"input":"write tests","mode":"coding"}"#).unwrap();
        assert_eq!(request.input(), "write tests");
        assert_eq!(request.mode(), "coding");

        let request = parse_request(br#"{"input":"write tests","mode":null}"#).unwrap();
        assert_eq!(request.mode(), "general");
    }

    #[test]
    fn rejects_missing_or_blank_input() {
        assert_eq!(rejection("{}"), "Input is required");
        assert_eq!(rejection(r#"{"input":null}"#), "Input is required");
        assert_eq!(rejection(r#"{"input":"   "}"#), "Input is required");
    }

    #[test]
    fn rejects_unparsable_body() {
        assert_eq!(rejection("not json"), "Invalid request body");
        assert_eq!(rejection(""), "Invalid request body");
        assert_eq!(rejection(r#"{"input":42}"#), "Invalid request body");
    }
}
