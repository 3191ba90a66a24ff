use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use enhancer_core::EnhanceError;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

pub const INVALID_BODY: &str = "Invalid request body";
pub const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Prompt not found")]
    NotFound,

    /// Detail is logged, never returned to the client.
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn invalid_body() -> Self {
        AppError::InvalidRequest(INVALID_BODY.to_string())
    }
}

impl From<EnhanceError> for AppError {
    fn from(error: EnhanceError) -> Self {
        match error {
            EnhanceError::InvalidRequest(message) => AppError::InvalidRequest(message),
            EnhanceError::Cancelled => AppError::Internal("request cancelled".to_string()),
        }
    }
}

#[derive(Serialize)]
struct JsonError<'a> {
    error: &'a str,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            log::error!("Internal error: {}", detail);
        }

        let message = self.to_string();
        HttpResponse::build(self.status_code()).json(JsonError { error: &message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(error: AppError) -> serde_json::Value {
        let response = error.error_response();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn internal_detail_is_hidden() {
        let error = AppError::Internal("pool exhausted".to_string());
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_of(error).await,
            serde_json::json!({"error": "Internal server error"})
        );
    }

    #[actix_web::test]
    async fn enhance_errors_map_to_bad_request() {
        let error = AppError::from(EnhanceError::input_required());
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_of(error).await,
            serde_json::json!({"error": "Input is required"})
        );
    }

    #[test]
    fn not_found_message() {
        assert_eq!(AppError::NotFound.to_string(), "Prompt not found");
        assert_eq!(AppError::NotFound.status_code(), StatusCode::NOT_FOUND);
    }
}
