use thiserror::Error;

pub const INPUT_REQUIRED: &str = "Input is required";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnhanceError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Cancelled")]
    Cancelled,
}

impl EnhanceError {
    pub fn input_required() -> Self {
        EnhanceError::InvalidRequest(INPUT_REQUIRED.to_string())
    }
}
