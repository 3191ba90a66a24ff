use serde::{Deserialize, Serialize};

use crate::types::EnhancementResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Status {
        message: String,
    },

    Chunk {
        content: String,
    },

    /// Terminal event carrying the full envelope, flattened next to `type`.
    Complete(EnhancementResult),

    /// Terminal event.
    Error {
        error: String,
    },
}

impl StreamEvent {
    pub fn status(message: impl Into<String>) -> Self {
        StreamEvent::Status {
            message: message.into(),
        }
    }

    pub fn chunk(content: impl Into<String>) -> Self {
        StreamEvent::Chunk {
            content: content.into(),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        StreamEvent::Error {
            error: error.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Complete(_) | StreamEvent::Error { .. })
    }
}
