use std::sync::Arc;

use actix_web::web::Bytes;
use tokio::sync::mpsc;

use enhancer_core::StreamEvent;
use enhancer_pipeline::Enhancer;

use crate::history::HistoryStore;

#[derive(Clone)]
pub struct AppState {
    pub enhancer: Arc<Enhancer>,
    pub history: Arc<HistoryStore>,
}

impl AppState {
    pub fn new(enhancer: Enhancer) -> Self {
        Self {
            enhancer: Arc::new(enhancer),
            history: Arc::new(HistoryStore::default()),
        }
    }
}

/// Render one event as an SSE `data:` frame.
pub fn encode_sse_frame(event: &StreamEvent) -> Option<Bytes> {
    match serde_json::to_string(event) {
        Ok(json) => Some(Bytes::from(format!("data: {}\n\n", json))),
        Err(e) => {
            log::error!("Failed to serialize stream event: {}", e);
            None
        }
    }
}

/// Terminal frame sent when a terminal event cannot be serialized.
const INTERNAL_ERROR_FRAME: &[u8] =
    b"data: {\"type\":\"error\",\"error\":\"Internal server error\"}\n\n";

/// Frame to send for `event`, given its encoding. A terminal event always yields a frame so
/// the stream never closes without one.
fn frame_for(event: &StreamEvent, encoded: Option<Bytes>) -> Option<Bytes> {
    match encoded {
        Some(frame) => Some(frame),
        None if event.is_terminal() => Some(Bytes::from_static(INTERNAL_ERROR_FRAME)),
        None => None,
    }
}

/// Forward events to the response body until a terminal event or a closed body.
pub fn spawn_sse_sender(
    mut rx: mpsc::Receiver<StreamEvent>,
    tx: mpsc::Sender<Bytes>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let Some(frame) = frame_for(&event, encode_sse_frame(&event)) else {
                continue;
            };

            if tx.send(frame).await.is_err() {
                break;
            }

            if event.is_terminal() {
                break;
            }
        }
    })
}
