use actix_web::http::header;
use actix_web::{web, HttpResponse};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use enhancer_core::{EnhanceError, EnhancementRequest, StreamEvent};

use crate::error::INTERNAL_ERROR;
use crate::handlers::parse_request;
use crate::logging::new_request_id;
use crate::state::{spawn_sse_sender, AppState};

pub async fn handler(state: web::Data<AppState>, body: web::Bytes) -> HttpResponse {
    let request_id = new_request_id();

    // SSE frames for the response body
    let (sse_tx, mut sse_rx) = mpsc::channel::<web::Bytes>(100);
    // Pipeline events
    let (event_tx, event_rx) = mpsc::channel::<StreamEvent>(100);
    let _sse_handle = spawn_sse_sender(event_rx, sse_tx);

    let cancel_token = CancellationToken::new();

    match parse_request(&body) {
        Ok(request) => {
            log::info!("[{}] Stream started", request_id);
            spawn_pipeline(
                state.get_ref().clone(),
                request,
                request_id,
                event_tx,
                cancel_token.clone(),
            );
        }
        Err(error) => {
            log::warn!("[{}] Rejected stream request: {}", request_id, error);
            let _ = event_tx.send(StreamEvent::error(error.to_string())).await;
        }
    }

    // Dropping the body (client gone) cancels the pipeline.
    let guard = cancel_token.drop_guard();

    HttpResponse::Ok()
        .append_header((header::CONTENT_TYPE, "text/event-stream"))
        .append_header((header::CACHE_CONTROL, "no-cache"))
        .append_header((header::CONNECTION, "keep-alive"))
        .streaming(async_stream::stream! {
            let _guard = guard;
            while let Some(item) = sse_rx.recv().await {
                yield Ok::<_, actix_web::Error>(item);
            }
        })
}

/// Run the pipeline in its own task and supervise it, so a panic still ends the stream
/// with a terminal error event.
fn spawn_pipeline(
    state: AppState,
    request: EnhancementRequest,
    request_id: String,
    event_tx: mpsc::Sender<StreamEvent>,
    cancel_token: CancellationToken,
) {
    tokio::spawn(async move {
        let pipeline = tokio::spawn({
            let enhancer = state.enhancer.clone();
            let request = request.clone();
            let request_id = request_id.clone();
            let event_tx = event_tx.clone();
            async move {
                enhancer
                    .enhance_stream(&request, &request_id, event_tx, cancel_token)
                    .await
            }
        });

        match pipeline.await {
            Ok(Ok(result)) => {
                let entry = state.history.record(&request, &result).await;
                log::info!("[{}] Stream completed, recorded as {}", request_id, entry.id);
            }
            Ok(Err(EnhanceError::Cancelled)) => {
                log::info!("[{}] Stream cancelled by client", request_id);
            }
            Ok(Err(error)) => {
                log::error!("[{}] Stream failed: {}", request_id, error);
                let _ = event_tx.send(StreamEvent::error(INTERNAL_ERROR)).await;
            }
            Err(join_error) => {
                log::error!("[{}] Stream task panicked: {}", request_id, join_error);
                let _ = event_tx.send(StreamEvent::error(INTERNAL_ERROR)).await;
            }
        }
    });
}
