use actix_web::{web, HttpResponse};
use tokio_util::task::AbortOnDropHandle;

use crate::error::{AppError, Result};
use crate::handlers::parse_request;
use crate::logging::new_request_id;
use crate::state::AppState;

pub async fn handler(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse> {
    let request_id = new_request_id();
    let request = parse_request(&body).map_err(|error| {
        log::warn!("[{}] Rejected request: {}", request_id, error);
        error
    })?;

    // Aborted when actix drops the handler on client disconnect.
    let enhancer = state.enhancer.clone();
    let task = AbortOnDropHandle::new(tokio::spawn({
        let request = request.clone();
        let request_id = request_id.clone();
        async move { enhancer.enhance(&request, &request_id).await }
    }));
    let result = task.await.map_err(|e| {
        AppError::Internal(format!("[{}] enhancement task failed: {}", request_id, e))
    })?;

    let entry = state.history.record(&request, &result).await;
    log::info!(
        "[{}] Enhanced prompt recorded as {} (score {:.1})",
        request_id,
        entry.id,
        result.score.final_score()
    );

    Ok(HttpResponse::Ok().json(result))
}
