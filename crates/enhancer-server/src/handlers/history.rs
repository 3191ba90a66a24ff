use actix_web::{web, HttpResponse};

use crate::error::{AppError, Result};
use crate::history::HISTORY_PAGE_SIZE;
use crate::state::AppState;

pub async fn list(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.history.recent(HISTORY_PAGE_SIZE).await)
}

pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let id = path.into_inner();
    let entry = state.history.get(&id).await.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(entry))
}
