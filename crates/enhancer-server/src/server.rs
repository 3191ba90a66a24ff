use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::io;

use crate::handlers;
use crate::state::AppState;

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health::handler))
        .service(
            web::scope("/api")
                .route("/enhance", web::post().to(handlers::enhance::handler))
                .route("/enhance/stream", web::post().to(handlers::stream::handler))
                .route(
                    "/prompts/enhance",
                    web::post().to(handlers::enhance::handler),
                )
                // Must precede the `{id}` route
                .route("/prompts/history", web::get().to(handlers::history::list))
                .route("/prompts/{id}", web::get().to(handlers::history::get)),
        );
}

pub async fn run_server(host: &str, port: u16, state: AppState) -> io::Result<()> {
    log::info!(
        "Starting server on {}:{} (remote enhancement: {})",
        host,
        port,
        state.enhancer.model().unwrap_or("disabled")
    );
    let state = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .bind((host, port))?
    .run()
    .await
}
