//! Route table for the dashboard server.

use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use super::{handlers, templates, AppState};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::overview))
        .route("/review", get(handlers::review))
        .route("/artifacts/:folder/:file", get(handlers::artifact_file))
        .route("/static/style.css", get(stylesheet))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn stylesheet() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        templates::CSS,
    )
}
