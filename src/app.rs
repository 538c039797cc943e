use crate::handlers;
use crate::state::AppState;
use crate::visitors::track_visitor;
use axum::{middleware, routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home).post(handlers::submit_token))
        .route("/stats", get(handlers::stats))
        .route("/api/stats", get(handlers::api_stats))
        .route("/api/visitors", get(handlers::api_visitors))
        .layer(middleware::from_fn_with_state(state.clone(), track_visitor))
        .with_state(state)
}
