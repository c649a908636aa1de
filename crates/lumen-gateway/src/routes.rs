//! HTTP route definitions

use crate::{handlers, middleware, AppState};
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main router
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration (the gateway is called from browser frontends)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_body_size = state.config.max_body_size;

    Router::new()
        .route("/health", get(handlers::health))
        .route("/info", get(handlers::uploader_info))
        .route("/upload", post(handlers::upload))
        .route("/data/{tx_id}", get(handlers::get_data))
        .route("/fund", post(handlers::fund))
        .route("/price/{bytes}", get(handlers::price))
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .layer(DefaultBodyLimit::max(max_body_size))
        .with_state(state)
}
