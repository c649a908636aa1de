//! Retrieval proxy handler

use crate::{ApiError, AppState};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

/// GET /data/{tx_id} - stream stored bytes back from the public gateway.
///
/// The id is forwarded as-is; the gateway upstream is the source of truth
/// for validity, and its non-success statuses are passed through.
pub async fn get_data(
    State(state): State<Arc<AppState>>,
    Path(tx_id): Path<String>,
) -> Result<Response, ApiError> {
    let url = state.config.data_url(&tx_id);
    debug!(%tx_id, "fetching from public gateway");

    let upstream = state
        .http
        .get(&url)
        .send()
        .await
        .map_err(|e| ApiError::irys("Failed to retrieve data", e.into()))?;

    let status = upstream.status();
    if !status.is_success() {
        return Err(ApiError::UpstreamStatus {
            context: "Failed to fetch data from gateway",
            status,
        });
    }

    let mut response = Response::builder().status(StatusCode::OK);
    if let Some(content_type) = upstream.headers().get(header::CONTENT_TYPE) {
        response = response.header(header::CONTENT_TYPE, content_type.as_bytes());
    }

    response
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| ApiError::Internal(e.into()))
}
