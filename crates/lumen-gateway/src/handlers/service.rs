//! Service-level handlers (health and uploader info)

use crate::{ApiError, AppState};
use axum::{extract::State, Json};
use lumen_irys::Uploader;
use serde::Serialize;
use std::sync::Arc;

/// Service identifier reported by `/health`
pub const SERVICE_NAME: &str = "lumen-irys-gateway";

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    network: String,
}

/// GET /health - liveness check.
///
/// Never touches the uploader, so it stays green even when the key is
/// missing or the node is unreachable.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        network: state.config.network.to_string(),
    })
}

#[derive(Serialize)]
pub struct InfoResponse {
    address: String,
    /// Kept as a string; balances can exceed what JSON numbers carry safely
    balance: String,
    network: String,
}

/// GET /info - wallet address and prepaid balance
pub async fn uploader_info(
    State(state): State<Arc<AppState>>,
) -> Result<Json<InfoResponse>, ApiError> {
    const CONTEXT: &str = "Failed to get uploader info";

    let uploader = state.uploader().await.map_err(|e| ApiError::irys(CONTEXT, e))?;
    let balance = uploader.balance().await.map_err(|e| ApiError::irys(CONTEXT, e))?;

    Ok(Json(InfoResponse {
        address: uploader.address().to_string(),
        balance: balance.to_string(),
        network: state.config.network.to_string(),
    }))
}
