//! Price quote and funding handlers

use crate::{ApiError, AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use bytes::Bytes;
use lumen_irys::{FundReceipt, Uploader, LAMPORTS_PER_SOL};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Serialize)]
pub struct PriceResponse {
    bytes: u64,
    /// Atomic units, kept as a string to avoid precision loss
    price: String,
    #[serde(rename = "priceInSol")]
    price_in_sol: String,
}

/// GET /price/{bytes} - quote the storage cost for a byte count.
///
/// Read-only; safe to retry or cache.
pub async fn price(
    State(state): State<Arc<AppState>>,
    Path(bytes): Path<String>,
) -> Result<Json<PriceResponse>, ApiError> {
    const CONTEXT: &str = "Failed to get price";

    let bytes: u64 = bytes
        .parse()
        .ok()
        .filter(|b| *b > 0)
        .ok_or_else(|| ApiError::validation("Invalid bytes parameter"))?;

    let uploader = state.uploader().await.map_err(|e| ApiError::irys(CONTEXT, e))?;
    let price = uploader
        .price(bytes)
        .await
        .map_err(|e| ApiError::irys(CONTEXT, e))?;

    Ok(Json(PriceResponse {
        bytes,
        price: price.to_string(),
        price_in_sol: format_sol(price),
    }))
}

/// Format an atomic-unit amount as SOL with exactly 9 decimal places.
///
/// Integer math end to end; a float division would drift on large amounts.
pub fn format_sol(lamports: u128) -> String {
    format!(
        "{}.{:09}",
        lamports / LAMPORTS_PER_SOL,
        lamports % LAMPORTS_PER_SOL
    )
}

#[derive(Deserialize)]
struct FundRequest {
    amount: Option<i64>,
}

#[derive(Serialize)]
pub struct FundResponse {
    success: bool,
    transaction: FundReceipt,
}

/// POST /fund - transfer lamports into the prepaid balance.
///
/// Operational/testing use; validation runs before the uploader is even
/// acquired so invalid input can never reach the funding primitive.
pub async fn fund(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<FundResponse>, ApiError> {
    const CONTEXT: &str = "Funding failed";
    const INVALID_AMOUNT: &str = "Invalid amount. Must be a positive integer in lamports";

    let request: FundRequest =
        serde_json::from_slice(&body).map_err(|_| ApiError::validation(INVALID_AMOUNT))?;
    let amount = request
        .amount
        .filter(|a| *a > 0)
        .ok_or_else(|| ApiError::validation(INVALID_AMOUNT))? as u64;

    let uploader = state.uploader().await.map_err(|e| ApiError::irys(CONTEXT, e))?;
    let receipt = uploader
        .fund(amount)
        .await
        .map_err(|e| ApiError::irys(CONTEXT, e))?;

    info!(tx_id = %receipt.id, amount, "funding successful");

    Ok(Json(FundResponse {
        success: true,
        transaction: receipt,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sol_small_amounts() {
        assert_eq!(format_sol(0), "0.000000000");
        assert_eq!(format_sol(1), "0.000000001");
        assert_eq!(format_sol(109_069), "0.000109069");
    }

    #[test]
    fn test_format_sol_whole_and_fraction() {
        assert_eq!(format_sol(1_500_000_000), "1.500000000");
        assert_eq!(format_sol(2_000_000_001), "2.000000001");
    }

    #[test]
    fn test_format_sol_large_amounts_keep_precision() {
        assert_eq!(
            format_sol(123_456_789_987_654_321),
            "123456789.987654321"
        );
    }
}
