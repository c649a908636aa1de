//! Upload handler

use crate::config::APP_NAME;
use crate::{ApiError, AppState};
use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use bytes::Bytes;
use lumen_irys::{validate_tags, Tag, Uploader};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

const INVALID_BODY: &str =
    "Invalid request body. Expected text/plain or { data, contentType, tags }";

/// Structured upload body (`application/json` requests)
#[derive(Deserialize)]
struct UploadBody {
    data: String,
    #[serde(rename = "contentType")]
    content_type: Option<String>,
    tags: Option<Vec<Tag>>,
}

#[derive(Serialize)]
pub struct UploadResponse {
    id: String,
    timestamp: u64,
    url: String,
}

/// POST /upload - submit a payload to the storage network.
///
/// Billable and irreversible: once the node accepts the bytes there is no
/// undo, and the service never retries on the caller's behalf.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UploadResponse>, ApiError> {
    const CONTEXT: &str = "Upload failed";

    let (payload, content_type, caller_tags) = parse_body(&headers, body)?;

    let mut tags = vec![
        Tag::new(
            "Content-Type",
            content_type.as_deref().unwrap_or("text/plain"),
        ),
        Tag::new("App-Name", APP_NAME),
    ];
    tags.extend(caller_tags);
    validate_tags(&tags).map_err(|e| ApiError::validation(e.to_string()))?;

    let uploader = state.uploader().await.map_err(|e| ApiError::irys(CONTEXT, e))?;
    let receipt = uploader
        .upload(payload, tags)
        .await
        .map_err(|e| ApiError::irys(CONTEXT, e))?;

    info!(id = %receipt.id, "upload successful");

    Ok(Json(UploadResponse {
        url: state.config.data_url(&receipt.id),
        id: receipt.id,
        timestamp: receipt.timestamp,
    }))
}

/// Split the dual-shape body on the Content-Type header: raw text/plain
/// payloads pass through untouched, JSON bodies carry payload and metadata,
/// and every other shape is a validation failure.
fn parse_body(
    headers: &HeaderMap,
    body: Bytes,
) -> Result<(Bytes, Option<String>, Vec<Tag>), ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("application/json") {
        let parsed: UploadBody =
            serde_json::from_slice(&body).map_err(|_| ApiError::validation(INVALID_BODY))?;
        Ok((
            Bytes::from(parsed.data),
            parsed.content_type,
            parsed.tags.unwrap_or_default(),
        ))
    } else if content_type.starts_with("text/plain") {
        Ok((body, None, Vec::new()))
    } else {
        Err(ApiError::validation(INVALID_BODY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, content_type.parse().unwrap());
        headers
    }

    #[test]
    fn test_text_plain_passes_through() {
        let (payload, content_type, tags) =
            parse_body(&headers_with("text/plain"), Bytes::from_static(b"hi")).unwrap();
        assert_eq!(payload, Bytes::from_static(b"hi"));
        assert!(content_type.is_none());
        assert!(tags.is_empty());
    }

    #[test]
    fn test_charset_suffix_accepted() {
        let headers = headers_with("text/plain; charset=utf-8");
        assert!(parse_body(&headers, Bytes::from_static(b"hi")).is_ok());
    }

    #[test]
    fn test_json_body_with_tags() {
        let body = Bytes::from_static(
            br#"{"data":"payload","contentType":"application/json","tags":[{"name":"k","value":"v"}]}"#,
        );
        let (payload, content_type, tags) =
            parse_body(&headers_with("application/json"), body).unwrap();
        assert_eq!(payload, Bytes::from_static(b"payload"));
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(tags, vec![Tag::new("k", "v")]);
    }

    #[test]
    fn test_json_without_data_rejected() {
        let err = parse_body(
            &headers_with("application/json"),
            Bytes::from_static(br#"{"contentType":"text/plain"}"#),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_other_content_types_rejected() {
        let err = parse_body(
            &headers_with("application/pdf"),
            Bytes::from_static(b"%PDF"),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_missing_content_type_rejected() {
        let err = parse_body(&HeaderMap::new(), Bytes::from_static(b"hi")).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
