//! API error types and their JSON wire shape

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lumen_irys::IrysError;
use serde::Serialize;
use thiserror::Error;

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed request input; user-correctable, never retried upstream
    #[error("{0}")]
    Validation(String),

    /// Failure from the uploader or the network behind it
    #[error("{context}: {source}")]
    Irys {
        context: &'static str,
        #[source]
        source: IrysError,
    },

    /// The public gateway answered with a non-success status
    #[error("{context} ({status})")]
    UpstreamStatus {
        context: &'static str,
        status: StatusCode,
    },

    /// Anything unexpected
    #[error("internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wrap an uploader failure with the endpoint's error label
    pub fn irys(context: &'static str, source: IrysError) -> Self {
        Self::Irys { context, source }
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Irys { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamStatus { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body: `{error}` for validation failures, `{error, message}`
/// for upstream failures, `{error, status}` for proxied gateway statuses
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Self::Validation(message) => ErrorBody {
                error: message.clone(),
                message: None,
                status: None,
            },
            Self::Irys { context, source } => {
                tracing::error!(error = %source, "{}", context);
                ErrorBody {
                    error: (*context).to_string(),
                    message: Some(source.to_string()),
                    status: None,
                }
            }
            Self::UpstreamStatus {
                context,
                status: upstream,
            } => ErrorBody {
                error: (*context).to_string(),
                message: None,
                status: Some(upstream.as_u16()),
            },
            Self::Internal(error) => {
                tracing::error!(error = %error, "unhandled error");
                ErrorBody {
                    error: "Internal server error".to_string(),
                    message: Some(error.to_string()),
                    status: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::irys("Upload failed", IrysError::NodeApi("x".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::UpstreamStatus {
                context: "Failed to fetch data from gateway",
                status: StatusCode::NOT_FOUND,
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
