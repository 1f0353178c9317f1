//! API error type and its JSON rendering.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Errors surfaced to HTTP clients.
///
/// `Upstream` is reserved for embedding provider failures so they map to
/// 502 instead of being folded into generic 500s.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("request body too large")]
    PayloadTooLarge,

    #[error("embedding request failed: {0}")]
    Upstream(anyhow::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Wire shape for error responses: `{"error": …}` with an optional
/// `message` carrying detail for 5xx-class failures.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(error) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error,
                    message: None,
                },
            ),
            ApiError::NotFound(error) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error,
                    message: None,
                },
            ),
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorBody {
                    error: "Request body too large".to_string(),
                    message: None,
                },
            ),
            ApiError::Upstream(err) => {
                tracing::warn!(error = %format!("{err:#}"), "embedding provider failure");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody {
                        error: "Embedding request failed".to_string(),
                        message: Some(format!("{err:#}")),
                    },
                )
            }
            ApiError::Internal(err) => {
                tracing::error!(error = %format!("{err:#}"), "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "Internal server error".to_string(),
                        message: Some(format!("{err:#}")),
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::BadRequest(format!("Invalid multipart request: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                ApiError::BadRequest("Query is required".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::NotFound("Photo not found".into()),
                StatusCode::NOT_FOUND,
            ),
            (ApiError::PayloadTooLarge, StatusCode::PAYLOAD_TOO_LARGE),
            (
                ApiError::Upstream(anyhow::anyhow!("timeout")),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ApiError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_error_body_omits_empty_message() {
        let body = ErrorBody {
            error: "Photo not found".into(),
            message: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Photo not found" }));
    }
}
