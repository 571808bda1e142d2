use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Failures surfaced to HTTP callers. Everything else is logged and
/// acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    MissingEventHeader,
    UnhandledEvent(String),
    InvalidJson(String),
    FetchLogs(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingEventHeader | Self::UnhandledEvent(_) | Self::InvalidJson(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::FetchLogs(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the `{"error": ...}` response body.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MissingEventHeader => "Missing X_GITHUB_EVENT header",
            Self::UnhandledEvent(_) => "Unhandled event type",
            Self::InvalidJson(_) => "Invalid JSON payload",
            Self::FetchLogs(_) => "Failed to fetch logs",
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEventHeader => write!(f, "Missing X_GITHUB_EVENT header"),
            Self::UnhandledEvent(event) => write!(f, "Unhandled event type: {}", event),
            Self::InvalidJson(e) => write!(f, "Invalid JSON payload: {}", e),
            Self::FetchLogs(e) => write!(f, "Failed to fetch logs: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_header_maps_to_400_with_message() {
        let resp = ApiError::MissingEventHeader.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(resp).await,
            json!({ "error": "Missing X_GITHUB_EVENT header" })
        );
    }

    #[tokio::test]
    async fn unhandled_event_hides_event_name_from_body() {
        let resp = ApiError::UnhandledEvent("issues".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await, json!({ "error": "Unhandled event type" }));
    }

    #[tokio::test]
    async fn fetch_failure_maps_to_500() {
        let resp = ApiError::FetchLogs("connection refused".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await, json!({ "error": "Failed to fetch logs" }));
    }

    #[test]
    fn display_keeps_detail_for_logs() {
        let err = ApiError::FetchLogs("connection refused".to_string());
        assert_eq!(err.to_string(), "Failed to fetch logs: connection refused");
    }
}
