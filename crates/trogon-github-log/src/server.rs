use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::HeaderMap,
    response::Html,
    routing::{get, post},
};
use serde_json::{Value, json};
use std::net::SocketAddr;
use tracing::{error, info, instrument, warn};

use crate::dispatch::{self, DispatchError, EventKind};
use crate::entry::Entry;
use crate::error::ApiError;
use crate::signal::shutdown_signal;
use crate::store::{EntryStore, StoredEntry};

/// Header names accepted for the event type. Header lookup is
/// case-insensitive; GitHub itself sends the hyphenated form.
const EVENT_HEADERS: [&str; 2] = ["x_github_event", "x-github-event"];

/// GitHub caps webhook deliveries at 25 MB.
const MAX_WEBHOOK_BYTES: usize = 25 * 1024 * 1024;

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Clone)]
struct AppState<S> {
    store: S,
}

/// Build the HTTP routes around an injected store handle.
///
/// - `GET /` landing page
/// - `POST /webhook/receiver` GitHub webhook intake
/// - `GET /api/logs` every stored entry
pub fn router<S: EntryStore>(store: S) -> Router {
    Router::new()
        .route("/", get(index))
        .route(
            "/webhook/receiver",
            post(receive_webhook::<S>).layer(DefaultBodyLimit::max(MAX_WEBHOOK_BYTES)),
        )
        .route("/api/logs", get(list_logs::<S>))
        .with_state(AppState { store })
}

/// Serves [`router`] on `0.0.0.0:{port}` until SIGINT or SIGTERM.
pub async fn serve<S: EntryStore>(port: u16, store: S) -> std::io::Result<()> {
    let app = router(store);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "GitHub activity log server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

fn event_header(headers: &HeaderMap) -> Option<&str> {
    EVENT_HEADERS
        .iter()
        .find_map(|name| headers.get(*name))
        .and_then(|v| v.to_str().ok())
}

#[instrument(
    name = "github.webhook",
    skip_all,
    fields(
        event = tracing::field::Empty,
        route = tracing::field::Empty,
        request_id = tracing::field::Empty,
    )
)]
async fn receive_webhook<S: EntryStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let event = event_header(&headers).ok_or(ApiError::MissingEventHeader)?;

    let span = tracing::Span::current();
    span.record("event", event);

    let kind = EventKind::parse(event).map_err(|e| match e {
        DispatchError::UnhandledEvent(event) => ApiError::UnhandledEvent(event),
    })?;

    let payload: Value =
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidJson(e.to_string()))?;

    let outcome = dispatch::route(kind, &payload).map(|route| {
        span.record("route", tracing::field::display(&route));
        dispatch::normalize(route)
    });

    match outcome {
        Ok(None) => info!("Event not logged"),
        Err(e) | Ok(Some(Err(e))) => {
            warn!(error = %e, malformed = e.is_malformed(), "Discarding webhook payload");
        }
        Ok(Some(Ok(entry))) => {
            span.record("request_id", entry.request_id());
            persist(&state.store, &entry).await;
        }
    }

    Ok(Json(json!({})))
}

// Write failures are not reported to GitHub; a 5xx would only trigger redeliveries.
async fn persist<S: EntryStore>(store: &S, entry: &Entry) {
    match store.insert(entry).await {
        Ok(id) => info!(id = %id, action = %entry.action(), "Entry stored"),
        Err(e) => error!(error = %e, action = %entry.action(), "Failed to store entry, dropping it"),
    }
}

async fn list_logs<S: EntryStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<StoredEntry>>, ApiError> {
    let entries = state
        .store
        .list_all()
        .await
        .map_err(|e| ApiError::FetchLogs(e.to_string()))?;
    Ok(Json(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn event_header_accepts_underscore_form() {
        let mut headers = HeaderMap::new();
        headers.insert("x_github_event", HeaderValue::from_static("push"));
        assert_eq!(event_header(&headers), Some("push"));
    }

    #[test]
    fn event_header_accepts_github_form() {
        let mut headers = HeaderMap::new();
        headers.insert("x-github-event", HeaderValue::from_static("pull_request"));
        assert_eq!(event_header(&headers), Some("pull_request"));
    }

    #[test]
    fn event_header_absent() {
        assert_eq!(event_header(&HeaderMap::new()), None);
    }

    #[test]
    fn landing_page_polls_logs_api() {
        assert!(INDEX_HTML.contains("/api/logs"));
    }
}
