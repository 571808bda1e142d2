//! Chooses which normalizer, if any, applies to an inbound webhook.

use serde::Deserialize;
use serde_json::Value;
use std::fmt;

use crate::entry::Entry;
use crate::normalize::{self, NormalizeError};
use crate::payload::{PullRequestEvent, PushEvent};

/// Event types this service understands, taken from the `X_GITHUB_EVENT` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Push,
    PullRequest,
}

impl EventKind {
    pub fn parse(header: &str) -> Result<Self, DispatchError> {
        match header {
            "push" => Ok(Self::Push),
            "pull_request" => Ok(Self::PullRequest),
            other => Err(DispatchError::UnhandledEvent(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("unhandled event type: {0}")]
    UnhandledEvent(String),
}

/// Outcome of inspecting an event's type and action, carrying the decoded
/// payload the selected mapping needs.
#[derive(Debug, Clone)]
pub enum Route {
    Push(PushEvent),
    PullRequestOpened(PullRequestEvent),
    PullRequestMerged(PullRequestEvent),
    /// Recognized event type whose action is not logged, e.g. a pull request
    /// closed without merging.
    Ignored { action: Option<String> },
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push(_) => f.write_str("push"),
            Self::PullRequestOpened(_) => f.write_str("pull_request.opened"),
            Self::PullRequestMerged(_) => f.write_str("pull_request.merged"),
            Self::Ignored { action: Some(a) } => write!(f, "ignored ({a})"),
            Self::Ignored { action: None } => f.write_str("ignored"),
        }
    }
}

/// Decodes `body` as the payload of `kind` and picks its route.
///
/// Fails with [`NormalizeError::Shape`] when a modelled field has the wrong
/// JSON type.
pub fn route(kind: EventKind, body: &Value) -> Result<Route, NormalizeError> {
    let route = match kind {
        EventKind::Push => Route::Push(PushEvent::deserialize(body)?),
        EventKind::PullRequest => {
            let event = PullRequestEvent::deserialize(body)?;
            match event.action() {
                Some("opened") => Route::PullRequestOpened(event),
                Some("closed") if event.is_merged() => Route::PullRequestMerged(event),
                other => Route::Ignored {
                    action: other.map(str::to_owned),
                },
            }
        }
    };
    Ok(route)
}

/// Runs the mapping selected by `route`. `None` means nothing is logged.
pub fn normalize(route: Route) -> Option<Result<Entry, NormalizeError>> {
    match route {
        Route::Push(event) => Some(normalize::push(event)),
        Route::PullRequestOpened(event) => Some(normalize::pull_request_opened(event)),
        Route::PullRequestMerged(event) => Some(normalize::pull_request_merged(event)),
        Route::Ignored { .. } => None,
    }
}
