//! Maps GitHub webhook payloads onto [`Entry`] values.

use crate::entry::{Action, Entry, EntryCandidate, ValidationError};
use crate::payload::{PullRequest, PullRequestEvent, PushEvent};

/// Author recorded for merges whose payload carries no `merged_by` user.
pub const UNKNOWN_AUTHOR: &str = "unknown";

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("malformed payload: missing `{0}`")]
    MissingField(&'static str),
    #[error("malformed payload: {0}")]
    Shape(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl NormalizeError {
    pub fn is_malformed(&self) -> bool {
        !matches!(self, Self::Validation(_))
    }
}

pub fn push(event: PushEvent) -> Result<Entry, NormalizeError> {
    let branch = event.branch().map(str::to_owned);

    let commit = event
        .head_commit
        .ok_or(NormalizeError::MissingField("head_commit"))?;
    let author = commit
        .author
        .ok_or(NormalizeError::MissingField("head_commit.author"))?;
    let id = commit
        .id
        .ok_or(NormalizeError::MissingField("head_commit.id"))?;

    let entry = Entry::new(
        Action::Push,
        EntryCandidate {
            request_id: Some(id.to_string()),
            author: author.username,
            from_branch: branch.clone(),
            to_branch: branch,
            timestamp: commit.timestamp,
        },
    )?;
    Ok(entry)
}

pub fn pull_request_opened(event: PullRequestEvent) -> Result<Entry, NormalizeError> {
    let pr = pull_request_of(event)?;
    let entry = Entry::new(
        Action::PullRequest,
        EntryCandidate {
            author: pr.author_login().map(str::to_owned),
            timestamp: pr.created_at.clone(),
            ..branches_and_id(&pr)
        },
    )?;
    Ok(entry)
}

pub fn pull_request_merged(event: PullRequestEvent) -> Result<Entry, NormalizeError> {
    let pr = pull_request_of(event)?;
    let author = pr.merged_by_login().unwrap_or(UNKNOWN_AUTHOR).to_owned();
    let entry = Entry::new(
        Action::Merge,
        EntryCandidate {
            author: Some(author),
            timestamp: pr.closed_at.clone(),
            ..branches_and_id(&pr)
        },
    )?;
    Ok(entry)
}

fn pull_request_of(event: PullRequestEvent) -> Result<PullRequest, NormalizeError> {
    event
        .pull_request
        .ok_or(NormalizeError::MissingField("pull_request"))
}

fn branches_and_id(pr: &PullRequest) -> EntryCandidate {
    EntryCandidate {
        request_id: pr.id.as_ref().map(ToString::to_string),
        from_branch: pr.head_ref().map(str::to_owned),
        to_branch: pr.base_ref().map(str::to_owned),
        ..Default::default()
    }
}
