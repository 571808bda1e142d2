//! Typed views over the parts of GitHub webhook payloads this service reads.
//!
//! Every field is optional. GitHub sends far more than is modelled here and
//! unknown keys are ignored; a missing key shows up as `None` at the accessor
//! instead of failing the whole parse.

use serde::Deserialize;
use serde_json::Number;
use std::fmt;

/// An identifier GitHub may send as either a JSON number or a string.
/// Any number is accepted and rendered as written, sign and fraction included.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(Number),
    Text(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// `push` event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushEvent {
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    pub head_commit: Option<Commit>,
}

impl PushEvent {
    /// Last `/`-separated segment of `ref`, e.g. `main` for `refs/heads/main`.
    pub fn branch(&self) -> Option<&str> {
        self.git_ref
            .as_deref()
            .map(|r| r.rsplit('/').next().unwrap_or(r))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Commit {
    pub id: Option<Identifier>,
    pub author: Option<CommitAuthor>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitAuthor {
    pub username: Option<String>,
}

/// `pull_request` event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullRequestEvent {
    pub action: Option<String>,
    pub pull_request: Option<PullRequest>,
}

impl PullRequestEvent {
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// `true` only when GitHub explicitly reports `pull_request.merged: true`.
    pub fn is_merged(&self) -> bool {
        self.pull_request
            .as_ref()
            .and_then(|pr| pr.merged)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullRequest {
    pub id: Option<Identifier>,
    pub user: Option<User>,
    pub merged_by: Option<User>,
    pub merged: Option<bool>,
    pub head: Option<BranchRef>,
    pub base: Option<BranchRef>,
    pub created_at: Option<String>,
    pub closed_at: Option<String>,
}

impl PullRequest {
    pub fn author_login(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.login.as_deref())
    }

    pub fn merged_by_login(&self) -> Option<&str> {
        self.merged_by.as_ref().and_then(|u| u.login.as_deref())
    }

    pub fn head_ref(&self) -> Option<&str> {
        self.head.as_ref().and_then(|b| b.git_ref.as_deref())
    }

    pub fn base_ref(&self) -> Option<&str> {
        self.base.as_ref().and_then(|b| b.git_ref.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    pub login: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BranchRef {
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn push_branch_is_last_ref_segment() {
        let push: PushEvent =
            serde_json::from_value(json!({ "ref": "refs/heads/feature/login" })).unwrap();
        assert_eq!(push.branch(), Some("login"));
    }

    #[test]
    fn push_branch_without_slash_is_whole_ref() {
        let push: PushEvent = serde_json::from_value(json!({ "ref": "main" })).unwrap();
        assert_eq!(push.branch(), Some("main"));
    }

    #[test]
    fn absent_keys_become_none() {
        let push: PushEvent = serde_json::from_value(json!({})).unwrap();
        assert!(push.branch().is_none());
        assert!(push.head_commit.is_none());
    }

    #[test]
    fn null_merged_by_is_none() {
        let event: PullRequestEvent = serde_json::from_value(json!({
            "action": "closed",
            "pull_request": { "merged": true, "merged_by": null }
        }))
        .unwrap();

        assert!(event.is_merged());
        assert!(event.pull_request.unwrap().merged_by_login().is_none());
    }

    #[test]
    fn identifier_accepts_numbers_and_strings() {
        let n: Identifier = serde_json::from_value(json!(42)).unwrap();
        let s: Identifier = serde_json::from_value(json!("abc")).unwrap();
        assert_eq!(n.to_string(), "42");
        assert_eq!(s.to_string(), "abc");
    }

    #[test]
    fn identifier_accepts_negative_and_fractional_numbers() {
        let negative: Identifier = serde_json::from_value(json!(-5)).unwrap();
        let fractional: Identifier = serde_json::from_value(json!(1.5)).unwrap();
        assert_eq!(negative.to_string(), "-5");
        assert_eq!(fractional.to_string(), "1.5");
    }

    #[test]
    fn missing_merged_flag_is_not_merged() {
        let event: PullRequestEvent =
            serde_json::from_value(json!({ "action": "closed", "pull_request": {} })).unwrap();
        assert!(!event.is_merged());
    }

    #[test]
    fn unexpected_types_fail_to_parse() {
        let result = serde_json::from_value::<PushEvent>(json!({ "ref": 7 }));
        assert!(result.is_err());
    }
}
