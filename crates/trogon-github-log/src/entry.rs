use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of repository activity an [`Entry`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Push,
    PullRequest,
    Merge,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Push => "PUSH",
            Self::PullRequest => "PULL_REQUEST",
            Self::Merge => "MERGE",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unvalidated field values pulled out of a webhook payload.
#[derive(Debug, Clone, Default)]
pub struct EntryCandidate {
    pub request_id: Option<String>,
    pub author: Option<String>,
    pub from_branch: Option<String>,
    pub to_branch: Option<String>,
    pub timestamp: Option<String>,
}

/// Names every required field that was absent or empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid entry: missing or empty {}", .fields.join(", "))]
pub struct ValidationError {
    pub fields: Vec<&'static str>,
}

/// A normalized record of one webhook-triggered repository event.
///
/// Fields are private: an `Entry` only exists once [`Entry::new`] has
/// accepted every required field, and it is never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEntry")]
pub struct Entry {
    request_id: String,
    author: String,
    action: Action,
    from_branch: String,
    to_branch: String,
    timestamp: String,
}

impl Entry {
    pub fn new(action: Action, candidate: EntryCandidate) -> Result<Self, ValidationError> {
        let mut missing = Vec::new();
        let mut require = |name: &'static str, value: Option<String>| match value {
            Some(v) if !v.is_empty() => v,
            _ => {
                missing.push(name);
                String::new()
            }
        };

        let request_id = require("request_id", candidate.request_id);
        let author = require("author", candidate.author);
        let from_branch = require("from_branch", candidate.from_branch);
        let to_branch = require("to_branch", candidate.to_branch);
        let timestamp = require("timestamp", candidate.timestamp);

        if !missing.is_empty() {
            return Err(ValidationError { fields: missing });
        }

        Ok(Self {
            request_id,
            author,
            action,
            from_branch,
            to_branch,
            timestamp,
        })
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn from_branch(&self) -> &str {
        &self.from_branch
    }

    pub fn to_branch(&self) -> &str {
        &self.to_branch
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

// Documents read back from the store go through the same checks as fresh ones.
#[derive(Deserialize)]
struct RawEntry {
    request_id: Option<String>,
    author: Option<String>,
    action: Action,
    from_branch: Option<String>,
    to_branch: Option<String>,
    timestamp: Option<String>,
}

impl TryFrom<RawEntry> for Entry {
    type Error = ValidationError;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        Entry::new(
            raw.action,
            EntryCandidate {
                request_id: raw.request_id,
                author: raw.author,
                from_branch: raw.from_branch,
                to_branch: raw.to_branch,
                timestamp: raw.timestamp,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_candidate() -> EntryCandidate {
        EntryCandidate {
            request_id: Some("abc123".to_string()),
            author: Some("alice".to_string()),
            from_branch: Some("feature".to_string()),
            to_branch: Some("main".to_string()),
            timestamp: Some("2024-01-01T00:00:00Z".to_string()),
        }
    }

    #[test]
    fn accepts_complete_candidate() {
        let entry = Entry::new(Action::PullRequest, full_candidate()).unwrap();

        assert_eq!(entry.request_id(), "abc123");
        assert_eq!(entry.author(), "alice");
        assert_eq!(entry.action(), Action::PullRequest);
        assert_eq!(entry.from_branch(), "feature");
        assert_eq!(entry.to_branch(), "main");
        assert_eq!(entry.timestamp(), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn reports_every_missing_field() {
        let candidate = EntryCandidate {
            author: Some("alice".to_string()),
            ..Default::default()
        };

        let err = Entry::new(Action::Push, candidate).unwrap_err();

        assert_eq!(
            err.fields,
            vec!["request_id", "from_branch", "to_branch", "timestamp"]
        );
    }

    #[test]
    fn empty_author_is_rejected() {
        let candidate = EntryCandidate {
            author: Some(String::new()),
            ..full_candidate()
        };

        let err = Entry::new(Action::Merge, candidate).unwrap_err();

        assert_eq!(err.fields, vec!["author"]);
        assert_eq!(err.to_string(), "invalid entry: missing or empty author");
    }

    #[test]
    fn action_serializes_to_upper_snake_case() {
        assert_eq!(serde_json::to_string(&Action::Push).unwrap(), r#""PUSH""#);
        assert_eq!(
            serde_json::to_string(&Action::PullRequest).unwrap(),
            r#""PULL_REQUEST""#
        );
        assert_eq!(serde_json::to_string(&Action::Merge).unwrap(), r#""MERGE""#);
        assert_eq!(Action::PullRequest.to_string(), "PULL_REQUEST");
    }

    #[test]
    fn deserialize_rejects_unknown_action() {
        let json = r#"{"request_id":"1","author":"a","action":"DELETE","from_branch":"x","to_branch":"y","timestamp":"t"}"#;
        assert!(serde_json::from_str::<Entry>(json).is_err());
    }

    #[test]
    fn deserialize_rejects_empty_required_field() {
        let json = r#"{"request_id":"","author":"a","action":"PUSH","from_branch":"x","to_branch":"y","timestamp":"t"}"#;
        assert!(serde_json::from_str::<Entry>(json).is_err());
    }

    #[test]
    fn serde_keeps_field_values() {
        let entry = Entry::new(Action::Merge, full_candidate()).unwrap();
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["action"], "MERGE");
        assert_eq!(json["from_branch"], "feature");

        let back: Entry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }
}
