//! Data models representing the remote issue facts the validator needs.

use serde::Deserialize;

/// State reported by GitHub for an issue that can back a justification.
pub const OPEN_STATE: &str = "open";

/// Minimal snapshot of a GitHub issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSnapshot {
    /// State (e.g. open, closed).
    pub state: String,
}

impl IssueSnapshot {
    /// Returns true when the issue is currently open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == OPEN_STATE
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiIssue {
    pub(super) state: String,
}

impl From<ApiIssue> for IssueSnapshot {
    fn from(value: ApiIssue) -> Self {
        Self { state: value.state }
    }
}
