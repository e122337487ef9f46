//! Gateways for reading issue state through Octocrab.
//!
//! The trait-based design enables mocking in tests while the Octocrab
//! implementation performs the single authenticated read per validation.

mod client;
mod error_mapping;
mod issue;

pub use issue::OctocrabIssueGateway;

use async_trait::async_trait;

use crate::github::app::InstallationToken;
use crate::github::error::JustificationError;
use crate::github::models::IssueSnapshot;
use crate::github::reference::IssueReference;

/// Gateway that can read the current state of an issue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueGateway: Send + Sync {
    /// Fetch the issue using `token` for authentication.
    ///
    /// A missing issue yields [`JustificationError::IssueNotFound`]; every
    /// other failure yields [`JustificationError::IssueLookup`].
    async fn issue(
        &self,
        reference: &IssueReference,
        token: &InstallationToken,
    ) -> Result<IssueSnapshot, JustificationError>;
}
