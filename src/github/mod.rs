//! GitHub issue lookup and installation token exchange.
//!
//! This module parses issue URLs, mints repository-scoped installation tokens
//! for a GitHub App, reads issue state through Octocrab, and classifies the
//! result. Errors are mapped into [`JustificationError`] variants so callers
//! can tell a rejected justification from a failed check without seeing
//! Octocrab or reqwest internals.

pub mod app;
pub mod error;
pub mod gateway;
mod http_utils;
pub mod models;
pub mod reference;
pub mod validator;

pub use app::{
    AccessTokenSource, AppCredentials, GitHubAppTokenSource, InstallationToken, TokenScope,
};
pub use error::JustificationError;
pub use gateway::{IssueGateway, OctocrabIssueGateway};
pub use models::IssueSnapshot;
pub use reference::{IssueNumber, IssueReference, RepositoryName, RepositoryOwner};
pub use validator::{GitHubIssueValidator, IssueValidator, ValidatorSettings};
