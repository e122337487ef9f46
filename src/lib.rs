//! GitHub issue justification validator.
//!
//! The library decides whether a GitHub issue URL is an acceptable
//! justification for a privileged action. It parses the issue reference,
//! exchanges a GitHub App identity for an installation token scoped to the
//! issue's repository with `issues: read`, reads the issue through Octocrab,
//! and reports either a verdict or a fault that callers can tell apart.

pub mod config;
pub mod github;
pub mod plugin;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::PluginConfig;
pub use github::{IssueReference, JustificationError};
pub use plugin::{
    DisplayMetadata, GitHubPlugin, Justification, JustificationValidator, ValidationFault,
    ValidationOutcome,
};
