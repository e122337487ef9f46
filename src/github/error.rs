//! Error types exposed by the issue justification layer.

use thiserror::Error;

/// Errors surfaced while checking a GitHub issue justification.
///
/// The variants split into two families. Verdicts ([`Self::InvalidIssueUrl`],
/// [`Self::IssueNotFound`] and [`Self::IssueNotOpen`]) mean the justification
/// itself was rejected. Every other variant means the check could not be
/// completed and says nothing about the justification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JustificationError {
    /// The supplied value is not a GitHub issue URL.
    #[error("invalid issue url: {0}")]
    InvalidIssueUrl(String),

    /// GitHub reported that the issue does not exist.
    #[error("issue not found")]
    IssueNotFound,

    /// The issue exists but is not open.
    #[error("issue is in state: {state}, please make sure to use an open issue")]
    IssueNotOpen {
        /// State reported by GitHub (for example `closed`).
        state: String,
    },

    /// The installation token could not be obtained.
    #[error("failed to get access token: {message}")]
    AccessToken {
        /// Detail about the signing or exchange failure.
        message: String,
    },

    /// The issue could not be read for a reason other than absence.
    #[error("failed to get issue info: {message}")]
    IssueLookup {
        /// Transport, status, or decoding detail.
        message: String,
    },

    /// The GitHub App private key is not a usable RSA PEM key.
    #[error("failed to decode PEM formatted key: {message}")]
    PrivateKey {
        /// Decoder detail.
        message: String,
    },

    /// Configuration is missing or malformed.
    #[error("invalid configuration: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

impl JustificationError {
    /// Returns true when the error is a negative verdict on the justification
    /// rather than a failure to perform the check.
    #[must_use]
    pub const fn is_invalid_justification(&self) -> bool {
        matches!(
            self,
            Self::InvalidIssueUrl(_) | Self::IssueNotFound | Self::IssueNotOpen { .. }
        )
    }
}
