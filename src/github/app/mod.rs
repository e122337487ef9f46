//! GitHub App authentication: signed app assertions and installation tokens.
//!
//! A validation never reuses a broad credential. Each call builds a fresh
//! [`TokenScope`] naming the single repository that holds the issue with
//! `issues: read`, and asks the [`AccessTokenSource`] for a token limited to
//! it. The trait keeps the exchange mockable; [`GitHubAppTokenSource`] is the
//! production implementation.

mod assertion;
mod credentials;
mod exchange;
mod scope;
mod token;

pub use assertion::DEFAULT_ASSERTION_CACHE_SECONDS;
pub use credentials::{AppCredentials, read_private_key};
pub use exchange::GitHubAppTokenSource;
pub use scope::TokenScope;
pub use token::InstallationToken;

use async_trait::async_trait;

use crate::github::error::JustificationError;
use crate::github::reference::IssueReference;

/// Source of installation access tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    /// Request an installation token restricted to `scope`.
    async fn access_token(&self, scope: &TokenScope)
    -> Result<InstallationToken, JustificationError>;
}

/// Obtains a token that can read issues in the referenced repository only.
///
/// # Errors
///
/// Returns [`JustificationError::AccessToken`] for any signing, transport or
/// identity-provider failure. Such failures never count as a verdict on the
/// justification.
pub async fn exchange_token<Source>(
    source: &Source,
    reference: &IssueReference,
) -> Result<InstallationToken, JustificationError>
where
    Source: AccessTokenSource + ?Sized,
{
    let scope = TokenScope::issues_read(reference.repository());
    source
        .access_token(&scope)
        .await
        .map_err(|error| match error {
            JustificationError::AccessToken { .. } => error,
            other => JustificationError::AccessToken {
                message: other.to_string(),
            },
        })
}
