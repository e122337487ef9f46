//! Sequences parsing, token exchange and issue lookup for one issue URL.

use std::future::Future;
use std::time::Duration;

use tracing::Instrument;
use url::Url;

use super::app::{AccessTokenSource, AppCredentials, GitHubAppTokenSource, exchange_token};
use super::error::JustificationError;
use super::gateway::{IssueGateway, OctocrabIssueGateway};
use super::models::IssueSnapshot;
use super::reference::IssueReference;

/// Default bound on each network step of a validation.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Production validator: GitHub App token exchange plus Octocrab issue reads.
pub type GitHubIssueValidator = IssueValidator<GitHubAppTokenSource, OctocrabIssueGateway>;

/// Immutable settings the production validator is built from.
#[derive(Debug, Clone)]
pub struct ValidatorSettings {
    /// GitHub App identity used to mint installation tokens.
    pub credentials: AppCredentials,
    /// REST API base URL (for example `https://api.github.com`).
    pub api_base: Url,
    /// Upper bound for the token exchange and for the issue read.
    pub request_timeout: Duration,
}

/// Maps a fetched issue onto a verdict.
///
/// # Errors
///
/// Returns [`JustificationError::IssueNotOpen`] when the issue is in any
/// state other than `open`.
pub fn classify_issue(snapshot: &IssueSnapshot) -> Result<(), JustificationError> {
    if snapshot.is_open() {
        Ok(())
    } else {
        Err(JustificationError::IssueNotOpen {
            state: snapshot.state.clone(),
        })
    }
}

/// Checks that an issue URL names an existing, open GitHub issue.
///
/// Holds no per-call state: concurrent calls share only the read-only
/// collaborators passed at construction.
pub struct IssueValidator<Tokens, Gateway>
where
    Tokens: AccessTokenSource,
    Gateway: IssueGateway,
{
    tokens: Tokens,
    gateway: Gateway,
    request_timeout: Duration,
}

impl GitHubIssueValidator {
    /// Builds the production validator.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`JustificationError::Configuration`] when either HTTP client
    /// cannot be constructed.
    pub fn from_settings(settings: ValidatorSettings) -> Result<Self, JustificationError> {
        let gateway = OctocrabIssueGateway::for_api_base(&settings.api_base)?;
        let tokens = GitHubAppTokenSource::new(settings.credentials, settings.api_base)?;
        Ok(Self::new(tokens, gateway, settings.request_timeout))
    }
}

impl<Tokens, Gateway> IssueValidator<Tokens, Gateway>
where
    Tokens: AccessTokenSource,
    Gateway: IssueGateway,
{
    /// Creates a validator from its collaborators.
    #[must_use]
    pub const fn new(tokens: Tokens, gateway: Gateway, request_timeout: Duration) -> Self {
        Self {
            tokens,
            gateway,
            request_timeout,
        }
    }

    /// Parses `issue_url` and verifies the issue exists and is open.
    ///
    /// Returns the parsed reference on success. The installation token is
    /// requested for this call only and dropped before returning.
    ///
    /// # Errors
    ///
    /// Verdicts: [`JustificationError::InvalidIssueUrl`],
    /// [`JustificationError::IssueNotFound`] and
    /// [`JustificationError::IssueNotOpen`]. Faults:
    /// [`JustificationError::AccessToken`] and
    /// [`JustificationError::IssueLookup`], including timeouts.
    pub async fn match_issue(&self, issue_url: &str) -> Result<IssueReference, JustificationError> {
        let reference = IssueReference::parse(issue_url)?;
        let span = tracing::info_span!(
            "match_issue",
            owner = reference.owner().as_str(),
            repository = reference.repository().as_str(),
            number = reference.number().get()
        );

        async {
            let token = bounded(self.request_timeout, exchange_token(&self.tokens, &reference))
                .await
                .map_err(|elapsed| JustificationError::AccessToken {
                    message: format!("token exchange timed out after {elapsed:?}"),
                })??;

            let snapshot = bounded(self.request_timeout, self.gateway.issue(&reference, &token))
                .await
                .map_err(|elapsed| JustificationError::IssueLookup {
                    message: format!("issue read timed out after {elapsed:?}"),
                })??;

            classify_issue(&snapshot)?;
            tracing::debug!("issue is open");
            Ok::<_, JustificationError>(reference)
        }
        .instrument(span)
        .await
    }
}

/// Runs `future` under `limit`, returning the limit when it elapses.
async fn bounded<F>(limit: Duration, future: F) -> Result<F::Output, Duration>
where
    F: Future,
{
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| limit)
}
