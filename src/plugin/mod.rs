//! Justification validator facade exposed to the hosting service.
//!
//! [`GitHubPlugin`] answers a single question for the host: does a
//! `github` justification point at an open GitHub issue? It separates two
//! kinds of failure:
//!
//! - a rejected justification is an `Ok` [`ValidationOutcome`] with
//!   `valid == false` and an explanatory message;
//! - a failure to perform the check is an `Err` [`ValidationFault`], which
//!   the host must not record as a rejection.
//!
//! The facade has no dependency on any RPC framework; transports wrap the
//! [`JustificationValidator`] trait.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PluginConfig;
use crate::github::{
    AccessTokenSource, GitHubIssueValidator, IssueGateway, IssueReference, IssueValidator,
    JustificationError,
};

/// Justification category this plugin validates.
pub const GITHUB_CATEGORY: &str = "github";

/// Annotation key holding the justification value as supplied.
pub const ANNOTATION_ISSUE_URL: &str = "issue_url";
/// Annotation key holding the repository owner.
pub const ANNOTATION_ISSUE_OWNER: &str = "issue_owner";
/// Annotation key holding the repository name.
pub const ANNOTATION_ISSUE_REPO: &str = "issue_repo";
/// Annotation key holding the issue number.
pub const ANNOTATION_ISSUE_NUMBER: &str = "issue_number";

/// A caller-supplied claim offered to authorise a privileged action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Justification {
    /// Justification category, e.g. `github`.
    pub category: String,
    /// Category-specific value; an issue URL for `github`.
    pub value: String,
}

impl Justification {
    /// Creates a justification from its category and value.
    #[must_use]
    pub fn new(category: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            value: value.into(),
        }
    }
}

/// Display strings the host shows next to the justification input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMetadata {
    /// Name of the justification category.
    pub display_name: String,
    /// Hint describing what value to enter.
    pub hint: String,
}

/// Result of a completed check.
///
/// `annotations` is only populated for valid justifications and `errors` is
/// empty exactly when the justification is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// Whether the justification is accepted.
    pub valid: bool,
    /// Facts recorded about an accepted justification.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    /// Reasons for rejection.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ValidationOutcome {
    /// Outcome for an accepted justification.
    #[must_use]
    pub const fn accepted(annotations: BTreeMap<String, String>) -> Self {
        Self {
            valid: true,
            annotations,
            errors: Vec::new(),
        }
    }

    /// Outcome for a rejected justification with a single reason.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            annotations: BTreeMap::new(),
            errors: vec![reason.into()],
        }
    }
}

/// The check could not be completed; nothing is known about the
/// justification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{source}")]
pub struct ValidationFault {
    #[source]
    source: JustificationError,
}

impl ValidationFault {
    /// Underlying failure.
    #[must_use]
    pub const fn cause(&self) -> &JustificationError {
        &self.source
    }
}

impl From<JustificationError> for ValidationFault {
    fn from(source: JustificationError) -> Self {
        Self { source }
    }
}

/// Narrow interface a host transport adapter wraps.
#[async_trait]
pub trait JustificationValidator: Send + Sync {
    /// Validates `justification`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFault`] when the check could not be completed.
    async fn validate(
        &self,
        justification: &Justification,
    ) -> Result<ValidationOutcome, ValidationFault>;

    /// Static display metadata.
    fn display_metadata(&self) -> DisplayMetadata;
}

/// Checks that an issue URL refers to an existing, open issue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueMatcher: Send + Sync {
    /// Returns the parsed reference when the issue is valid.
    async fn match_issue(&self, issue_url: &str) -> Result<IssueReference, JustificationError>;
}

#[async_trait]
impl<Tokens, Gateway> IssueMatcher for IssueValidator<Tokens, Gateway>
where
    Tokens: AccessTokenSource,
    Gateway: IssueGateway,
{
    async fn match_issue(&self, issue_url: &str) -> Result<IssueReference, JustificationError> {
        Self::match_issue(self, issue_url).await
    }
}

/// GitHub issue justification validator.
pub struct GitHubPlugin<Matcher = GitHubIssueValidator>
where
    Matcher: IssueMatcher,
{
    matcher: Matcher,
    display: DisplayMetadata,
}

impl GitHubPlugin {
    /// Builds the production plugin from validated configuration.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`JustificationError::Configuration`] for missing or malformed
    /// settings and [`JustificationError::PrivateKey`] when the private key
    /// cannot be decoded.
    pub fn from_config(config: &PluginConfig) -> Result<Self, JustificationError> {
        let settings = config.validator_settings()?;
        let matcher = GitHubIssueValidator::from_settings(settings)?;
        Ok(Self::new(matcher, config.display_metadata()))
    }
}

impl<Matcher> GitHubPlugin<Matcher>
where
    Matcher: IssueMatcher,
{
    /// Creates a plugin around an issue matcher.
    #[must_use]
    pub const fn new(matcher: Matcher, display: DisplayMetadata) -> Self {
        Self { matcher, display }
    }
}

fn annotations_for(issue_url: &str, reference: &IssueReference) -> BTreeMap<String, String> {
    BTreeMap::from([
        (ANNOTATION_ISSUE_URL.to_owned(), issue_url.to_owned()),
        (
            ANNOTATION_ISSUE_OWNER.to_owned(),
            reference.owner().as_str().to_owned(),
        ),
        (
            ANNOTATION_ISSUE_REPO.to_owned(),
            reference.repository().as_str().to_owned(),
        ),
        (
            ANNOTATION_ISSUE_NUMBER.to_owned(),
            reference.number().to_string(),
        ),
    ])
}

#[async_trait]
impl<Matcher> JustificationValidator for GitHubPlugin<Matcher>
where
    Matcher: IssueMatcher,
{
    async fn validate(
        &self,
        justification: &Justification,
    ) -> Result<ValidationOutcome, ValidationFault> {
        if justification.category != GITHUB_CATEGORY {
            return Ok(ValidationOutcome::rejected(format!(
                "failed to perform validation, expected category {:?} to be {GITHUB_CATEGORY:?}",
                justification.category
            )));
        }

        match self.matcher.match_issue(&justification.value).await {
            Ok(reference) => Ok(ValidationOutcome::accepted(annotations_for(
                &justification.value,
                &reference,
            ))),
            Err(error) if error.is_invalid_justification() => {
                tracing::info!(reason = %error, "justification rejected");
                Ok(ValidationOutcome::rejected(error.to_string()))
            }
            Err(error) => {
                tracing::warn!(error = %error, "justification check failed");
                Err(ValidationFault::from(error))
            }
        }
    }

    fn display_metadata(&self) -> DisplayMetadata {
        self.display.clone()
    }
}
