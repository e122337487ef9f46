//! Octocrab implementation of the issue gateway.

use async_trait::async_trait;
use http::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use http::Uri;
use octocrab::Octocrab;
use url::Url;

use crate::github::app::InstallationToken;
use crate::github::error::JustificationError;
use crate::github::http_utils::{GITHUB_JSON_MEDIA_TYPE, extract_github_message};
use crate::github::models::{ApiIssue, IssueSnapshot};
use crate::github::reference::IssueReference;

use super::IssueGateway;
use super::client::build_octocrab_client;
use super::error_mapping::{describe_octocrab_error, map_http_error, map_octocrab_error};

const OPERATION: &str = "issue";

/// Octocrab-backed issue gateway.
pub struct OctocrabIssueGateway {
    client: Octocrab,
}

impl OctocrabIssueGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an unauthenticated Octocrab client rooted at `api_base`.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `JustificationError::Configuration` when the base URI cannot
    /// be parsed or Octocrab fails to construct a client.
    pub fn for_api_base(api_base: &Url) -> Result<Self, JustificationError> {
        let octocrab = build_octocrab_client(api_base.as_str())?;
        Ok(Self::new(octocrab))
    }
}

fn build_issue_headers(token: &InstallationToken) -> Result<HeaderMap, JustificationError> {
    let mut authorization = HeaderValue::from_str(&format!("Bearer {}", token.expose()))
        .map_err(|_| JustificationError::IssueLookup {
            message: "installation token is not a valid header value".to_owned(),
        })?;
    authorization.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON_MEDIA_TYPE));
    headers.insert(AUTHORIZATION, authorization);
    Ok(headers)
}

#[async_trait]
impl IssueGateway for OctocrabIssueGateway {
    async fn issue(
        &self,
        reference: &IssueReference,
        token: &InstallationToken,
    ) -> Result<IssueSnapshot, JustificationError> {
        let uri: Uri = reference.issue_path().parse::<Uri>().map_err(|error| {
            JustificationError::IssueLookup {
                message: format!("issue path is not a valid URI: {error}"),
            }
        })?;
        let headers = build_issue_headers(token)?;

        let response = self
            .client
            ._get_with_headers(uri, Some(headers))
            .await
            .map_err(|error| map_octocrab_error(OPERATION, &error))?;

        let status = response.status();
        if !status.is_success() {
            let body = self
                .client
                .body_to_string(response)
                .await
                .unwrap_or_else(|_| String::new());
            return Err(map_http_error(OPERATION, status, extract_github_message(&body)));
        }

        let body = self
            .client
            .body_to_string(response)
            .await
            .map_err(|error| JustificationError::IssueLookup {
                message: format!(
                    "issue response decode failed: {}",
                    describe_octocrab_error(&error)
                ),
            })?;

        let api: ApiIssue =
            serde_json::from_str(&body).map_err(|error| JustificationError::IssueLookup {
                message: format!("issue response deserialisation failed: {error}"),
            })?;

        Ok(api.into())
    }
}
