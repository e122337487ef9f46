//! reqwest implementation of the installation token exchange.

use async_trait::async_trait;
use chrono::Utc;
use http::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::github::error::JustificationError;
use crate::github::http_utils::{GITHUB_JSON_MEDIA_TYPE, extract_github_message};

use super::AccessTokenSource;
use super::assertion::{AssertionSigner, DEFAULT_ASSERTION_CACHE_SECONDS};
use super::credentials::AppCredentials;
use super::scope::TokenScope;
use super::token::InstallationToken;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    token: String,
}

/// Exchanges a signed GitHub App assertion for scoped installation tokens.
///
/// The HTTP client is shared by concurrent validations; the only mutable
/// state is the short-lived assertion cache.
pub struct GitHubAppTokenSource {
    client: Client,
    api_base: Url,
    signer: AssertionSigner,
}

impl GitHubAppTokenSource {
    /// Creates a token source for the given credentials and API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`JustificationError::Configuration`] when the HTTP client
    /// cannot be constructed.
    pub fn new(credentials: AppCredentials, api_base: Url) -> Result<Self, JustificationError> {
        Self::with_assertion_cache(credentials, api_base, DEFAULT_ASSERTION_CACHE_SECONDS)
    }

    /// Creates a token source that reuses signed assertions for
    /// `cache_seconds`. A zero window signs a fresh assertion per exchange.
    ///
    /// # Errors
    ///
    /// Returns [`JustificationError::Configuration`] when the HTTP client
    /// cannot be constructed.
    pub fn with_assertion_cache(
        credentials: AppCredentials,
        api_base: Url,
        cache_seconds: i64,
    ) -> Result<Self, JustificationError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|error| JustificationError::Configuration {
                message: format!("failed to configure GitHub HTTP client: {error}"),
            })?;

        Ok(Self {
            client,
            api_base,
            signer: AssertionSigner::new(credentials, cache_seconds),
        })
    }

    fn access_tokens_endpoint(&self) -> String {
        format!(
            "{}/app/installations/{}/access_tokens",
            self.api_base.as_str().trim_end_matches('/'),
            self.signer.credentials().installation_id()
        )
    }
}

fn map_exchange_status(status: StatusCode, body: &str) -> JustificationError {
    let message = extract_github_message(body).unwrap_or_else(|| "unknown error".to_owned());
    JustificationError::AccessToken {
        message: format!("token exchange failed with status {status}: {message}"),
    }
}

#[async_trait]
impl AccessTokenSource for GitHubAppTokenSource {
    async fn access_token(
        &self,
        scope: &TokenScope,
    ) -> Result<InstallationToken, JustificationError> {
        let assertion = self.signer.assertion(Utc::now().timestamp())?;

        let response = self
            .client
            .post(self.access_tokens_endpoint())
            .header(ACCEPT, GITHUB_JSON_MEDIA_TYPE)
            .bearer_auth(assertion)
            .json(scope)
            .send()
            .await
            .map_err(|error| JustificationError::AccessToken {
                message: format!("token exchange transport failed: {}", error.without_url()),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%status, "installation token exchange rejected");
            return Err(map_exchange_status(status, &body));
        }

        let payload: AccessTokenResponse =
            response
                .json()
                .await
                .map_err(|error| JustificationError::AccessToken {
                    message: format!(
                        "token exchange response decoding failed: {}",
                        error.without_url()
                    ),
                })?;

        InstallationToken::new(payload.token)
    }
}
