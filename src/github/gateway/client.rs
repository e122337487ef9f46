//! Octocrab client construction helpers for gateway implementations.

use http::Uri;
use octocrab::Octocrab;

use crate::github::error::JustificationError;

/// Builds an Octocrab client for the given API base URL.
///
/// The client carries no credentials of its own. Each request supplies the
/// installation token minted for it, so one client can be shared by
/// concurrent validations.
///
/// # Errors
///
/// Returns `JustificationError::Configuration` when the base URI cannot be
/// parsed or Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(api_base: &str) -> Result<Octocrab, JustificationError> {
    let base_uri: Uri =
        api_base
            .parse::<Uri>()
            .map_err(|error| JustificationError::Configuration {
                message: format!("GitHub API base URL is invalid: {error}"),
            })?;

    Octocrab::builder()
        .base_uri(base_uri)
        .map_err(|error| JustificationError::Configuration {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| JustificationError::Configuration {
            message: format!("build client failed: {error}"),
        })
}
