//! Fixtures shared by unit and behavioural tests.

use crate::config::PluginConfig;
use crate::github::{AppCredentials, JustificationError};

/// 2048-bit RSA key (PKCS#1 PEM) used to sign test app assertions.
pub const TEST_APP_PRIVATE_KEY_PEM: &str = include_str!("../tests/fixtures/app-private-key.pem");

/// Public half of [`TEST_APP_PRIVATE_KEY_PEM`], for verifying assertions.
pub const TEST_APP_PUBLIC_KEY_PEM: &str = include_str!("../tests/fixtures/app-public-key.pem");

/// GitHub App identifier used in tests.
pub const TEST_APP_ID: &str = "123456";

/// Installation identifier used in tests.
pub const TEST_INSTALLATION_ID: &str = "12345678";

/// Credentials built from the test identifiers and key.
///
/// # Errors
///
/// Returns [`JustificationError::PrivateKey`] if the fixture key is corrupt.
pub fn test_credentials() -> Result<AppCredentials, JustificationError> {
    AppCredentials::from_pem(TEST_APP_ID, TEST_INSTALLATION_ID, TEST_APP_PRIVATE_KEY_PEM)
}

/// Complete configuration pointing both GitHub endpoints at `api_base_url`.
#[must_use]
pub fn test_plugin_config(api_base_url: &str) -> PluginConfig {
    PluginConfig {
        app_id: Some(TEST_APP_ID.to_owned()),
        app_installation_id: Some(TEST_INSTALLATION_ID.to_owned()),
        app_private_key_pem: Some(TEST_APP_PRIVATE_KEY_PEM.to_owned()),
        api_base_url: api_base_url.to_owned(),
        plugin_display_name: "test DisplayName".to_owned(),
        plugin_hint: "test Hint".to_owned(),
        ..PluginConfig::default()
    }
}
