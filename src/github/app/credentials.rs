//! GitHub App identity material.

use std::fmt;

use jsonwebtoken::EncodingKey;

use crate::github::error::JustificationError;

/// Decodes a PEM encoded RSA private key into a JWT signing key.
///
/// Both PKCS#1 (`RSA PRIVATE KEY`) and PKCS#8 (`PRIVATE KEY`) encodings are
/// accepted.
///
/// # Errors
///
/// Returns [`JustificationError::PrivateKey`] when the input is not PEM or
/// does not hold an RSA key.
pub fn read_private_key(private_key_pem: &str) -> Result<EncodingKey, JustificationError> {
    EncodingKey::from_rsa_pem(private_key_pem.as_bytes()).map_err(|error| {
        JustificationError::PrivateKey {
            message: error.to_string(),
        }
    })
}

/// GitHub App identifier, installation identifier and signing key.
///
/// Established once at construction and never mutated.
#[derive(Clone)]
pub struct AppCredentials {
    app_id: String,
    installation_id: String,
    signing_key: EncodingKey,
}

impl AppCredentials {
    /// Creates credentials from an already decoded signing key.
    #[must_use]
    pub fn new(
        app_id: impl Into<String>,
        installation_id: impl Into<String>,
        signing_key: EncodingKey,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            installation_id: installation_id.into(),
            signing_key,
        }
    }

    /// Creates credentials from a PEM encoded RSA private key.
    ///
    /// # Errors
    ///
    /// Returns [`JustificationError::PrivateKey`] when the key cannot be
    /// decoded.
    pub fn from_pem(
        app_id: impl Into<String>,
        installation_id: impl Into<String>,
        private_key_pem: &str,
    ) -> Result<Self, JustificationError> {
        let signing_key = read_private_key(private_key_pem)?;
        Ok(Self::new(app_id, installation_id, signing_key))
    }

    /// GitHub App identifier, used as the JWT issuer.
    #[must_use]
    pub const fn app_id(&self) -> &str {
        self.app_id.as_str()
    }

    /// Installation the access tokens are minted for.
    #[must_use]
    pub const fn installation_id(&self) -> &str {
        self.installation_id.as_str()
    }

    pub(super) const fn signing_key(&self) -> &EncodingKey {
        &self.signing_key
    }
}

impl fmt::Debug for AppCredentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AppCredentials")
            .field("app_id", &self.app_id)
            .field("installation_id", &self.installation_id)
            .field("signing_key", &"<redacted>")
            .finish()
    }
}
