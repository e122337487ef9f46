//! Installation access token wrapper.

use std::fmt;

use crate::github::error::JustificationError;

/// Short-lived bearer credential for a single validation.
///
/// The value is never printed through `Debug` and is dropped once the
/// validation that requested it completes.
#[derive(Clone, PartialEq, Eq)]
pub struct InstallationToken(String);

impl InstallationToken {
    /// Wraps a token returned by GitHub.
    ///
    /// # Errors
    ///
    /// Returns [`JustificationError::AccessToken`] when the token is blank.
    pub fn new(token: impl Into<String>) -> Result<Self, JustificationError> {
        let value = token.into();
        if value.trim().is_empty() {
            return Err(JustificationError::AccessToken {
                message: "GitHub returned an empty installation token".to_owned(),
            });
        }
        Ok(Self(value))
    }

    /// Borrow the raw token for use in an `Authorization` header.
    #[must_use]
    pub const fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for InstallationToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("InstallationToken(<redacted>)")
    }
}
