//! Signed GitHub App assertions (JWTs) with short-lived reuse.

use std::sync::{Mutex, PoisonError};

use jsonwebtoken::{Algorithm, Header, encode};
use serde::{Deserialize, Serialize};

use crate::github::error::JustificationError;

use super::credentials::AppCredentials;

/// Default reuse window for a signed assertion.
pub const DEFAULT_ASSERTION_CACHE_SECONDS: i64 = 60;

/// GitHub tolerates some clock drift; issue the assertion slightly in the
/// past.
const ISSUED_AT_BACKDATE_SECONDS: i64 = 60;

/// GitHub rejects assertions that live longer than ten minutes.
const ASSERTION_LIFETIME_SECONDS: i64 = 540;

/// Claims GitHub expects in an app assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct AppClaims {
    pub(crate) iat: i64,
    pub(crate) exp: i64,
    pub(crate) iss: String,
}

#[derive(Debug)]
struct CachedAssertion {
    jwt: String,
    minted_at_unix: i64,
}

/// Signs app assertions and reuses them for a bounded window.
pub(crate) struct AssertionSigner {
    credentials: AppCredentials,
    cache_seconds: i64,
    cached: Mutex<Option<CachedAssertion>>,
}

impl AssertionSigner {
    pub(crate) const fn new(credentials: AppCredentials, cache_seconds: i64) -> Self {
        Self {
            credentials,
            cache_seconds,
            cached: Mutex::new(None),
        }
    }

    pub(crate) const fn credentials(&self) -> &AppCredentials {
        &self.credentials
    }

    /// Returns a signed assertion valid at `now_unix`, reusing the cached one
    /// while it is younger than the cache window.
    pub(crate) fn assertion(&self, now_unix: i64) -> Result<String, JustificationError> {
        let mut cached = self
            .cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = cached.as_ref()
            && now_unix >= entry.minted_at_unix
            && now_unix.saturating_sub(entry.minted_at_unix) < self.cache_seconds
        {
            return Ok(entry.jwt.clone());
        }

        let jwt = self.sign(now_unix)?;
        *cached = Some(CachedAssertion {
            jwt: jwt.clone(),
            minted_at_unix: now_unix,
        });
        Ok(jwt)
    }

    fn sign(&self, now_unix: i64) -> Result<String, JustificationError> {
        let claims = AppClaims {
            iat: now_unix.saturating_sub(ISSUED_AT_BACKDATE_SECONDS),
            exp: now_unix.saturating_add(ASSERTION_LIFETIME_SECONDS),
            iss: self.credentials.app_id().to_owned(),
        };

        encode(
            &Header::new(Algorithm::RS256),
            &claims,
            self.credentials.signing_key(),
        )
        .map_err(|error| JustificationError::AccessToken {
            message: format!("failed to sign app assertion: {error}"),
        })
    }
}
