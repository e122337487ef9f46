//! Least-privilege scope requested for installation tokens.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::github::reference::RepositoryName;

const ISSUES_PERMISSION: &str = "issues";
const READ_LEVEL: &str = "read";

/// Repository and permission set an installation token is restricted to.
///
/// The only constructor scopes a token to one repository with read access to
/// issues. The value doubles as the JSON body of the exchange request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenScope {
    repositories: Vec<String>,
    permissions: BTreeMap<String, String>,
}

impl TokenScope {
    /// Scope granting `issues: read` on `repository` only.
    #[must_use]
    pub fn issues_read(repository: &RepositoryName) -> Self {
        Self {
            repositories: vec![repository.as_str().to_owned()],
            permissions: BTreeMap::from([(ISSUES_PERMISSION.to_owned(), READ_LEVEL.to_owned())]),
        }
    }

    /// Repositories the token may access.
    #[must_use]
    pub fn repositories(&self) -> &[String] {
        &self.repositories
    }

    /// Capability to access level mapping.
    #[must_use]
    pub const fn permissions(&self) -> &BTreeMap<String, String> {
        &self.permissions
    }
}
