//! Issue URL parsing and identity wrappers.

use std::fmt;

use super::error::JustificationError;

const ISSUE_URL_PREFIX: &str = "https://github.com/";
const ISSUES_MARKER: &str = "issues";

/// Human-readable form of the only accepted issue URL shape.
pub const ISSUE_URL_PATTERN: &str = "https://github.com/<owner>/<repository>/issues/<number>";

fn malformed(problem: &str) -> JustificationError {
    JustificationError::InvalidIssueUrl(format!("{problem}, expected {ISSUE_URL_PATTERN}"))
}

/// Owner and repository segments may only hold ASCII alphanumerics and
/// hyphens.
fn is_valid_name_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || character == '-')
}

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    pub(crate) fn new(value: &str) -> Result<Self, JustificationError> {
        if !is_valid_name_segment(value) {
            return Err(malformed(
                "owner must be non-empty and contain only alphanumerics or hyphens",
            ));
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub(crate) fn new(value: &str) -> Result<Self, JustificationError> {
        if !is_valid_name_segment(value) {
            return Err(malformed(
                "repository must be non-empty and contain only alphanumerics or hyphens",
            ));
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Issue number as written in the URL.
///
/// Zero parses; no such issue exists, so GitHub answers it with not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IssueNumber(u64);

impl IssueNumber {
    pub(crate) fn parse(segment: &str) -> Result<Self, JustificationError> {
        if segment.is_empty() || !segment.chars().all(|character| character.is_ascii_digit()) {
            return Err(malformed("issue number must be a decimal integer"));
        }
        let value = segment
            .parse::<u64>()
            .map_err(|error| malformed(&format!("issue number {segment} is not usable: {error}")))?;
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for IssueNumber {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Issue coordinates parsed from a justification URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IssueReference {
    owner: RepositoryOwner,
    repository: RepositoryName,
    number: IssueNumber,
}

impl IssueReference {
    /// Parses a GitHub issue URL in the form
    /// `https://github.com/<owner>/<repository>/issues/<number>`.
    ///
    /// Parsing is pure: no network access takes place.
    ///
    /// # Errors
    ///
    /// Returns [`JustificationError::InvalidIssueUrl`] when the scheme or
    /// host differ, the path has missing or extra segments, a name segment
    /// holds characters other than alphanumerics and hyphens, or the number
    /// is not a decimal integer that fits in 64 bits.
    ///
    /// # Example
    ///
    /// ```
    /// use jvs_plugin_github::github::IssueReference;
    ///
    /// let reference = IssueReference::parse("https://github.com/octo/repo/issues/7")
    ///     .expect("should parse issue URL");
    /// assert_eq!(reference.owner().as_str(), "octo");
    /// assert_eq!(reference.repository().as_str(), "repo");
    /// assert_eq!(reference.number().get(), 7);
    /// ```
    pub fn parse(input: &str) -> Result<Self, JustificationError> {
        let path = input
            .strip_prefix(ISSUE_URL_PREFIX)
            .ok_or_else(|| malformed("URL must start with https://github.com/"))?;

        let mut segments = path.split('/');
        let missing = || malformed("URL path is incomplete");

        let owner_segment = segments.next().ok_or_else(missing)?;
        let repository_segment = segments.next().ok_or_else(missing)?;
        let marker = segments.next().ok_or_else(missing)?;
        let number_segment = segments.next().ok_or_else(missing)?;

        if segments.next().is_some() {
            return Err(malformed("URL has unexpected trailing path segments"));
        }

        if marker != ISSUES_MARKER {
            return Err(malformed("URL path must contain /issues/"));
        }

        Ok(Self {
            owner: RepositoryOwner::new(owner_segment)?,
            repository: RepositoryName::new(repository_segment)?,
            number: IssueNumber::parse(number_segment)?,
        })
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Issue number.
    #[must_use]
    pub const fn number(&self) -> IssueNumber {
        self.number
    }

    pub(crate) fn issue_path(&self) -> String {
        format!(
            "/repos/{}/{}/issues/{}",
            self.owner.as_str(),
            self.repository.as_str(),
            self.number.get()
        )
    }
}
