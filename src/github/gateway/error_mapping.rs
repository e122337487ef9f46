//! Error mapping helpers for the Octocrab issue gateway.

use http::StatusCode;

use crate::github::error::JustificationError;

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> JustificationError {
    if let octocrab::Error::GitHub { source, .. } = error {
        if source.status_code == StatusCode::NOT_FOUND {
            return JustificationError::IssueNotFound;
        }
        return JustificationError::IssueLookup {
            message: format!(
                "{operation} failed with status {status}: {message}",
                status = source.status_code,
                message = source.message
            ),
        };
    }

    let cause = describe_octocrab_error(error);
    if is_network_error(error) {
        return JustificationError::IssueLookup {
            message: format!("{operation} failed: network error: {cause}"),
        };
    }

    JustificationError::IssueLookup {
        message: format!("{operation} failed: {cause}"),
    }
}

/// Octocrab renders a captured backtrace after this marker.
const BACKTRACE_MARKER: &str = "\n\nFound at";

/// Drops any backtrace section from a rendered error.
pub(super) fn strip_backtrace(rendered: &str) -> &str {
    rendered
        .split(BACKTRACE_MARKER)
        .next()
        .unwrap_or(rendered)
        .trim_end()
}

/// Describes an Octocrab error by its cause chain, without the backtrace
/// Octocrab appends to its own `Display` output.
pub(super) fn describe_octocrab_error(error: &octocrab::Error) -> String {
    let mut causes = Vec::new();
    let mut current = std::error::Error::source(error);
    while let Some(cause) = current {
        causes.push(strip_backtrace(&cause.to_string()).to_owned());
        current = cause.source();
    }

    if causes.is_empty() {
        strip_backtrace(&error.to_string()).to_owned()
    } else {
        causes.join(": ")
    }
}

/// Classifies a non-success issue response.
///
/// Only 404 is a verdict; every other status is an infrastructure fault.
pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    maybe_message: Option<String>,
) -> JustificationError {
    if status == StatusCode::NOT_FOUND {
        return JustificationError::IssueNotFound;
    }

    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());
    JustificationError::IssueLookup {
        message: format!("{operation} failed with status {status}: {message}"),
    }
}
