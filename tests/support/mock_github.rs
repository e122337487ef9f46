//! Blocking harness around a mock GitHub API for behavioural scenarios.
//!
//! rstest-bdd steps are synchronous, so the harness owns the Tokio runtime
//! that drives the Wiremock server and every plugin call made against it.

use std::io;

use jvs_plugin_github::test_support::test_plugin_config;
use jvs_plugin_github::{
    GitHubPlugin, Justification, JustificationValidator, ValidationFault, ValidationOutcome,
};
use rstest_bdd::Slot;
use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer};

/// Mock GitHub API plus the runtime it runs on.
pub struct MockGitHub {
    // Dropped before the runtime that started it.
    server: MockServer,
    runtime: Runtime,
}

impl MockGitHub {
    /// Starts a runtime and an empty mock server.
    ///
    /// # Errors
    ///
    /// Returns an error if the Tokio runtime cannot be created.
    pub fn start() -> Result<Self, io::Error> {
        let runtime = Runtime::new()?;
        let server = runtime.block_on(MockServer::start());
        Ok(Self { server, runtime })
    }

    /// Mounts `mocks` on the server.
    pub fn mount(&self, mocks: impl IntoIterator<Item = Mock>) {
        for mock in mocks {
            self.runtime.block_on(mock.mount(&self.server));
        }
    }

    /// Builds a plugin pointed at the server and validates `justification`.
    ///
    /// # Errors
    ///
    /// Returns the fault reported by construction or validation.
    pub fn validate(
        &self,
        justification: &Justification,
    ) -> Result<ValidationOutcome, ValidationFault> {
        let config = test_plugin_config(&self.server.uri());
        self.runtime.block_on(async {
            let plugin = GitHubPlugin::from_config(&config)?;
            plugin.validate(justification).await
        })
    }

    /// Number of requests the server has received so far.
    pub fn received_request_count(&self) -> usize {
        self.runtime
            .block_on(self.server.received_requests())
            .map_or(0, |requests| requests.len())
    }
}

/// Starts the harness in `slot` unless a previous step already did.
///
/// # Errors
///
/// Returns an error if the harness cannot be started.
pub fn ensure_started(slot: &Slot<MockGitHub>) -> Result<(), io::Error> {
    if slot.with_ref(|_| ()).is_none() {
        slot.set(MockGitHub::start()?);
    }
    Ok(())
}
