//! CLI host that checks one justification with the GitHub issue validator.
//!
//! Prints the outcome as JSON on stdout. Exits with 0 for a valid
//! justification, 1 for a rejected one and 2 when the check could not be
//! performed.

use std::io::{self, Write};
use std::process::ExitCode;

use jvs_plugin_github::{
    GitHubPlugin, JustificationError, JustificationValidator, PluginConfig, ValidationFault,
    ValidationOutcome,
};
use ortho_config::OrthoConfig;
use tracing_subscriber::EnvFilter;

const EXIT_REJECTED: u8 = 1;
const EXIT_FAULT: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(outcome) if outcome.valid => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(EXIT_REJECTED),
        Err(fault) => {
            // Nothing further can be reported if stderr is closed.
            writeln!(io::stderr().lock(), "{fault}").ok();
            ExitCode::from(EXIT_FAULT)
        }
    }
}

/// Installs a stderr subscriber filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run() -> Result<ValidationOutcome, ValidationFault> {
    let config = load_config()?;
    tracing::debug!(config = ?config, "loaded configuration");

    let justification = config.require_justification()?;
    let plugin = GitHubPlugin::from_config(&config)?;
    let outcome = plugin.validate(&justification).await?;

    write_outcome(&outcome)?;
    Ok(outcome)
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`JustificationError::Configuration`] when ortho-config fails to
/// parse arguments or load configuration files.
fn load_config() -> Result<PluginConfig, JustificationError> {
    PluginConfig::load().map_err(|error| JustificationError::Configuration {
        message: error.to_string(),
    })
}

fn write_outcome(outcome: &ValidationOutcome) -> Result<(), JustificationError> {
    let rendered =
        serde_json::to_string_pretty(outcome).map_err(|error| JustificationError::Io {
            message: format!("failed to render outcome: {error}"),
        })?;

    writeln!(io::stdout().lock(), "{rendered}").map_err(|error| JustificationError::Io {
        message: error.to_string(),
    })
}
