//! CLI command implementations for tricolor.

pub(crate) mod play;
pub(crate) mod probe;
pub(crate) mod series;

mod output;

use clap::ValueEnum;
use std::error::Error;
use std::fmt;
use std::time::Duration;
use tricolor::{AgentOptions, ArbiterConfig};

/// Output format for the `play` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum PlayFormat {
    /// Progress lines and the verdict line.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `series` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SeriesFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Build the per-game configuration from command-line flags.
pub(crate) fn arbiter_config(timeout_ms: u64, agent_stderr: bool) -> ArbiterConfig {
    ArbiterConfig {
        turn_timeout: Duration::from_millis(timeout_ms),
        agent: AgentOptions {
            forward_stderr: agent_stderr,
        },
        ..ArbiterConfig::default()
    }
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

impl From<tricolor::SeriesError> for CliError {
    fn from(e: tricolor::SeriesError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<tricolor::AgentError> for CliError {
    fn from(e: tricolor::AgentError) -> Self {
        Self::new(e.to_string())
    }
}
