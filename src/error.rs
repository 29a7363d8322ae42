//! Error types for agent communication.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Failure to exchange a line with an agent.
///
/// The arbiter treats every variant the same way: the agent did not deliver
/// a valid line in time. The variants only exist for diagnostics.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The agent process could not be started.
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        /// Program that was launched.
        command: String,
        /// Underlying OS error.
        source: io::Error,
    },
    /// No complete line arrived before the deadline.
    #[error("no response within {0:?}")]
    Timeout(Duration),
    /// The agent closed its output or was never started.
    #[error("agent disconnected")]
    Disconnected,
    /// The agent wrote a line longer than the given byte limit.
    #[error("line exceeds {0} bytes")]
    LineTooLong(usize),
    /// Reading from or writing to the agent failed.
    #[error("agent I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Result type for agent operations.
pub type AgentResult<T> = Result<T, AgentError>;
