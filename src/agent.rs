//! Agents: the external programs that choose moves.
//!
//! The arbiter only talks to agents through the [`Agent`] trait: one line
//! out, one line back within a deadline. [`ProcessAgent`] is the
//! implementation backed by a child process's standard input and output.

mod process;

pub use process::{MAX_LINE_BYTES, ProcessAgent};

use crate::error::AgentResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// A move-making participant reachable through a line protocol.
pub trait Agent {
    /// Display name used in verdicts.
    fn name(&self) -> &str;

    /// Send one line (without terminator) and flush it.
    ///
    /// # Errors
    ///
    /// Returns an error if the line could not be delivered.
    fn send(&mut self, line: &str) -> AgentResult<()>;

    /// Wait up to `timeout` for the next complete line.
    ///
    /// # Errors
    ///
    /// Returns an error if no line arrived in time, the stream closed or the
    /// read failed. Callers treat all of these as a timeout.
    fn receive(&mut self, timeout: Duration) -> AgentResult<String>;

    /// Release the agent. Must be safe to call more than once.
    fn destroy(&mut self);
}

/// Options applied when launching agent processes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentOptions {
    /// Pass the agent's stderr through instead of discarding it.
    pub forward_stderr: bool,
}

/// Error for an agent command line with nothing in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("agent command is empty")]
pub struct EmptyCommand;

/// Program and arguments used to start an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCommand {
    /// Executable to run.
    pub program: PathBuf,
    /// Arguments passed to it.
    pub args: Vec<String>,
}

impl AgentCommand {
    /// Command running `program` without arguments.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add an argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Short label for reports: the program's file name.
    #[must_use]
    pub fn label(&self) -> String {
        self.program
            .file_name()
            .map_or_else(|| self.program.display().to_string(), |n| n.to_string_lossy().to_string())
    }
}

/// Split a command line on whitespace; the first word is the program.
impl FromStr for AgentCommand {
    type Err = EmptyCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let program = words.next().ok_or(EmptyCommand)?;
        Ok(Self {
            program: PathBuf::from(program),
            args: words.map(str::to_string).collect(),
        })
    }
}

impl fmt::Display for AgentCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parsing() {
        let cmd: AgentCommand = "./bots/greedy --depth 4".parse().unwrap();
        assert_eq!(cmd.program, PathBuf::from("./bots/greedy"));
        assert_eq!(cmd.args, vec!["--depth", "4"]);
        assert_eq!(cmd.to_string(), "./bots/greedy --depth 4");
        assert_eq!(cmd.label(), "greedy");
    }

    #[test]
    fn test_empty_command_rejected() {
        assert_eq!("".parse::<AgentCommand>(), Err(EmptyCommand));
        assert_eq!("   ".parse::<AgentCommand>(), Err(EmptyCommand));
    }

    #[test]
    fn test_builder() {
        let cmd = AgentCommand::new("python3").arg("bot.py");
        assert_eq!(cmd.to_string(), "python3 bot.py");
    }
}
