//! Agent backed by a child process.

use crate::agent::{Agent, AgentCommand, AgentOptions};
use crate::error::{AgentError, AgentResult};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// How long a process may take to exit on its own once its stdin is closed.
const EXIT_GRACE: Duration = Duration::from_millis(100);

/// Longest line accepted from an agent, terminator included.
pub const MAX_LINE_BYTES: usize = 64;
const LINE_LIMIT: u64 = MAX_LINE_BYTES as u64;

/// Lines the reader may hold before it stops reading the pipe.
const LINE_QUEUE: usize = 1;

/// An agent running as a child process.
///
/// Lines are written to the child's stdin. A dedicated reader thread performs
/// the blocking reads on its stdout and forwards complete lines over a
/// channel, so [`receive`](Agent::receive) can give up after a deadline
/// without being stuck in a read. A late line is simply never looked at.
///
/// Memory stays bounded whatever the child writes. At most one line waits in
/// the channel; past that the reader blocks and the full pipe stalls the
/// child. A line longer than [`MAX_LINE_BYTES`] is reported as
/// [`AgentError::LineTooLong`] and nothing more is read.
///
/// The process is killed and reaped when the agent is destroyed or dropped.
#[derive(Debug)]
pub struct ProcessAgent {
    name: String,
    child: Option<Child>,
    stdin: Option<BufWriter<ChildStdin>>,
    lines: Option<Receiver<AgentResult<String>>>,
    reader: Option<JoinHandle<()>>,
}

impl ProcessAgent {
    /// Start the agent process.
    ///
    /// # Errors
    ///
    /// Returns an error if the process or its reader thread cannot be started.
    pub fn spawn(
        name: impl Into<String>,
        command: &AgentCommand,
        options: AgentOptions,
    ) -> AgentResult<Self> {
        let name = name.into();
        let stderr = if options.forward_stderr {
            Stdio::inherit()
        } else {
            Stdio::null()
        };

        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(stderr)
            .spawn()
            .map_err(|source| AgentError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let stdin = child.stdin.take().map(BufWriter::new);
        let Some(stdout) = child.stdout.take() else {
            reap(&name, child);
            return Err(AgentError::Disconnected);
        };

        let (tx, rx) = mpsc::sync_channel(LINE_QUEUE);
        let reader = thread::Builder::new()
            .name(format!("agent-{name}"))
            .spawn(move || forward_lines(stdout, &tx));
        let reader = match reader {
            Ok(handle) => handle,
            Err(e) => {
                reap(&name, child);
                return Err(AgentError::Io(e));
            }
        };

        debug!(agent = %name, command = %command, pid = child.id(), "agent started");

        Ok(Self {
            name,
            child: Some(child),
            stdin,
            lines: Some(rx),
            reader: Some(reader),
        })
    }

    /// Start the agent process, falling back to a disconnected agent.
    ///
    /// A disconnected agent fails every send and receive, so a spawn failure
    /// surfaces as that agent's timeout when its turn comes.
    #[must_use]
    pub fn launch(name: impl Into<String>, command: &AgentCommand, options: AgentOptions) -> Self {
        let name = name.into();
        match Self::spawn(name.clone(), command, options) {
            Ok(agent) => agent,
            Err(e) => {
                warn!(agent = %name, error = %e, "agent failed to start");
                Self::disconnected(name)
            }
        }
    }

    /// An agent with no process behind it.
    #[must_use]
    pub fn disconnected(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            child: None,
            stdin: None,
            lines: None,
            reader: None,
        }
    }

    /// OS process id, if the process is running.
    #[must_use]
    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }
}

impl Agent for ProcessAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn send(&mut self, line: &str) -> AgentResult<()> {
        let stdin = self.stdin.as_mut().ok_or(AgentError::Disconnected)?;
        trace!(agent = %self.name, line, "send");
        stdin.write_all(line.as_bytes())?;
        stdin.write_all(b"\n")?;
        stdin.flush()?;
        Ok(())
    }

    fn receive(&mut self, timeout: Duration) -> AgentResult<String> {
        let lines = self.lines.as_ref().ok_or(AgentError::Disconnected)?;
        match lines.recv_timeout(timeout) {
            Ok(Ok(line)) => {
                trace!(agent = %self.name, line = %line, "receive");
                Ok(line)
            }
            Ok(Err(e)) => {
                debug!(agent = %self.name, error = %e, "unreadable output");
                Err(e)
            }
            Err(RecvTimeoutError::Timeout) => Err(AgentError::Timeout(timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(AgentError::Disconnected),
        }
    }

    fn destroy(&mut self) {
        // Closing stdin first lets a well-behaved agent exit on its own.
        self.stdin = None;
        // Unblocks a reader waiting for room in the channel.
        self.lines = None;
        if let Some(mut child) = self.child.take() {
            if exited_within(&mut child, EXIT_GRACE) {
                debug!(agent = %self.name, "agent exited on its own");
            }
            reap(&self.name, child);
        }
        // The reader ends once the pipe closes; a grandchild holding it open
        // must not block teardown, so the thread is detached.
        self.reader = None;
    }
}

impl Drop for ProcessAgent {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Poll for exit until `grace` runs out.
fn exited_within(child: &mut Child, grace: Duration) -> bool {
    let deadline = Instant::now() + grace;
    loop {
        match child.try_wait() {
            Ok(Some(_)) => return true,
            Ok(None) if Instant::now() < deadline => thread::sleep(Duration::from_millis(5)),
            Ok(None) | Err(_) => return false,
        }
    }
}

/// Kill and wait for a child, tolerating one that already exited.
fn reap(name: &str, mut child: Child) {
    if let Err(e) = child.kill() {
        debug!(agent = %name, error = %e, "kill failed (already exited?)");
    }
    match child.wait() {
        Ok(status) => debug!(agent = %name, %status, "agent stopped"),
        Err(e) => warn!(agent = %name, error = %e, "failed to reap agent"),
    }
}

/// Reader thread body: forward each complete line until EOF or error.
///
/// A trailing fragment without a newline at EOF is dropped; to the arbiter it
/// looks exactly like no answer. A line longer than [`MAX_LINE_BYTES`] is
/// reported once and ends the stream without reading the rest of it.
fn forward_lines(stdout: ChildStdout, lines: &SyncSender<AgentResult<String>>) {
    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::with_capacity(MAX_LINE_BYTES);

    loop {
        buf.clear();
        let item = match reader.by_ref().take(LINE_LIMIT).read_until(b'\n', &mut buf) {
            Ok(_) if buf.last() == Some(&b'\n') => {
                buf.pop();
                if buf.last() == Some(&b'\r') {
                    buf.pop();
                }
                Ok(String::from_utf8_lossy(&buf).into_owned())
            }
            Ok(n) if n >= MAX_LINE_BYTES => Err(AgentError::LineTooLong(MAX_LINE_BYTES)),
            // EOF, possibly after a fragment.
            Ok(_) => break,
            Err(e) => Err(AgentError::Io(e)),
        };
        let last = item.is_err();
        if lines.send(item).is_err() || last {
            break;
        }
    }
}
