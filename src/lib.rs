// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Tricolor: an arbiter for a two-player sowing game with tri-colored seeds.
//!
//! Two external programs (agents) play against each other through a line
//! protocol on their standard input and output. The arbiter:
//! - Relays moves between the agents with a per-turn deadline
//! - Validates and applies every move against the rules
//! - Reports a verdict when the game ends or an agent misbehaves
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │        Series Runner (rayon)        │
//! ├─────────────────────────────────────┤
//! │     Arbiter (turn loop, verdict)    │
//! ├──────────────────┬──────────────────┤
//! │   Game Rules     │  Agent Channel   │
//! │ (board, moves)   │ (child process)  │
//! └──────────────────┴──────────────────┘
//! ```

pub mod agent;
pub mod arbiter;
pub mod error;
pub mod game;
pub mod series;

pub use error::{AgentError, AgentResult};

// Re-export key types at crate root for convenience
pub use agent::{Agent, AgentCommand, AgentOptions, ProcessAgent};
pub use arbiter::{Arbiter, ArbiterConfig, GameReport, Round, Verdict};
pub use game::{GameState, Move, Player, Scores, Seed, SowType};
pub use series::{SeriesConfig, SeriesError, SeriesStats, run_series};
