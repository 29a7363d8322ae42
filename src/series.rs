//! Series runner: many independent games between the same two agent commands.
//!
//! Games run in parallel on a rayon pool. Each game owns its own agents and
//! state; per-thread statistics are folded locally and merged at the end.

use crate::agent::{Agent, AgentCommand, ProcessAgent};
use crate::arbiter::{Arbiter, ArbiterConfig, GameReport, Verdict};
use crate::game::Player;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Configuration for a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesConfig {
    /// Number of games to play.
    pub games: u64,
    /// Alternate which command takes the first seat.
    pub swap_seats: bool,
    /// Worker threads (rayon's default when `None`).
    pub threads: Option<usize>,
    /// Per-game configuration.
    pub arbiter: ArbiterConfig,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            games: 10,
            swap_seats: true,
            threads: None,
            arbiter: ArbiterConfig::default(),
        }
    }
}

/// Error type for series operations.
#[derive(Debug, Error)]
pub enum SeriesError {
    /// Zero games requested.
    #[error("a series needs at least one game")]
    NoGames,
    /// Zero worker threads requested.
    #[error("a series needs at least one thread")]
    NoThreads,
    /// The worker pool could not be created.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Which command sits in which seat for one game.
///
/// Commands are numbered 0 and 1 in the order they were given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seating {
    /// Game number within the series.
    pub game: u64,
    /// Command 1 plays first in this game.
    pub swapped: bool,
}

impl Seating {
    /// Seating for game `game`.
    #[must_use]
    pub const fn for_game(game: u64, swap_seats: bool) -> Self {
        Self {
            game,
            swapped: swap_seats && game % 2 == 1,
        }
    }

    /// Index of the command playing `player`.
    #[must_use]
    pub const fn command_for(self, player: Player) -> usize {
        let seat = player.index();
        if self.swapped { 1 - seat } else { seat }
    }
}

/// Aggregated results, indexed by command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeriesStats {
    /// Total games played.
    pub games_played: u64,
    /// Wins per command.
    pub wins: [u64; 2],
    /// Games without a winner.
    pub draws: u64,
    /// Games lost by timeout or invalid move, per command.
    pub forfeits: [u64; 2],
    /// Games stopped by the move limit.
    pub limits: u64,
    /// Sum of final scores per command.
    total_scores: [u64; 2],
    /// Moves applied across all games.
    total_rounds: u64,
}

impl SeriesStats {
    /// Empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one finished game.
    pub fn add_game(&mut self, seating: Seating, report: &GameReport) {
        let verdict = &report.verdict;
        self.games_played += 1;
        self.total_rounds += u64::from(report.rounds);

        match verdict.winner() {
            Some(player) => self.wins[seating.command_for(player)] += 1,
            None => self.draws += 1,
        }
        if let Some(player) = verdict.offender() {
            self.forfeits[seating.command_for(player)] += 1;
        }
        if matches!(verdict, Verdict::Limit { .. }) {
            self.limits += 1;
        }

        let scores = verdict.scores();
        for player in Player::ALL {
            self.total_scores[seating.command_for(player)] += u64::from(scores.get(player));
        }
    }

    /// Merge another set of statistics into this one.
    pub fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.draws += other.draws;
        self.limits += other.limits;
        self.total_rounds += other.total_rounds;
        for i in 0..2 {
            self.wins[i] += other.wins[i];
            self.forfeits[i] += other.forfeits[i];
            self.total_scores[i] += other.total_scores[i];
        }
    }

    /// Win rate for a command (0.0-1.0).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn win_rate(&self, command: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins.get(command).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Average final score for a command.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_score(&self, command: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_scores.get(command).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Average number of moves per game.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_rounds(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_rounds as f64 / self.games_played as f64
    }
}

/// Play a series between two agent commands, each game with fresh processes.
///
/// `on_game` runs after every game, from whichever worker played it.
///
/// # Errors
///
/// Returns an error if the configuration asks for no games or no threads, or
/// the thread pool cannot be built.
pub fn run_series(
    commands: &[AgentCommand; 2],
    config: &SeriesConfig,
    on_game: impl Fn(&GameReport) + Sync,
) -> Result<SeriesStats, SeriesError> {
    let options = config.arbiter.agent;
    run_series_with(
        config,
        |seating| {
            let first = &commands[seating.command_for(Player::One)];
            let second = &commands[seating.command_for(Player::Two)];
            (
                ProcessAgent::launch(Player::One.to_string(), first, options),
                ProcessAgent::launch(Player::Two.to_string(), second, options),
            )
        },
        on_game,
    )
}

/// Play a series with agents built by `make_agents` for each seating.
///
/// # Errors
///
/// See [`run_series`].
pub fn run_series_with<A, F>(
    config: &SeriesConfig,
    make_agents: F,
    on_game: impl Fn(&GameReport) + Sync,
) -> Result<SeriesStats, SeriesError>
where
    A: Agent,
    F: Fn(Seating) -> (A, A) + Sync,
{
    if config.games == 0 {
        return Err(SeriesError::NoGames);
    }
    if config.threads == Some(0) {
        return Err(SeriesError::NoThreads);
    }

    info!(games = config.games, swap_seats = config.swap_seats, "series started");

    let play = || {
        (0..config.games)
            .into_par_iter()
            .fold(SeriesStats::new, |mut local, game| {
                let seating = Seating::for_game(game, config.swap_seats);
                let (first, second) = make_agents(seating);
                let report = Arbiter::new(first, second, config.arbiter).run(|_| {});
                debug!(game, swapped = seating.swapped, verdict = %report.verdict, "series game done");
                local.add_game(seating, &report);
                on_game(&report);
                local
            })
            .reduce(SeriesStats::new, |mut a, b| {
                a.merge(&b);
                a
            })
    };

    let stats = match config.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("series-{i}"))
            .build()?
            .install(play),
        None => play(),
    };

    info!(
        games = stats.games_played,
        wins_a = stats.wins[0],
        wins_b = stats.wins[1],
        draws = stats.draws,
        "series finished"
    );
    Ok(stats)
}
