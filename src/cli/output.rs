//! Output formatting utilities for CLI.

use serde::Serialize;
use std::fmt::Write as _;
use tricolor::{GameReport, Round, SeriesStats};

/// JSON-serializable single game.
#[derive(Debug, Serialize)]
pub(super) struct JsonGame<'a> {
    /// Agent labels, first seat first.
    agents: &'a [String; 2],
    /// The verdict line as printed in text mode.
    result: String,
    /// Winner seat number (null for a draw).
    winner: Option<u8>,
    /// Full report.
    report: &'a GameReport,
    /// Accepted move texts in order.
    moves: Vec<String>,
}

impl<'a> JsonGame<'a> {
    /// Create from a report.
    pub(super) fn new(agents: &'a [String; 2], report: &'a GameReport, moves: Vec<String>) -> Self {
        Self {
            agents,
            result: report.verdict.to_string(),
            winner: report.verdict.winner().map(tricolor::Player::number),
            report,
            moves,
        }
    }
}

/// Announce who played what, printed above the board.
pub(super) fn format_move_line(round: &Round) -> String {
    format!("JOUEUR {} joue : {}", round.agent, round.text)
}

/// JSON-serializable series result.
#[derive(Debug, Serialize)]
pub(super) struct JsonSeriesResult {
    /// Total games played.
    games_played: u64,
    /// Per-command statistics.
    agents: Vec<JsonSeriesAgent>,
    /// Number of draws.
    draws: u64,
    /// Games stopped by the move limit.
    limits: u64,
    /// Average game length in moves.
    avg_moves: f64,
}

/// JSON-serializable per-command series stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonSeriesAgent {
    /// Command index (1-based, in command-line order).
    agent: usize,
    /// Command label.
    command: String,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Games lost by timeout or invalid move.
    forfeits: u64,
    /// Average final score.
    avg_score: f64,
}

impl JsonSeriesResult {
    /// Create from stats and command labels.
    pub(super) fn from_stats(stats: &SeriesStats, names: &[String; 2]) -> Self {
        let agents = names
            .iter()
            .enumerate()
            .map(|(i, name)| JsonSeriesAgent {
                agent: i + 1,
                command: name.clone(),
                wins: stats.wins[i],
                win_rate: stats.win_rate(i),
                forfeits: stats.forfeits[i],
                avg_score: stats.avg_score(i),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            agents,
            draws: stats.draws,
            limits: stats.limits,
            avg_moves: stats.avg_rounds(),
        }
    }
}

/// Format series stats as human-readable text.
#[allow(clippy::cast_precision_loss)]
pub(super) fn format_series_text(stats: &SeriesStats, names: &[String; 2]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Series Results ({} games)", stats.games_played);
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for (i, name) in names.iter().enumerate() {
        let _ = writeln!(
            output,
            "  Agent {} ({}): {:.1}% ({} wins, {} forfeits)",
            i + 1,
            name,
            stats.win_rate(i) * 100.0,
            stats.wins[i],
            stats.forfeits[i]
        );
    }
    let draw_rate = if stats.games_played == 0 {
        0.0
    } else {
        stats.draws as f64 / stats.games_played as f64 * 100.0
    };
    let _ = writeln!(output, "  Draws: {} ({draw_rate:.1}%)\n", stats.draws);

    output.push_str("Average Scores:\n");
    for (i, name) in names.iter().enumerate() {
        let _ = writeln!(output, "  Agent {} ({}): {:.1}", i + 1, name, stats.avg_score(i));
    }

    let _ = writeln!(
        output,
        "\nAverage Game Length: {:.0} moves ({} hit the move limit)",
        stats.avg_rounds(),
        stats.limits
    );

    output
}

/// Format series stats as CSV.
pub(super) fn format_series_csv(stats: &SeriesStats, names: &[String; 2]) -> String {
    let mut output = String::new();

    // Header
    output.push_str("agent,command,wins,win_rate,forfeits,avg_score\n");

    for (i, name) in names.iter().enumerate() {
        let _ = writeln!(
            output,
            "{},{},{},{:.4},{},{:.2}",
            i + 1,
            name,
            stats.wins[i],
            stats.win_rate(i),
            stats.forfeits[i],
            stats.avg_score(i)
        );
    }

    output
}
