//! Game invariants - sanity checks that detect rule engine bugs.
//!
//! Seeds are never created or destroyed: harvesting and sowing move them
//! around the board and captures move them into a score. These checks should
//! NEVER trigger for a state reached by applying legal moves from the initial
//! position. If they do, it indicates a bug.

use crate::game::{GameState, HOLES, Player, Seed, TOTAL_SEEDS};

/// Sanity bound: a single cell never legitimately holds this many seeds,
/// since only 96 exist. Reaching it means `Board::add` saturated.
pub const SANITY_MAX_CELL: u8 = u8::MAX;

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
/// Only meaningful for states reached through play; hand-built test states
/// usually do not conserve seeds.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for hole in 0..HOLES {
        for seed in Seed::ALL {
            let count = state.board.seeds(hole, seed);
            if count >= SANITY_MAX_CELL {
                violations.push(InvariantViolation {
                    message: format!(
                        "Hole {} holds {count} {seed:?} seeds (cell saturated)",
                        hole + 1
                    ),
                });
            }
        }
    }

    // Seed conservation
    let on_board = state.seeds_on_board();
    let scored = state.scores.total();
    if on_board + scored != TOTAL_SEEDS {
        violations.push(InvariantViolation {
            message: format!(
                "Seed count {on_board} on board + {scored} scored != {TOTAL_SEEDS}"
            ),
        });
    }

    // Scores only grow by captures of 2 or 3 seeds, so a score of 1 is impossible.
    for player in Player::ALL {
        if state.scores.get(player) == 1 {
            violations.push(InvariantViolation {
                message: format!("Player {player} score is 1"),
            });
        }
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState) {}
