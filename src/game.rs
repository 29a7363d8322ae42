//! Game layer for tricolor.
//!
//! Implements the rules of the sowing game:
//! - Board of 16 holes with red, blue and transitional seeds
//! - Move syntax (`7R`, `12TB`, ...)
//! - Legality, harvest/sow/capture and termination
//! - Invariant checks and a text rendering of the board

mod board;
mod invariants;
mod moves;
mod player;
mod render;
mod rules;

pub use board::{
    Board, GameState, HOLES, INITIAL_SEEDS_PER_CELL, Scores, Seed, TOTAL_SEEDS, next_hole,
    prev_hole,
};
pub use invariants::{InvariantViolation, SANITY_MAX_CELL, assert_invariants, check_invariants};
pub use moves::{Move, ParseMoveError, SowType};
pub use player::Player;
pub use render::render_board;
pub use rules::{
    CAPTURE_CHAIN_LIMIT, EndReason, IllegalMove, MAX_MOVES, MIN_SEEDS_ON_BOARD, MoveOutcome,
    WINNING_SCORE, apply, check_legal, is_legal, is_terminal, legal_moves, termination,
};
