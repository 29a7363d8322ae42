//! Plain text rendering of the board.

// Allow format! with push_str for readability - the allocation overhead is negligible for text rendering
#![allow(clippy::format_push_string)]

use crate::game::{GameState, HOLES, Player, Seed};

const RULE: &str = "+---------------------------------------------------------------+\n";

/// Render the board as a table: one header with moves and scores, one row per hole.
///
/// Output format:
/// ```text
/// +---------------------------------------------------------------+
/// | MOVES: 1   | SCORE J1: 0   | SCORE J2: 0   |  Total: 96  |
/// +---------------------------------------------------------------+
/// |  1 (J1) | R: 0 | B: 2 | T: 2 | Total: 4 |
/// |  2 (J2) | R: 3 | B: 2 | T: 2 | Total: 7 |
/// ...
/// ```
#[must_use]
pub fn render_board(state: &GameState) -> String {
    let mut output = String::new();

    output.push_str(RULE);
    output.push_str(&format!(
        "| MOVES: {:<3} | SCORE J1: {:<3} | SCORE J2: {:<3} |  Total: {:<3} |\n",
        state.moves_count,
        state.score_p1(),
        state.score_p2(),
        state.seeds_on_board()
    ));
    output.push_str(RULE);

    for hole in 0..HOLES {
        let red = state.board.seeds(hole, Seed::Red);
        let blue = state.board.seeds(hole, Seed::Blue);
        let trans = state.board.seeds(hole, Seed::Transitional);
        output.push_str(&format!(
            "| {:>2} ({}) | R:{red:>2} | B:{blue:>2} | T:{trans:>2} | Total:{:>2} |\n",
            hole + 1,
            Player::owner_of(hole),
            state.board.hole_total(hole)
        ));
    }
    output.push_str(RULE);

    output
}
