#![no_main]

//! Rule engine fuzzer.
//!
//! Plays a fuzzer-chosen sequence of moves from the initial position. Illegal
//! choices are skipped the way the arbiter would reject them; every applied
//! move must keep the game invariants.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tricolor::game::{
    GameState, Move, Player, SowType, TOTAL_SEEDS, apply, check_invariants, is_legal,
    termination,
};

/// A fuzzer-generated move attempt.
#[derive(Arbitrary, Debug, Clone, Copy)]
struct FuzzMove {
    hole: u8,
    sow_type: u8,
}

fuzz_target!(|moves: Vec<FuzzMove>| {
    let mut state = GameState::new();
    let mut player = Player::One;

    for attempt in moves {
        if termination(&state).is_some() {
            break;
        }
        let sow_type = SowType::ALL[usize::from(attempt.sow_type) % SowType::ALL.len()];
        let Some(mv) = Move::new(usize::from(attempt.hole), sow_type) else {
            continue;
        };
        if !is_legal(&state, mv, player) {
            continue;
        }

        let before = state;
        let outcome = apply(&mut state, mv, player);

        assert_eq!(state.moves_count, before.moves_count + 1);
        assert_eq!(state.board.total() + state.scores.total(), TOTAL_SEEDS);
        assert!(state.scores.get(player) >= before.scores.get(player));
        for hole in outcome.captured_holes() {
            assert_eq!(state.board.hole_total(hole), 0);
        }
        let violations = check_invariants(&state);
        assert!(violations.is_empty(), "invariants violated: {violations:?}");

        player = player.opponent();
    }
});
