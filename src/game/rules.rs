//! Rule engine: legality, move application and termination.
//!
//! Everything here is a pure function of its arguments. `apply` is the only
//! way a game state changes during a game.

use crate::game::{GameState, HOLES, Move, Player, Seed, SowType, next_hole, prev_hole};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Score at which a player wins outright.
pub const WINNING_SCORE: u32 = 49;

/// Moves after which the game is stopped.
pub const MAX_MOVES: u32 = 400;

/// The game ends once fewer seeds than this remain on the board.
pub const MIN_SEEDS_ON_BOARD: u32 = 10;

/// Upper bound on capture chain iterations.
pub const CAPTURE_CHAIN_LIMIT: usize = 35;

/// Why a syntactically valid move is not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalMove {
    /// The source hole belongs to the opponent.
    #[error("hole {} is not owned by {player}", .hole + 1)]
    NotOwned {
        /// 0-based source hole.
        hole: usize,
        /// Player attempting the move.
        player: Player,
    },
    /// The source hole has no seed of the kind the move harvests.
    #[error("hole {} has no {seed:?} seeds", .hole + 1)]
    NoSeeds {
        /// 0-based source hole.
        hole: usize,
        /// Seed kind that was required.
        seed: Seed,
    },
}

/// Check a move against the ownership and seed-availability rules.
///
/// # Errors
///
/// Returns the first failing rule.
pub fn check_legal(state: &GameState, mv: Move, player: Player) -> Result<(), IllegalMove> {
    let hole = mv.hole();
    if !player.owns(hole) {
        return Err(IllegalMove::NotOwned { hole, player });
    }

    let seed = mv.sow_type().required_seed();
    if state.board.seeds(hole, seed) == 0 {
        return Err(IllegalMove::NoSeeds { hole, seed });
    }

    Ok(())
}

/// Whether `player` may play `mv` in `state`.
#[must_use]
pub fn is_legal(state: &GameState, mv: Move, player: Player) -> bool {
    check_legal(state, mv, player).is_ok()
}

/// What a single applied move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// Seeds taken out of the source hole.
    pub harvested: u32,
    /// Hole where the capture chain started.
    pub chain_start: usize,
    /// Seeds credited to the mover.
    pub captured: u32,
    /// Bit `h` is set when hole `h` was captured.
    captured_mask: u16,
}

impl MoveOutcome {
    /// Holes emptied by the capture chain, in ascending order.
    pub fn captured_holes(&self) -> impl Iterator<Item = usize> + '_ {
        (0..HOLES).filter(|&hole| self.captured_mask & (1 << hole) != 0)
    }

    /// Whether `hole` was captured.
    #[must_use]
    pub const fn was_captured(&self, hole: usize) -> bool {
        hole < HOLES && self.captured_mask & (1 << hole) != 0
    }
}

/// Apply a legal move for `player`: harvest, sow, capture.
///
/// Must only be called after [`is_legal`] returned `true`.
pub fn apply(state: &mut GameState, mv: Move, player: Player) -> MoveOutcome {
    debug_assert!(is_legal(state, mv, player), "apply called with illegal move {mv}");

    let source = mv.hole();
    let color = mv.sow_type().color();

    // Harvest
    let transitional = if mv.sow_type().uses_transitional() {
        state.board.take(source, Seed::Transitional)
    } else {
        0
    };
    let colored = state.board.take(source, color);

    // Sow: transitional seeds first, then the played color from where they stopped.
    let mut sower = Sower {
        source,
        player,
        cursor: source,
        last_drop: None,
    };
    sower.sow(state, Seed::Transitional, transitional);
    sower.sow(state, color, colored);
    let chain_start = sower.last_drop.unwrap_or_else(|| next_hole(source));

    // Capture
    let (captured, captured_mask) = capture_chain(state, chain_start, player);

    state.moves_count += 1;

    MoveOutcome {
        harvested: u32::from(transitional) + u32::from(colored),
        chain_start,
        captured,
        captured_mask,
    }
}

/// Walks the track dropping one seed per visited hole.
struct Sower {
    source: usize,
    player: Player,
    cursor: usize,
    last_drop: Option<usize>,
}

impl Sower {
    fn sow(&mut self, state: &mut GameState, seed: Seed, mut count: u8) {
        // Blue seeds are never dropped in the mover's own holes.
        let skip_own = seed == Seed::Blue;

        while count > 0 {
            self.cursor = next_hole(self.cursor);
            if self.cursor == self.source || (skip_own && self.player.owns(self.cursor)) {
                continue;
            }
            state.board.add(self.cursor, seed, 1);
            self.last_drop = Some(self.cursor);
            count -= 1;
        }
    }
}

/// Capture backwards from `start` while holes hold exactly 2 or 3 seeds.
fn capture_chain(state: &mut GameState, start: usize, player: Player) -> (u32, u16) {
    let mut hole = start;
    let mut captured = 0;
    let mut mask = 0u16;

    for _ in 0..CAPTURE_CHAIN_LIMIT {
        let total = state.board.hole_total(hole);
        if total != 2 && total != 3 {
            break;
        }

        captured += state.board.clear_hole(hole);
        mask |= 1 << hole;

        hole = prev_hole(hole);
        if hole == start {
            break;
        }
    }

    state.scores.add(player, captured);
    (captured, mask)
}

/// Why a game reached its natural end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// The move counter reached [`MAX_MOVES`].
    MoveLimit,
    /// A player reached [`WINNING_SCORE`].
    ScoreReached(Player),
    /// Fewer than [`MIN_SEEDS_ON_BOARD`] seeds remain.
    BoardDepleted,
}

/// Reason the game is over, if it is.
///
/// The move limit is checked first so that it is reported whenever the
/// counter has been reached, even if another condition holds too.
#[must_use]
pub fn termination(state: &GameState) -> Option<EndReason> {
    if state.moves_count >= MAX_MOVES {
        return Some(EndReason::MoveLimit);
    }
    if state.score_p1() >= WINNING_SCORE {
        return Some(EndReason::ScoreReached(Player::One));
    }
    if state.score_p2() >= WINNING_SCORE {
        return Some(EndReason::ScoreReached(Player::Two));
    }
    if state.seeds_on_board() < MIN_SEEDS_ON_BOARD {
        return Some(EndReason::BoardDepleted);
    }
    None
}

/// Whether the game is over.
#[must_use]
pub fn is_terminal(state: &GameState) -> bool {
    termination(state).is_some()
}

/// Every legal move for `player` in `state`.
#[must_use]
pub fn legal_moves(state: &GameState, player: Player) -> Vec<Move> {
    (0..HOLES)
        .filter(|&hole| player.owns(hole))
        .flat_map(|hole| SowType::ALL.into_iter().filter_map(move |t| Move::new(hole, t)))
        .filter(|&mv| is_legal(state, mv, player))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Board;

    fn mv(text: &str) -> Move {
        Move::parse(text).unwrap()
    }

    #[test]
    fn test_ownership_check() {
        let state = GameState::new();
        assert!(is_legal(&state, mv("1R"), Player::One));
        assert!(!is_legal(&state, mv("1R"), Player::Two));
        assert!(is_legal(&state, mv("2B"), Player::Two));
        assert_eq!(
            check_legal(&state, mv("2B"), Player::One),
            Err(IllegalMove::NotOwned { hole: 1, player: Player::One })
        );
    }

    #[test]
    fn test_seed_availability() {
        let mut state = GameState::new();
        state.board.set(0, Seed::Red, 0);
        state.board.set(2, Seed::Transitional, 0);

        assert_eq!(
            check_legal(&state, mv("1R"), Player::One),
            Err(IllegalMove::NoSeeds { hole: 0, seed: Seed::Red })
        );
        assert!(is_legal(&state, mv("1B"), Player::One));
        // Transitional variants only need transitional seeds.
        assert!(is_legal(&state, mv("1TR"), Player::One));
        assert!(!is_legal(&state, mv("3TR"), Player::One));
        assert!(!is_legal(&state, mv("3TB"), Player::One));
    }

    #[test]
    fn test_legality_is_pure() {
        let state = GameState::new();
        let before = state;
        for _ in 0..3 {
            assert!(is_legal(&state, mv("5TB"), Player::One));
        }
        assert_eq!(state, before);
    }

    #[test]
    fn test_red_move_from_initial_state() {
        let mut state = GameState::new();
        let outcome = apply(&mut state, mv("1R"), Player::One);

        assert_eq!(state.board.seeds(0, Seed::Red), 0);
        assert_eq!(state.board.seeds(1, Seed::Red), 3);
        assert_eq!(state.board.seeds(2, Seed::Red), 3);
        assert_eq!(state.board.hole_total(1), 7);
        assert_eq!(state.board.hole_total(2), 7);
        assert_eq!(outcome.harvested, 2);
        assert_eq!(outcome.chain_start, 2);
        assert_eq!(outcome.captured, 0);
        assert_eq!(state.scores.total(), 0);
        assert_eq!(state.moves_count, 1);
        assert_eq!(state.seeds_on_board(), 96);
    }

    #[test]
    fn test_sowing_skips_source_hole() {
        let mut state = GameState::new();
        state.board.set(14, Seed::Red, 17);
        apply(&mut state, mv("15R"), Player::One);

        // 17 seeds over the 15 other holes: holes 15 and 0 get two, the rest one.
        assert_eq!(state.board.seeds(14, Seed::Red), 0);
        assert_eq!(state.board.seeds(15, Seed::Red), 4);
        assert_eq!(state.board.seeds(0, Seed::Red), 4);
        assert_eq!(state.board.seeds(1, Seed::Red), 3);
        assert_eq!(state.board.seeds(13, Seed::Red), 3);
    }

    #[test]
    fn test_blue_skips_own_holes() {
        let mut state = GameState::new();
        let before = state;
        let outcome = apply(&mut state, mv("1B"), Player::One);

        // Two blue seeds land in holes 1 and 3 (opponent's), skipping hole 2.
        assert_eq!(state.board.seeds(1, Seed::Blue), 3);
        assert_eq!(state.board.seeds(2, Seed::Blue), 2);
        assert_eq!(state.board.seeds(3, Seed::Blue), 3);
        assert_eq!(outcome.chain_start, 3);
        for hole in (0..HOLES).filter(|&h| Player::One.owns(h) && h != 0) {
            assert_eq!(state.board.hole_total(hole), before.board.hole_total(hole));
        }
    }

    #[test]
    fn test_transitional_sown_before_color_without_skip() {
        let mut state = GameState::new();
        apply(&mut state, mv("1TB"), Player::One);

        // Transitional seeds go to holes 1 and 2 (no skip), blue continues at 3 and 5.
        assert_eq!(state.board.seeds(0, Seed::Transitional), 0);
        assert_eq!(state.board.seeds(0, Seed::Blue), 0);
        assert_eq!(state.board.seeds(0, Seed::Red), 2);
        assert_eq!(state.board.seeds(1, Seed::Transitional), 3);
        assert_eq!(state.board.seeds(2, Seed::Transitional), 3);
        assert_eq!(state.board.seeds(3, Seed::Blue), 3);
        assert_eq!(state.board.seeds(4, Seed::Blue), 2);
        assert_eq!(state.board.seeds(5, Seed::Blue), 3);
    }

    #[test]
    fn test_trans_as_red_takes_both() {
        let mut state = GameState::new();
        let outcome = apply(&mut state, mv("2TR"), Player::Two);

        assert_eq!(outcome.harvested, 4);
        assert_eq!(state.board.seeds(1, Seed::Transitional), 0);
        assert_eq!(state.board.seeds(1, Seed::Red), 0);
        assert_eq!(state.board.seeds(1, Seed::Blue), 2);
        assert_eq!(state.board.seeds(2, Seed::Transitional), 3);
        assert_eq!(state.board.seeds(3, Seed::Transitional), 3);
        assert_eq!(state.board.seeds(4, Seed::Red), 3);
        assert_eq!(state.board.seeds(5, Seed::Red), 3);
        assert_eq!(outcome.chain_start, 5);
    }

    #[test]
    fn test_capture_chain_backwards() {
        let mut state = GameState {
            board: Board::empty(),
            ..GameState::new()
        };
        state.board.set(0, Seed::Red, 2);
        state.board.set(1, Seed::Blue, 1);
        state.board.set(2, Seed::Red, 2);
        state.board.set(3, Seed::Red, 20);

        // Lands in hole 2 (total 3), hole 1 (total 2 after drop) is captured next.
        let outcome = apply(&mut state, mv("1R"), Player::One);

        assert_eq!(outcome.chain_start, 2);
        assert_eq!(outcome.captured, 5);
        assert_eq!(state.score_p1(), 5);
        assert_eq!(state.board.hole_total(1), 0);
        assert_eq!(state.board.hole_total(2), 0);
        assert_eq!(outcome.captured_holes().collect::<Vec<_>>(), vec![1, 2]);
        // Source hole is empty (total 0), so the chain stops there.
        assert!(!outcome.was_captured(0));
        assert_eq!(state.board.hole_total(3), 20);
    }

    #[test]
    fn test_capture_previous_hole_with_three() {
        let mut state = GameState {
            board: Board::empty(),
            ..GameState::new()
        };
        state.board.set(0, Seed::Blue, 2);
        state.board.set(1, Seed::Red, 3);
        state.board.set(2, Seed::Red, 3);
        state.board.set(3, Seed::Red, 1);
        state.board.set(9, Seed::Red, 30);

        // Blue seeds land in holes 1 and 3, skipping hole 2 which keeps its 3 seeds.
        let outcome = apply(&mut state, mv("1B"), Player::One);

        assert_eq!(outcome.chain_start, 3);
        assert!(outcome.was_captured(3));
        assert!(outcome.was_captured(2));
        assert_eq!(state.board.hole_total(2), 0);
        // Hole 1 holds 4 seeds, so the chain stops there.
        assert!(!outcome.was_captured(1));
        assert_eq!(state.board.hole_total(1), 4);
        assert_eq!(outcome.captured, 5);
        assert_eq!(state.score_p1(), 5);
    }

    #[test]
    fn test_capture_credits_mover() {
        let mut state = GameState {
            board: Board::empty(),
            ..GameState::new()
        };
        state.board.set(5, Seed::Red, 2);
        state.board.set(6, Seed::Red, 3);
        state.board.set(7, Seed::Red, 1);
        state.board.set(8, Seed::Red, 30);

        // Holes 6 and 7 get one seed each: 7 reaches 2, 6 reaches 4.
        let outcome = apply(&mut state, mv("6R"), Player::Two);

        assert_eq!(outcome.chain_start, 7);
        assert_eq!(outcome.captured, 2);
        assert_eq!(state.score_p2(), 2);
        assert_eq!(state.score_p1(), 0);
        assert_eq!(state.board.hole_total(6), 4);
    }

    #[test]
    fn test_capture_stops_at_other_totals() {
        let mut state = GameState {
            board: Board::empty(),
            ..GameState::new()
        };
        state.board.set(0, Seed::Red, 1);
        state.board.set(1, Seed::Red, 3);
        state.board.set(9, Seed::Red, 20);

        // Hole 1 reaches 4 seeds: no capture at all.
        let outcome = apply(&mut state, mv("1R"), Player::One);
        assert_eq!(outcome.captured, 0);
        assert_eq!(state.board.hole_total(1), 4);
    }

    #[test]
    fn test_capture_chain_wraps_and_stops_before_start() {
        // Every hole but the landing one holds two seeds; the chain wraps around
        // the board and must stop before revisiting its start.
        let mut state = GameState {
            board: Board::empty(),
            ..GameState::new()
        };
        for hole in 0..HOLES {
            state.board.set(hole, Seed::Transitional, 2);
        }
        state.board.set(0, Seed::Red, 1);
        state.board.set(1, Seed::Transitional, 1);

        let outcome = apply(&mut state, mv("1R"), Player::One);
        assert_eq!(outcome.chain_start, 1);
        // Hole 0 still has 2 transitional seeds and is captured on the wrap.
        let captured: Vec<_> = outcome.captured_holes().collect();
        assert_eq!(captured.len(), HOLES);
        assert_eq!(outcome.captured, 32);
        assert_eq!(state.seeds_on_board(), 0);
        assert_eq!(state.score_p1(), 32);
    }

    #[test]
    fn test_apply_counts_every_move() {
        let mut state = GameState::new();
        apply(&mut state, mv("1R"), Player::One);
        apply(&mut state, mv("2R"), Player::Two);
        apply(&mut state, mv("3TB"), Player::One);
        assert_eq!(state.moves_count, 3);
        assert_eq!(state.seeds_on_board() + state.scores.total(), 96);
    }

    #[test]
    fn test_termination_conditions() {
        let mut state = GameState::new();
        assert_eq!(termination(&state), None);

        state.scores.p1 = WINNING_SCORE;
        assert_eq!(termination(&state), Some(EndReason::ScoreReached(Player::One)));

        state.scores.p1 = WINNING_SCORE - 1;
        state.scores.p2 = WINNING_SCORE;
        assert_eq!(termination(&state), Some(EndReason::ScoreReached(Player::Two)));

        state.scores.p2 = 0;
        state.moves_count = MAX_MOVES;
        assert_eq!(termination(&state), Some(EndReason::MoveLimit));

        state.moves_count = MAX_MOVES - 1;
        assert!(!is_terminal(&state));

        state.board = Board::empty();
        state.board.set(3, Seed::Red, 9);
        assert_eq!(termination(&state), Some(EndReason::BoardDepleted));
        state.board.set(3, Seed::Red, 10);
        assert!(!is_terminal(&state));
    }

    #[test]
    fn test_move_limit_reported_first() {
        let mut state = GameState::new();
        state.moves_count = MAX_MOVES;
        state.scores.p1 = 60;
        state.board = Board::empty();
        assert_eq!(termination(&state), Some(EndReason::MoveLimit));
        // Pure: asking again gives the same answer.
        assert_eq!(termination(&state), Some(EndReason::MoveLimit));
    }

    #[test]
    fn test_legal_moves_initial() {
        let state = GameState::new();
        let moves = legal_moves(&state, Player::One);
        assert_eq!(moves.len(), 8 * SowType::ALL.len());
        assert!(moves.iter().all(|m| m.hole() % 2 == 0));
        assert!(legal_moves(&GameState { board: Board::empty(), ..state }, Player::Two).is_empty());
    }
}
