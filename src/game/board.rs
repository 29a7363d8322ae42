//! Board storage and game state.

use crate::game::Player;
use serde::{Deserialize, Serialize};

/// Number of holes on the circular track.
pub const HOLES: usize = 16;

/// Seeds of each color placed in every hole at the start of a game.
pub const INITIAL_SEEDS_PER_CELL: u8 = 2;

/// Total seeds in play: 16 holes × 3 colors × 2 seeds.
pub const TOTAL_SEEDS: u32 = (HOLES * Seed::COUNT) as u32 * INITIAL_SEEDS_PER_CELL as u32;

/// Seed color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seed {
    /// Red seeds, sown everywhere except the source hole.
    Red,
    /// Blue seeds, which skip the mover's own holes when sown.
    Blue,
    /// Transitional seeds, harvested together with a chosen color.
    Transitional,
}

impl Seed {
    /// Number of seed colors.
    pub const COUNT: usize = 3;

    /// All colors in storage order.
    pub const ALL: [Seed; Self::COUNT] = [Seed::Red, Seed::Blue, Seed::Transitional];

    /// Storage slot of this color inside a hole.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Seed::Red => 0,
            Seed::Blue => 1,
            Seed::Transitional => 2,
        }
    }
}

/// Next hole in sowing order.
#[inline]
#[must_use]
pub const fn next_hole(hole: usize) -> usize {
    (hole + 1) % HOLES
}

/// Previous hole in sowing order (capture direction).
#[inline]
#[must_use]
pub const fn prev_hole(hole: usize) -> usize {
    (hole + HOLES - 1) % HOLES
}

/// The 16 × 3 seed matrix.
///
/// All index arithmetic lives in the accessors below; callers pass a hole
/// index in `0..HOLES` and a [`Seed`] color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Seed counts indexed by `[hole][seed.index()]`.
    cells: [[u8; Seed::COUNT]; HOLES],
}

impl Board {
    /// Board with `INITIAL_SEEDS_PER_CELL` seeds of every color in every hole.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cells: [[INITIAL_SEEDS_PER_CELL; Seed::COUNT]; HOLES],
        }
    }

    /// Board with no seeds at all.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            cells: [[0; Seed::COUNT]; HOLES],
        }
    }

    /// Seeds of one color in a hole.
    #[inline]
    #[must_use]
    pub fn seeds(&self, hole: usize, seed: Seed) -> u8 {
        self.cells[hole][seed.index()]
    }

    /// Overwrite the count of one color in a hole.
    #[inline]
    pub fn set(&mut self, hole: usize, seed: Seed, count: u8) {
        self.cells[hole][seed.index()] = count;
    }

    /// Add seeds of one color to a hole.
    ///
    /// Saturates at `u8::MAX`; reaching it is an invariant violation reported
    /// by [`check_invariants`](crate::game::check_invariants), never a valid state.
    #[inline]
    pub fn add(&mut self, hole: usize, seed: Seed, count: u8) {
        let cell = &mut self.cells[hole][seed.index()];
        debug_assert!(cell.checked_add(count).is_some(), "seed count overflow in hole {hole}");
        *cell = cell.saturating_add(count);
    }

    /// Remove and return all seeds of one color from a hole.
    #[inline]
    pub fn take(&mut self, hole: usize, seed: Seed) -> u8 {
        std::mem::take(&mut self.cells[hole][seed.index()])
    }

    /// Empty a hole of every color, returning how many seeds it held.
    pub fn clear_hole(&mut self, hole: usize) -> u32 {
        let total = self.hole_total(hole);
        self.cells[hole] = [0; Seed::COUNT];
        total
    }

    /// Seeds of all colors in a hole.
    #[inline]
    #[must_use]
    pub fn hole_total(&self, hole: usize) -> u32 {
        self.cells[hole].iter().map(|&c| u32::from(c)).sum()
    }

    /// Seeds of all colors on the whole board.
    #[must_use]
    pub fn total(&self) -> u32 {
        (0..HOLES).map(|hole| self.hole_total(hole)).sum()
    }

    /// Seeds in the holes owned by `player`.
    #[must_use]
    pub fn total_for(&self, player: Player) -> u32 {
        (0..HOLES)
            .filter(|&hole| player.owns(hole))
            .map(|hole| self.hole_total(hole))
            .sum()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Running scores of both players.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scores {
    /// Seeds captured by player one.
    pub p1: u32,
    /// Seeds captured by player two.
    pub p2: u32,
}

impl Scores {
    /// Create scores from explicit values.
    #[must_use]
    pub const fn new(p1: u32, p2: u32) -> Self {
        Self { p1, p2 }
    }

    /// Score of one player.
    #[must_use]
    pub const fn get(&self, player: Player) -> u32 {
        match player {
            Player::One => self.p1,
            Player::Two => self.p2,
        }
    }

    /// Credit captured seeds to a player.
    pub fn add(&mut self, player: Player, seeds: u32) {
        match player {
            Player::One => self.p1 += seeds,
            Player::Two => self.p2 += seeds,
        }
    }

    /// Sum of both scores.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.p1 + self.p2
    }
}

/// Complete game state.
///
/// During a game this is only mutated by [`apply`](crate::game::apply).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GameState {
    /// The seed matrix.
    pub board: Board,
    /// Captured seeds per player.
    pub scores: Scores,
    /// Moves applied so far.
    pub moves_count: u32,
}

impl GameState {
    /// Initial position: two seeds of each color everywhere, no score, no moves.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            board: Board::new(),
            scores: Scores::new(0, 0),
            moves_count: 0,
        }
    }

    /// Player one's score.
    #[must_use]
    pub const fn score_p1(&self) -> u32 {
        self.scores.p1
    }

    /// Player two's score.
    #[must_use]
    pub const fn score_p2(&self) -> u32 {
        self.scores.p2
    }

    /// Seeds still on the board.
    #[must_use]
    pub fn seeds_on_board(&self) -> u32 {
        self.board.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = GameState::new();
        for hole in 0..HOLES {
            for seed in Seed::ALL {
                assert_eq!(state.board.seeds(hole, seed), 2);
            }
        }
        assert_eq!(state.seeds_on_board(), 96);
        assert_eq!(state.seeds_on_board(), TOTAL_SEEDS);
        assert_eq!(state.score_p1(), 0);
        assert_eq!(state.score_p2(), 0);
        assert_eq!(state.moves_count, 0);
    }

    #[test]
    fn test_accessors() {
        let mut board = Board::empty();
        board.set(3, Seed::Blue, 4);
        board.add(3, Seed::Blue, 2);
        board.add(3, Seed::Red, 1);
        assert_eq!(board.seeds(3, Seed::Blue), 6);
        assert_eq!(board.hole_total(3), 7);

        assert_eq!(board.take(3, Seed::Blue), 6);
        assert_eq!(board.seeds(3, Seed::Blue), 0);
        assert_eq!(board.clear_hole(3), 1);
        assert_eq!(board.total(), 0);
    }

    #[test]
    fn test_circular_neighbours() {
        assert_eq!(next_hole(15), 0);
        assert_eq!(next_hole(0), 1);
        assert_eq!(prev_hole(0), 15);
        assert_eq!(prev_hole(7), 6);
    }

    #[test]
    fn test_total_for_splits_board() {
        let state = GameState::new();
        assert_eq!(state.board.total_for(Player::One), 48);
        assert_eq!(state.board.total_for(Player::Two), 48);
    }

    #[test]
    fn test_scores() {
        let mut scores = Scores::default();
        scores.add(Player::Two, 3);
        scores.add(Player::One, 2);
        scores.add(Player::Two, 2);
        assert_eq!(scores.get(Player::One), 2);
        assert_eq!(scores.get(Player::Two), 5);
        assert_eq!(scores.total(), 7);
    }
}
