//! Player identity and hole ownership.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two sides of a game.
///
/// Hole ownership is derived from parity: even hole indices belong to
/// [`Player::One`], odd ones to [`Player::Two`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Moves first and owns the even holes.
    One,
    /// Moves second and owns the odd holes.
    Two,
}

impl Player {
    /// Both players in seat order.
    pub const ALL: [Player; 2] = [Player::One, Player::Two];

    /// The other player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// 1-based player number as used on the wire and in verdicts.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    /// 0-based seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    /// Player from a 1-based number.
    #[must_use]
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }

    /// Check whether `hole` belongs to this player.
    #[inline]
    #[must_use]
    pub const fn owns(self, hole: usize) -> bool {
        let even = hole % 2 == 0;
        match self {
            Player::One => even,
            Player::Two => !even,
        }
    }

    /// Owner of a hole.
    #[inline]
    #[must_use]
    pub const fn owner_of(hole: usize) -> Self {
        if hole % 2 == 0 { Player::One } else { Player::Two }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "J{}", self.number())
    }
}


/// Kani proofs for the ownership split.
///
/// Run with: `cargo kani`
#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// Every hole has exactly one owner.
    #[kani::proof]
    fn prove_ownership_partition() {
        let hole: usize = kani::any();
        kani::assume(hole < 16);
        assert!(Player::One.owns(hole) != Player::Two.owns(hole));
        assert!(Player::owner_of(hole).owns(hole));
    }
}
