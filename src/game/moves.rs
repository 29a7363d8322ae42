//! Moves and their wire syntax.
//!
//! A move is written as a 1-based hole number followed by a sowing type:
//! `R`, `B`, `TR` or `TB` (for example `7R` or `12TB`).

use crate::game::{HOLES, Seed};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How the seeds of the source hole are harvested and sown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SowType {
    /// Sow the red seeds.
    Red,
    /// Sow the blue seeds.
    Blue,
    /// Sow the transitional seeds, then the red ones.
    TransAsRed,
    /// Sow the transitional seeds, then the blue ones.
    TransAsBlue,
}

impl SowType {
    /// All sowing types.
    pub const ALL: [SowType; 4] = [
        SowType::Red,
        SowType::Blue,
        SowType::TransAsRed,
        SowType::TransAsBlue,
    ];

    /// Color that is played (and sown in the second sub-pass).
    #[must_use]
    pub const fn color(self) -> Seed {
        match self {
            SowType::Red | SowType::TransAsRed => Seed::Red,
            SowType::Blue | SowType::TransAsBlue => Seed::Blue,
        }
    }

    /// Whether the transitional seeds are harvested too.
    #[must_use]
    pub const fn uses_transitional(self) -> bool {
        matches!(self, SowType::TransAsRed | SowType::TransAsBlue)
    }

    /// Seed kind that must be present in the source hole for the move to be legal.
    #[must_use]
    pub const fn required_seed(self) -> Seed {
        if self.uses_transitional() {
            Seed::Transitional
        } else {
            self.color()
        }
    }

    /// Wire suffix.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            SowType::Red => "R",
            SowType::Blue => "B",
            SowType::TransAsRed => "TR",
            SowType::TransAsBlue => "TB",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "R" => Some(SowType::Red),
            "B" => Some(SowType::Blue),
            "TR" => Some(SowType::TransAsRed),
            "TB" => Some(SowType::TransAsBlue),
            _ => None,
        }
    }
}

/// Why a response could not be read as a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseMoveError {
    /// The text does not start with a hole number.
    #[error("missing hole number")]
    MissingHole,
    /// The hole number is outside `1..=16`.
    #[error("hole number out of range")]
    HoleOutOfRange,
    /// The text after the hole number is not `R`, `B`, `TR` or `TB`.
    #[error("unknown sowing type")]
    UnknownType,
}

/// A syntactically valid move: source hole and sowing type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    hole: usize,
    sow_type: SowType,
}

impl Move {
    /// Build a move from a 0-based hole index.
    ///
    /// Returns `None` if the hole is not on the board.
    #[must_use]
    pub const fn new(hole: usize, sow_type: SowType) -> Option<Self> {
        if hole < HOLES {
            Some(Self { hole, sow_type })
        } else {
            None
        }
    }

    /// Parse an agent response; malformed text yields `None`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        text.parse().ok()
    }

    /// 0-based source hole.
    #[must_use]
    pub const fn hole(self) -> usize {
        self.hole
    }

    /// Sowing type.
    #[must_use]
    pub const fn sow_type(self) -> SowType {
        self.sow_type
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return Err(ParseMoveError::MissingHole);
        }
        let (number, suffix) = s.split_at(digits);

        let sow_type = SowType::from_suffix(suffix).ok_or(ParseMoveError::UnknownType)?;
        // Overflowing numbers are out of range too.
        let number: usize = number.parse().map_err(|_| ParseMoveError::HoleOutOfRange)?;
        let hole = number.checked_sub(1).ok_or(ParseMoveError::HoleOutOfRange)?;

        Move::new(hole, sow_type).ok_or(ParseMoveError::HoleOutOfRange)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.hole + 1, self.sow_type.suffix())
    }
}


/// Kani proofs for move parsing.
///
/// Run with: `cargo kani`
#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// A parsed move always refers to a hole on the board.
    #[kani::proof]
    #[kani::unwind(6)]
    fn prove_parsed_hole_in_range() {
        let bytes: [u8; 4] = kani::any();
        if let Ok(text) = std::str::from_utf8(&bytes) {
            if let Some(mv) = Move::parse(text) {
                assert!(mv.hole() < HOLES);
            }
        }
    }
}
