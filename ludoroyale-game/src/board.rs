//! Shared ring geometry, safe squares and capture detection.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::{RING_LENGTH, RING_SAFE_SQUARES, RING_STEP_MAX};
use crate::player::{Color, PiecePos, Player};

/// A lane-relative step resolved onto the shared board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Square {
    /// Still in the starting base.
    Base,
    /// One of the 52 shared ring squares.
    Ring(u8),
    /// Inside the lane-private finishing stretch (steps 51..=56).
    HomeStretch { lane: Color, step: u8 },
    /// Piece has left the board.
    Goal,
}

/// Identifies one captured piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    pub victim: u8,
    pub piece: usize,
}

/// Path service translating lane-relative progress into shared squares.
#[derive(Debug, Clone, Copy, Default)]
pub struct Board;

impl Board {
    /// Resolve a piece position onto the shared board.
    #[must_use]
    pub fn square_for(&self, color: Color, pos: PiecePos) -> Square {
        match pos {
            PiecePos::Base => Square::Base,
            PiecePos::Done => Square::Goal,
            PiecePos::Track(step) if step <= RING_STEP_MAX => {
                Square::Ring((step + color.ring_offset()) % RING_LENGTH)
            }
            PiecePos::Track(step) => Square::HomeStretch {
                lane: color,
                step: step - RING_STEP_MAX - 1,
            },
        }
    }

    /// Whether landing on `step` puts a piece of `color` on a safe square.
    #[must_use]
    pub fn is_safe_landing(&self, color: Color, step: u8) -> bool {
        matches!(
            self.square_for(color, PiecePos::Track(step)),
            Square::Ring(ring) if RING_SAFE_SQUARES.contains(&ring)
        )
    }

    /// Opposing pieces captured by a `mover`-colored piece landing on
    /// `landing_step`. Reports none for safe squares and the finishing
    /// stretch; every opposing piece on the target ring square is captured.
    #[must_use]
    pub fn check_capture(
        &self,
        players: &[Player],
        mover: Color,
        landing_step: u8,
    ) -> SmallVec<[Capture; 2]> {
        let mut captured = SmallVec::new();
        let Square::Ring(ring) = self.square_for(mover, PiecePos::Track(landing_step)) else {
            return captured;
        };
        if RING_SAFE_SQUARES.contains(&ring) {
            return captured;
        }
        for player in players {
            if player.color == mover {
                continue;
            }
            for (piece, pos) in player.pieces.iter().enumerate() {
                if self.square_for(player.color, *pos) == Square::Ring(ring) {
                    captured.push(Capture {
                        victim: player.id,
                        piece,
                    });
                }
            }
        }
        captured
    }
}
