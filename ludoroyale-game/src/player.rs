//! Participants, piece positions and move legality.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::{ENTRY_DIE, PATH_LENGTH, PIECES_PER_PLAYER};

/// Fixed lane assignment around the board ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Blue,
    Red,
    Green,
    Yellow,
}

impl Color {
    pub const ALL: [Self; 4] = [Self::Blue, Self::Red, Self::Green, Self::Yellow];

    /// Offset of this lane's entry square on the shared ring.
    #[must_use]
    pub const fn ring_offset(self) -> u8 {
        match self {
            Self::Blue => 0,
            Self::Red => 13,
            Self::Green => 26,
            Self::Yellow => 39,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Blue => "Blue",
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Yellow => "Yellow",
        }
    }
}

/// A single piece's progress along its own lane.
///
/// `Track` steps run from 0 (entry square) to 55; step 56 is the transient
/// finishing step that immediately converts to `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PiecePos {
    #[default]
    Base,
    Track(u8),
    Done,
}

impl PiecePos {
    #[must_use]
    pub const fn track_step(self) -> Option<u8> {
        match self {
            Self::Track(step) => Some(step),
            Self::Base | Self::Done => None,
        }
    }

    /// Steps left to the goal from this position.
    #[must_use]
    pub const fn remaining(self) -> u32 {
        match self {
            Self::Base => PATH_LENGTH as u32,
            Self::Track(step) => (PATH_LENGTH - step) as u32,
            Self::Done => 0,
        }
    }
}

/// What a completed piece move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Entered,
    Advanced,
    Finished,
}

/// One seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: u8,
    pub color: Color,
    pub is_bot: bool,
    pub name: String,
    pub pieces: [PiecePos; PIECES_PER_PLAYER],
    /// Count of pieces that reached the goal. Kept alongside the piece array
    /// so scoring never has to rescan for the `Done` sentinel.
    #[serde(default)]
    pub finished: u8,
}

impl Player {
    #[must_use]
    pub fn new(id: u8, color: Color, is_bot: bool, name: impl Into<String>) -> Self {
        Self {
            id,
            color,
            is_bot,
            name: name.into(),
            pieces: [PiecePos::Base; PIECES_PER_PLAYER],
            finished: 0,
        }
    }

    pub fn reset(&mut self) {
        self.pieces = [PiecePos::Base; PIECES_PER_PLAYER];
        self.finished = 0;
    }

    /// The lane step `piece` would occupy after advancing by `die`, or `None`
    /// when the move is illegal (locked in base without a 6, already done,
    /// or overshooting the goal).
    #[must_use]
    pub fn target_step(&self, piece: usize, die: u8) -> Option<u8> {
        match self.pieces[piece] {
            PiecePos::Base if die == ENTRY_DIE => Some(0),
            PiecePos::Track(step) if step + die <= PATH_LENGTH => Some(step + die),
            PiecePos::Base | PiecePos::Track(_) | PiecePos::Done => None,
        }
    }

    #[must_use]
    pub fn is_valid_move(&self, piece: usize, die: u8) -> bool {
        self.target_step(piece, die).is_some()
    }

    /// Whether any piece has a legal move for `die`.
    #[must_use]
    pub fn can_move(&self, die: u8) -> bool {
        (0..PIECES_PER_PLAYER).any(|piece| self.is_valid_move(piece, die))
    }

    #[must_use]
    pub fn movable_pieces(&self, die: u8) -> SmallVec<[usize; PIECES_PER_PLAYER]> {
        (0..PIECES_PER_PLAYER)
            .filter(|&piece| self.is_valid_move(piece, die))
            .collect()
    }

    /// Apply a legal move, keeping the finished counter in sync. Returns
    /// `None` for an illegal move, leaving the layout untouched.
    pub fn move_piece(&mut self, piece: usize, die: u8) -> Option<MoveOutcome> {
        let target = self.target_step(piece, die)?;
        if target == PATH_LENGTH {
            self.pieces[piece] = PiecePos::Done;
            self.finished += 1;
            return Some(MoveOutcome::Finished);
        }
        let outcome = match self.pieces[piece] {
            PiecePos::Base => MoveOutcome::Entered,
            _ => MoveOutcome::Advanced,
        };
        self.pieces[piece] = PiecePos::Track(target);
        Some(outcome)
    }

    /// Return a captured piece to base.
    pub fn send_home(&mut self, piece: usize) {
        self.pieces[piece] = PiecePos::Base;
    }

    #[must_use]
    pub fn pieces_in_base(&self) -> usize {
        self.pieces
            .iter()
            .filter(|pos| matches!(pos, PiecePos::Base))
            .count()
    }

    #[must_use]
    pub fn has_won(&self) -> bool {
        usize::from(self.finished) == PIECES_PER_PLAYER
    }
}
