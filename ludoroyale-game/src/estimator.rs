//! Heuristic win-rate estimation from a participant's piece layout alone.

use crate::constants::{
    SCORE_BLEND, SCORE_SCALE, TOTAL_STEPS, WEIGHT_BASE, WEIGHT_DONE, WEIGHT_TRACK,
};
use crate::numbers;
use crate::player::{PiecePos, Player};

/// Predicted win rate in `[0, 1]` for the given layout.
///
/// Blends two normalized scores with equal weight: a structure score (where
/// the pieces sit: base, on track, or done) and a progress score (fraction
/// of the total path already covered). Finished pieces are counted via the
/// explicit counter, never by rescanning for the `Done` sentinel, so they
/// are never double-counted. Safe-square occupancy is deliberately ignored:
/// the estimator carries no board-geometry dependency.
#[must_use]
pub fn estimate(player: &Player) -> f64 {
    let mut base_count = 0u32;
    let mut track_count = 0u32;
    for pos in &player.pieces {
        match pos {
            PiecePos::Base => base_count += 1,
            PiecePos::Track(_) => track_count += 1,
            PiecePos::Done => {}
        }
    }
    let structure = f64::from(base_count) * WEIGHT_BASE
        + f64::from(track_count) * WEIGHT_TRACK
        + f64::from(u32::from(player.finished)) * WEIGHT_DONE;

    let remaining: u32 = player.pieces.iter().map(|pos| pos.remaining()).sum();
    let progress = (1.0 - f64::from(remaining) / f64::from(TOTAL_STEPS)) * SCORE_SCALE;

    numbers::clamp_unit((SCORE_BLEND * structure + SCORE_BLEND * progress) / SCORE_SCALE)
}
