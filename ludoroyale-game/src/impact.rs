//! Counterfactual capture-impact evaluation.

use crate::estimator;
use crate::player::{PiecePos, Player};

/// Scoped displacement of one piece back to base.
///
/// Constructing the guard performs the displacement; dropping it restores
/// the original position. Restoration therefore runs on every exit path,
/// including unwinding, so a failure mid-estimate can never corrupt the
/// authoritative layout.
pub(crate) struct DisplacedPiece<'a> {
    player: &'a mut Player,
    piece: usize,
    original: PiecePos,
}

impl<'a> DisplacedPiece<'a> {
    pub(crate) fn new(player: &'a mut Player, piece: usize) -> Self {
        let original = std::mem::replace(&mut player.pieces[piece], PiecePos::Base);
        Self {
            player,
            piece,
            original,
        }
    }

    pub(crate) fn player(&self) -> &Player {
        self.player
    }
}

impl Drop for DisplacedPiece<'_> {
    fn drop(&mut self) {
        self.player.pieces[self.piece] = self.original;
    }
}

/// Win-rate drop a hypothetical capture of `piece` would inflict on `victim`.
///
/// The victim's piece is provisionally sent back to base, re-estimated, and
/// restored before returning. Non-negative for any real capture target;
/// a negative result means the question was ill-posed (the piece was not on
/// the track).
#[must_use]
pub fn capture_impact(victim: &mut Player, piece: usize) -> f64 {
    let before = estimator::estimate(victim);
    let after = {
        let displaced = DisplacedPiece::new(victim, piece);
        estimator::estimate(displaced.player())
    };
    before - after
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Color;

    fn victim() -> Player {
        let mut p = Player::new(2, Color::Green, true, "Bot 2");
        p.pieces[1] = PiecePos::Track(30);
        p
    }

    #[test]
    fn impact_is_positive_and_restores_the_piece() {
        let mut p = victim();
        let delta = capture_impact(&mut p, 1);
        assert!(delta > 0.0);
        assert_eq!(p.pieces[1], PiecePos::Track(30));
    }

    #[test]
    fn impact_of_a_based_piece_is_zero_and_harmless() {
        let mut p = victim();
        let delta = capture_impact(&mut p, 0);
        assert!(delta.abs() < 1e-12);
        assert_eq!(p.pieces[0], PiecePos::Base);
        assert_eq!(p.pieces[1], PiecePos::Track(30));
    }

    #[test]
    fn displacement_restores_on_unwind() {
        let mut p = victim();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _displaced = DisplacedPiece::new(&mut p, 1);
            panic!("estimate blew up");
        }));
        assert!(result.is_err());
        assert_eq!(p.pieces[1], PiecePos::Track(30));
    }

    #[test]
    fn deeper_pieces_cost_more_to_lose() {
        let mut near = victim();
        near.pieces[1] = PiecePos::Track(5);
        let mut far = victim();
        far.pieces[1] = PiecePos::Track(50);
        let near_delta = capture_impact(&mut near, 1);
        let far_delta = capture_impact(&mut far, 1);
        assert!(far_delta > near_delta);
    }
}
