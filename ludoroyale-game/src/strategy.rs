//! Move selection for automated seats.
//!
//! The dice controller already steers outcomes, so seats play a single
//! medium-strength policy: greedy scoring with a small random jitter.

use rand::Rng;

use crate::board::Board;
use crate::constants::{
    MOVE_SCORE_CAPTURE, MOVE_SCORE_ENTER, MOVE_SCORE_FINISH, MOVE_SCORE_JITTER, MOVE_SCORE_SAFE,
    PATH_LENGTH,
};
use crate::numbers;
use crate::player::{PiecePos, Player};

/// Pick the piece the acting seat plays for `die`, or `None` when nothing
/// moves. Scores captures, entering, finishing and safe landings, with a
/// jitter term to keep play from being fully predictable.
#[must_use]
pub fn choose_move<R: Rng>(
    players: &[Player],
    seat: usize,
    board: &Board,
    die: u8,
    rng: &mut R,
) -> Option<usize> {
    let player = &players[seat];
    let mut best: Option<(usize, f64)> = None;

    for piece in player.movable_pieces(die) {
        let Some(landing) = player.target_step(piece, die) else {
            continue;
        };
        let mut score = 0.0;
        let captures = board.check_capture(players, player.color, landing);
        score += MOVE_SCORE_CAPTURE * numbers::usize_to_f64(captures.len());
        if matches!(player.pieces[piece], PiecePos::Base) {
            score += MOVE_SCORE_ENTER;
        }
        if landing == PATH_LENGTH {
            score += MOVE_SCORE_FINISH;
        }
        if board.is_safe_landing(player.color, landing) {
            score += MOVE_SCORE_SAFE;
        }
        score += rng.gen_range(0.0..MOVE_SCORE_JITTER);

        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((piece, score));
        }
    }

    best.map(|(piece, _)| piece)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Color;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn seats() -> Vec<Player> {
        vec![
            Player::new(0, Color::Blue, false, "You"),
            Player::new(1, Color::Green, true, "Bot 1"),
        ]
    }

    #[test]
    fn no_movable_piece_yields_none() {
        let players = seats();
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(choose_move(&players, 0, &Board, 3, &mut rng), None);
    }

    #[test]
    fn finishing_outranks_a_plain_advance() {
        let mut players = seats();
        players[0].pieces[0] = PiecePos::Track(10);
        players[0].pieces[1] = PiecePos::Track(53);
        let mut rng = SmallRng::seed_from_u64(2);
        for _ in 0..50 {
            assert_eq!(choose_move(&players, 0, &Board, 3, &mut rng), Some(1));
        }
    }

    #[test]
    fn capturing_outranks_a_plain_advance() {
        let mut players = seats();
        players[0].pieces[0] = PiecePos::Track(10);
        players[0].pieces[1] = PiecePos::Track(20);
        // Green step 38 sits on ring 12: captured by piece 0 advancing 2.
        players[1].pieces[0] = PiecePos::Track(38);
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..50 {
            assert_eq!(choose_move(&players, 0, &Board, 2, &mut rng), Some(0));
        }
    }
}
