//! Match lifecycle: turn sequencing, capture application and settlement.

use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::board::{Board, Capture};
use crate::constants::{ENTRY_DIE, ENTRY_FEE};
use crate::dice::{DiceController, TurnContext};
use crate::numbers;
use crate::player::{Color, MoveOutcome, Player};
use crate::profile::Profile;
use crate::rng::derive_stream_seed;
use crate::strategy;
use crate::trace::{DecisionTrace, Stage};

/// Boundary errors for match creation and sequencing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("entry fee {fee} exceeds available balance {balance}")]
    InsufficientFunds { fee: i64, balance: i64 },
    #[error("match already ended")]
    MatchOver,
}

/// Everything that happened during one seat's turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: u32,
    pub seat: usize,
    pub player: u8,
    pub value: u8,
    pub stage: Stage,
    pub no_move: bool,
    pub piece: Option<usize>,
    pub captures: SmallVec<[Capture; 2]>,
    pub finished_piece: bool,
    pub anti_capture: bool,
    pub bonus_turn: bool,
}

/// One match from entry fee to settlement.
///
/// Headless: both the human seat and the bots are auto-played by the same
/// move policy; hosts that take real input drive the same primitives.
#[derive(Debug)]
pub struct GameSession {
    players: Vec<Player>,
    board: Board,
    controller: DiceController,
    profile: Profile,
    current: usize,
    turn: u32,
    pot: i64,
    winner: Option<u8>,
    records: Vec<TurnRecord>,
    strategy_rng: ChaCha20Rng,
}

impl GameSession {
    /// Seat the human (always Blue) against `bot_count` bots, collect the
    /// entry fee and build the pot.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InsufficientFunds`] when the profile cannot
    /// cover the entry fee.
    pub fn new(seed: u64, bot_count: usize, mut profile: Profile) -> Result<Self, SessionError> {
        if profile.balance < ENTRY_FEE {
            return Err(SessionError::InsufficientFunds {
                fee: ENTRY_FEE,
                balance: profile.balance,
            });
        }
        profile.balance -= ENTRY_FEE;

        let bot_count = bot_count.clamp(1, 3);
        let mut players = vec![Player::new(0, Color::Blue, false, "You")];
        for bot in 0..bot_count {
            let id = u8::try_from(bot + 1).unwrap_or(u8::MAX);
            players.push(Player::new(
                id,
                Color::ALL[bot + 1],
                true,
                format!("Bot {}", bot + 1),
            ));
        }
        let pot = ENTRY_FEE * numbers::usize_to_i64(players.len());
        for player in &players {
            debug!("seated {} on {}", player.name, player.color.name());
        }

        Ok(Self {
            players,
            board: Board,
            controller: DiceController::new(seed),
            profile,
            current: 0,
            turn: 0,
            pot,
            winner: None,
            records: Vec::new(),
            strategy_rng: ChaCha20Rng::seed_from_u64(derive_stream_seed(seed, b"strategy")),
        })
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    #[must_use]
    pub fn winner(&self) -> Option<u8> {
        self.winner
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn pot(&self) -> i64 {
        self.pot
    }

    #[must_use]
    pub fn records(&self) -> &[TurnRecord] {
        &self.records
    }

    #[must_use]
    pub fn last_trace(&self) -> Option<&DecisionTrace> {
        self.controller.last_trace()
    }

    #[must_use]
    pub fn into_profile(self) -> Profile {
        self.profile
    }

    /// Play one full turn for the current seat.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MatchOver`] once a winner exists.
    pub fn play_turn(&mut self) -> Result<TurnRecord, SessionError> {
        if self.winner.is_some() {
            return Err(SessionError::MatchOver);
        }
        self.turn += 1;
        let seat = self.current;
        let is_human = !self.players[seat].is_bot;
        let recent = self.profile.recent_win_rate();

        let value = {
            let mut ctx = TurnContext {
                players: &mut self.players,
                current: seat,
                board: &self.board,
                turn: self.turn,
                recent_win_rate: recent,
            };
            self.controller.decide(is_human, &mut ctx)
        };
        let (stage, anti_capture) = self
            .controller
            .last_trace()
            .map_or((Stage::SigmoidHigh, false), |t| {
                (t.stage, t.anti_capture_applied)
            });
        let player_id = self.players[seat].id;

        let movable = self.players[seat].movable_pieces(value);
        let Some(&fallback) = movable.first() else {
            self.controller.notify_no_move(player_id);
            debug!("seat {player_id} rolled {value} with no legal move");
            let record = TurnRecord {
                turn: self.turn,
                seat,
                player: player_id,
                value,
                stage,
                no_move: true,
                piece: None,
                captures: SmallVec::new(),
                finished_piece: false,
                anti_capture,
                bonus_turn: false,
            };
            self.records.push(record.clone());
            self.advance_seat();
            return Ok(record);
        };

        let piece = strategy::choose_move(
            &self.players,
            seat,
            &self.board,
            value,
            &mut self.strategy_rng,
        )
        .unwrap_or(fallback);
        let landing = self.players[seat].target_step(piece, value);
        let outcome = self.players[seat].move_piece(piece, value);
        let finished_piece = outcome == Some(MoveOutcome::Finished);

        let mut captures: SmallVec<[Capture; 2]> = SmallVec::new();
        if !finished_piece && let Some(landing) = landing {
            captures = self
                .board
                .check_capture(&self.players, self.players[seat].color, landing);
            for capture in &captures {
                if let Some(victim) = self
                    .players
                    .iter_mut()
                    .find(|p| p.id == capture.victim)
                {
                    victim.send_home(capture.piece);
                    debug!("seat {player_id} captured seat {} piece {}", capture.victim, capture.piece);
                }
            }
        }

        self.controller.notify_move(player_id);

        let won = self.players[seat].has_won();
        let bonus_turn = !won && (value == ENTRY_DIE || !captures.is_empty() || finished_piece);
        let record = TurnRecord {
            turn: self.turn,
            seat,
            player: player_id,
            value,
            stage,
            no_move: false,
            piece: Some(piece),
            captures,
            finished_piece,
            anti_capture,
            bonus_turn,
        };
        self.records.push(record.clone());

        if won {
            self.winner = Some(player_id);
            self.settle(seat);
        } else if !bonus_turn {
            self.advance_seat();
        }
        Ok(record)
    }

    /// Run turns until a winner emerges or the turn cap is reached.
    pub fn run_to_completion(&mut self, max_turns: u32) -> Option<u8> {
        while self.winner.is_none() && self.turn < max_turns {
            if self.play_turn().is_err() {
                break;
            }
        }
        self.winner
    }

    fn advance_seat(&mut self) {
        self.current = (self.current + 1) % self.players.len();
    }

    fn settle(&mut self, seat: usize) {
        let human_won = !self.players[seat].is_bot;
        if human_won {
            self.profile.balance += self.pot;
        }
        self.profile.record_match(human_won);
        debug!(
            "match settled: winner seat {seat}, pot {}, human won: {human_won}",
            self.pot
        );
    }
}
