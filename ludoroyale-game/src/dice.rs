//! Adaptive dice control: the outcome-steering pipeline.
//!
//! Every turn walks a fixed-precedence pipeline: failsafe (stuck
//! protection), endgame intervention, capture intervention, then the
//! sigmoid-weighted default roll. Exactly one stage produces the value;
//! a post-hoc anti-capture correction may then substitute a safer face,
//! whichever stage fired. The full decision trace is rebuilt on each call.

use std::collections::HashMap;

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use smallvec::SmallVec;

use crate::board::Board;
use crate::constants::{
    BALANCE_MIDPOINT, CAPTURE_GATE_OFFSET, CAPTURE_IMPACT_CEILING, CAPTURE_STREAK_PENALTY,
    DIE_FACES, ENDGAME_COLD_BALANCE, ENDGAME_DISTANCE_MAX, ENDGAME_FAVORABLE, ENDGAME_HOT_BALANCE,
    ENDGAME_PROB_COLD, ENDGAME_PROB_COOL, ENDGAME_PROB_HOT, ENDGAME_PROB_WARM, ENDGAME_UNFAVORABLE,
    ERA_DEVELOPMENT_END, ERA_EARLY_COEFF, ERA_FULL_COEFF, ERA_FULL_END, ERA_LATE_COEFF,
    ERA_RAMP_DOWN_END, ERA_RAMP_UP_END, FAILSAFE_THRESHOLD_MAX, FAILSAFE_THRESHOLD_MIN,
    LOW_GROUP_HIGH_SUB_PROB, LOW_SUB_HIGH, LOW_SUB_LOW, PATH_LENGTH, PIECES_PER_PLAYER,
    PROTECT_ENDGAME_TURN, PROTECT_FINISHED_MIN, PROTECT_HUMAN_HOT_RATE, PROTECT_LEAD_CAP,
    PROTECT_WEAK_MARGIN, RESCUE_NUDGE_THREE_BASED, RESCUE_NUDGE_TWO_BASED, SIGMOID_BASE_OFFSET,
};
use crate::estimator;
use crate::impact::capture_impact;
use crate::numbers;
use crate::player::{PiecePos, Player};
use crate::rng::RngBundle;
use crate::trace::{DecisionTrace, Stage};

/// Rolling no-move bookkeeping for one participant.
#[derive(Debug, Clone, Copy)]
struct FailsafeState {
    misses: u32,
    threshold: u32,
}

/// View of the match handed to [`DiceController::decide`].
///
/// Read-only to the estimator; the mutable borrow exists solely so the
/// capture-impact evaluation can perform its scoped, reversible piece
/// displacement. The layout is unchanged when `decide` returns.
pub struct TurnContext<'a> {
    pub players: &'a mut [Player],
    /// Index of the acting seat in `players`.
    pub current: usize,
    pub board: &'a Board,
    /// Monotonically increasing turn counter driving the era coefficients.
    pub turn: u32,
    /// Laplace-smoothed recent win rate of the human seat.
    pub recent_win_rate: f64,
}

/// Per-session dice controller owning all steering state.
#[derive(Debug)]
pub struct DiceController {
    failsafe: HashMap<u8, FailsafeState>,
    consecutive_captures: u32,
    last_player: Option<u8>,
    rngs: RngBundle,
    trace: Option<DecisionTrace>,
}

impl DiceController {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            failsafe: HashMap::new(),
            consecutive_captures: 0,
            last_player: None,
            rngs: RngBundle::from_user_seed(seed),
            trace: None,
        }
    }

    /// Trace of the most recent decision, replaced in full on every call.
    #[must_use]
    pub fn last_trace(&self) -> Option<&DecisionTrace> {
        self.trace.as_ref()
    }

    /// Record that the participant had no legal move this turn.
    pub fn notify_no_move(&mut self, player_id: u8) {
        let mut rng = self.rngs.failsafe();
        let state = self.failsafe.entry(player_id).or_insert_with(|| FailsafeState {
            misses: 0,
            threshold: rng.gen_range(FAILSAFE_THRESHOLD_MIN..=FAILSAFE_THRESHOLD_MAX),
        });
        state.misses += 1;
        debug!(
            "seat {player_id} no-move count {}/{}",
            state.misses, state.threshold
        );
    }

    /// Record a successful move: the miss counter resets and the threshold
    /// is redrawn.
    pub fn notify_move(&mut self, player_id: u8) {
        let mut rng = self.rngs.failsafe();
        let threshold = rng.gen_range(FAILSAFE_THRESHOLD_MIN..=FAILSAFE_THRESHOLD_MAX);
        self.failsafe
            .insert(player_id, FailsafeState { misses: 0, threshold });
    }

    /// Produce the steered die value for the acting seat.
    pub fn decide(&mut self, is_human_turn: bool, ctx: &mut TurnContext<'_>) -> u8 {
        let player_id = ctx.players[ctx.current].id;
        // An uninterrupted turn streak ends the moment the seat changes.
        if self.last_player != Some(player_id) {
            self.consecutive_captures = 0;
            self.last_player = Some(player_id);
        }

        let rates: SmallVec<[f64; 4]> = ctx.players.iter().map(estimator::estimate).collect();
        let average = rates.iter().sum::<f64>() / numbers::usize_to_f64(rates.len());
        let differential = rates[ctx.current] - average;
        let balance = {
            let b = ctx.recent_win_rate - BALANCE_MIDPOINT;
            // Automated seats receive the opposite correction from the
            // human's, concentrating the steering on the human experience.
            if is_human_turn { b } else { -b }
        };

        let mut trace = DecisionTrace {
            player: player_id,
            is_human: is_human_turn,
            turn: ctx.turn,
            stage: Stage::SigmoidHigh,
            rate: rates[ctx.current],
            rates: rates.clone(),
            average,
            differential,
            balance,
            influence: 0.0,
            low_group_prob: 0.0,
            capture_prob: 0.0,
            capture_gate_skipped: false,
            anti_capture_applied: false,
            value: 0,
        };

        let mut value = self.select_value(is_human_turn, ctx, differential, balance, &mut trace);

        // Post-hoc correction, re-checked every turn whatever stage fired.
        if self.protection_triggered(ctx, value, &rates, average) {
            debug!("anti-capture correction engaged for seat {player_id}");
            if let Some(substitute) = self.safe_roll(ctx, &rates, average) {
                value = substitute;
                trace.anti_capture_applied = true;
            }
        }

        trace.value = value;
        debug!(
            "seat {player_id} turn {}: {} -> {value}",
            ctx.turn,
            trace.stage.label()
        );
        self.trace = Some(trace);
        value
    }

    /// Walk stages 1-4 in strict precedence order; first match wins.
    fn select_value(
        &mut self,
        is_human_turn: bool,
        ctx: &mut TurnContext<'_>,
        differential: f64,
        balance: f64,
        trace: &mut DecisionTrace,
    ) -> u8 {
        let player_id = ctx.players[ctx.current].id;

        // 1. Failsafe: the seat has been stuck past its assigned threshold.
        if self
            .failsafe
            .get(&player_id)
            .is_some_and(|s| s.misses >= s.threshold)
            && let Some(value) = self.failsafe_roll(&ctx.players[ctx.current])
        {
            self.reset_failsafe(player_id);
            trace.stage = Stage::Failsafe;
            return value;
        }

        // 2. Endgame drama control, human seat only.
        if is_human_turn
            && let Some(value) = self.endgame_roll(&ctx.players[ctx.current], balance)
        {
            trace.stage = Stage::Endgame;
            return value;
        }

        // 3. Probability-gated capture assistance.
        let influence = differential + balance;
        let gate = self.capture_gate_prob(influence, ctx.turn);
        trace.capture_prob = gate;
        let open = {
            let mut rng = self.rngs.dice();
            rng.gen_bool(numbers::clamp_unit(gate))
        };
        if open {
            if let Some(value) = self.capture_search(ctx) {
                trace.stage = Stage::CaptureAssist;
                return value;
            }
        } else {
            trace.capture_gate_skipped = true;
        }

        // 4. Sigmoid-weighted default roll, never declines.
        self.sigmoid_roll(&ctx.players[ctx.current], differential, balance, trace)
    }

    fn reset_failsafe(&mut self, player_id: u8) {
        let mut rng = self.rngs.failsafe();
        let threshold = rng.gen_range(FAILSAFE_THRESHOLD_MIN..=FAILSAFE_THRESHOLD_MAX);
        self.failsafe
            .insert(player_id, FailsafeState { misses: 0, threshold });
    }

    /// Deadlock-breaking value: prefer finishing a piece outright, else any
    /// face with a legal move, chosen uniformly. Declines when nothing moves.
    fn failsafe_roll(&self, player: &Player) -> Option<u8> {
        for pos in &player.pieces {
            if let PiecePos::Track(step) = pos {
                let dist = PATH_LENGTH - step;
                if (1..=6).contains(&dist) {
                    return Some(dist);
                }
            }
        }
        let candidates: SmallVec<[u8; 6]> = DIE_FACES
            .iter()
            .copied()
            .filter(|&die| player.can_move(die))
            .collect();
        let mut rng = self.rngs.dice();
        candidates.choose(&mut *rng).copied()
    }

    /// Final-sprint bias for a human one piece short of winning.
    fn endgame_roll(&self, player: &Player, balance: f64) -> Option<u8> {
        if usize::from(player.finished) != PIECES_PER_PLAYER - 1 {
            return None;
        }
        let last = player
            .pieces
            .iter()
            .find(|pos| !matches!(pos, PiecePos::Done))?;
        let PiecePos::Track(step) = *last else {
            return None;
        };
        if PATH_LENGTH - step > ENDGAME_DISTANCE_MAX {
            return None;
        }

        let favorable_prob = if balance > ENDGAME_HOT_BALANCE {
            ENDGAME_PROB_HOT
        } else if balance < ENDGAME_COLD_BALANCE {
            ENDGAME_PROB_COLD
        } else if balance > 0.0 {
            ENDGAME_PROB_WARM
        } else {
            ENDGAME_PROB_COOL
        };

        let mut rng = self.rngs.dice();
        let group: &[u8] = if rng.gen_bool(favorable_prob) {
            &ENDGAME_FAVORABLE
        } else {
            &ENDGAME_UNFAVORABLE
        };
        Some(group[rng.gen_range(0..group.len())])
    }

    /// Gate probability for the capture stage: a logistic of the influence
    /// signal scaled by the match-era coefficient and decayed by the
    /// consecutive-trigger streak, floored at zero.
    fn capture_gate_prob(&self, influence: f64, turn: u32) -> f64 {
        let base = 1.0 / (1.0 + (influence - CAPTURE_GATE_OFFSET).exp());
        let mut prob = base * era_coefficient(turn);
        prob -= CAPTURE_STREAK_PENALTY * f64::from(self.consecutive_captures);
        prob.max(0.0)
    }

    /// First die value enabling a capture whose impact on the victim stays
    /// under the gentleness ceiling. Consumes the streak counter only on
    /// success.
    fn capture_search(&mut self, ctx: &mut TurnContext<'_>) -> Option<u8> {
        for die in DIE_FACES {
            for piece in 0..PIECES_PER_PLAYER {
                let PiecePos::Track(_) = ctx.players[ctx.current].pieces[piece] else {
                    continue;
                };
                let Some(landing) = ctx.players[ctx.current].target_step(piece, die) else {
                    continue;
                };
                let mover = ctx.players[ctx.current].color;
                let captures = ctx.board.check_capture(ctx.players, mover, landing);
                let Some(first) = captures.first().copied() else {
                    continue;
                };
                let Some(victim_idx) = ctx.players.iter().position(|p| p.id == first.victim)
                else {
                    continue;
                };
                let delta = capture_impact(&mut ctx.players[victim_idx], first.piece);
                if delta < CAPTURE_IMPACT_CEILING {
                    self.consecutive_captures += 1;
                    return Some(die);
                }
            }
        }
        None
    }

    /// Default roll: logistic split between the low-face group {1..=5} and
    /// the high face 6, with a rescue nudge toward 6 when pieces are locked
    /// in base, then an 80/20 split inside the low group favoring {3,4,5}.
    fn sigmoid_roll(
        &self,
        player: &Player,
        differential: f64,
        balance: f64,
        trace: &mut DecisionTrace,
    ) -> u8 {
        let mut influence = differential + balance + SIGMOID_BASE_OFFSET;
        let based = player.pieces_in_base();
        if based >= 3 {
            influence -= RESCUE_NUDGE_THREE_BASED;
        } else if based >= 2 {
            influence -= RESCUE_NUDGE_TWO_BASED;
        }
        trace.influence = influence;

        let low_prob = influence.exp() / (1.0 + influence.exp());
        trace.low_group_prob = low_prob;

        let mut rng = self.rngs.dice();
        if rng.gen_bool(numbers::clamp_unit(low_prob)) {
            trace.stage = Stage::SigmoidLow;
            if rng.gen_bool(LOW_GROUP_HIGH_SUB_PROB) {
                LOW_SUB_HIGH[rng.gen_range(0..LOW_SUB_HIGH.len())]
            } else {
                LOW_SUB_LOW[rng.gen_range(0..LOW_SUB_LOW.len())]
            }
        } else {
            trace.stage = Stage::SigmoidHigh;
            6
        }
    }

    /// Whether playing `die` could capture a protected victim.
    ///
    /// Protection holds for victims trailing the field average, and late in
    /// the match for victims about to close out - unless that victim is a
    /// human whose recent record is already hot, which abandons the whole
    /// scan as the original rules do.
    fn protection_triggered(
        &self,
        ctx: &TurnContext<'_>,
        die: u8,
        rates: &[f64],
        average: f64,
    ) -> bool {
        let player = &ctx.players[ctx.current];
        for piece in 0..PIECES_PER_PLAYER {
            let PiecePos::Track(_) = player.pieces[piece] else {
                continue;
            };
            let Some(landing) = player.target_step(piece, die) else {
                continue;
            };
            let captures = ctx.board.check_capture(ctx.players, player.color, landing);
            let Some(first) = captures.first() else {
                continue;
            };
            let Some(victim_idx) = ctx.players.iter().position(|p| p.id == first.victim) else {
                continue;
            };
            let victim = &ctx.players[victim_idx];
            let victim_diff = rates[victim_idx] - average;

            if victim_diff < PROTECT_WEAK_MARGIN {
                return true;
            }
            if ctx.turn > PROTECT_ENDGAME_TURN
                && (victim.finished >= PROTECT_FINISHED_MIN
                    || (victim_diff > 0.0 && victim_diff < PROTECT_LEAD_CAP))
            {
                if !victim.is_bot && ctx.recent_win_rate > PROTECT_HUMAN_HOT_RATE {
                    return false;
                }
                return true;
            }
        }
        false
    }

    /// First face, in shuffled order, that does not trip the protection
    /// check. `None` when every face does - the caller then keeps the
    /// original value rather than forcing an invalid outcome.
    fn safe_roll(&self, ctx: &TurnContext<'_>, rates: &[f64], average: f64) -> Option<u8> {
        let mut faces = DIE_FACES;
        {
            let mut rng = self.rngs.dice();
            faces.shuffle(&mut *rng);
        }
        faces
            .iter()
            .copied()
            .find(|&face| !self.protection_triggered(ctx, face, rates, average))
    }
}

/// Pacing coefficient over the life of a match: a quiet development era, a
/// ramp into full-intensity fighting, then a wind-down that discourages
/// late-game capture assistance.
#[must_use]
pub fn era_coefficient(turn: u32) -> f64 {
    if turn < ERA_DEVELOPMENT_END {
        ERA_EARLY_COEFF
    } else if turn < ERA_RAMP_UP_END {
        let progress = f64::from(turn - ERA_DEVELOPMENT_END)
            / f64::from(ERA_RAMP_UP_END - ERA_DEVELOPMENT_END);
        ERA_EARLY_COEFF + (ERA_FULL_COEFF - ERA_EARLY_COEFF) * progress
    } else if turn < ERA_FULL_END {
        ERA_FULL_COEFF
    } else if turn < ERA_RAMP_DOWN_END {
        let progress =
            f64::from(turn - ERA_FULL_END) / f64::from(ERA_RAMP_DOWN_END - ERA_FULL_END);
        ERA_FULL_COEFF - (ERA_FULL_COEFF - ERA_LATE_COEFF) * progress
    } else {
        ERA_LATE_COEFF
    }
}
