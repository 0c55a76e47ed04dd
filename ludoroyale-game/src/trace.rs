//! Immutable per-decision diagnostic snapshot.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Which pipeline stage produced the die value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Stuck protection fired at the no-move threshold.
    Failsafe,
    /// Final-piece drama control for the human seat.
    Endgame,
    /// Deliberately offered capture.
    CaptureAssist,
    /// Default roll resolved inside the low-face group {1..=5}.
    SigmoidLow,
    /// Default roll resolved to the high face 6.
    SigmoidHigh,
}

impl Stage {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Failsafe => "failsafe (stuck)",
            Self::Endgame => "endgame intervention",
            Self::CaptureAssist => "capture intervention",
            Self::SigmoidLow => "sigmoid low group",
            Self::SigmoidHigh => "sigmoid high face",
        }
    }
}

/// Snapshot of every signal used to reach the last dice decision.
///
/// Rebuilt in full on each [`crate::DiceController::decide`] call; earlier
/// snapshots are discarded, never appended to. Handed out read-only for
/// observability and never fed back into later decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTrace {
    pub player: u8,
    pub is_human: bool,
    pub turn: u32,
    pub stage: Stage,
    /// Estimated win rates for every seat, in seating order.
    pub rates: SmallVec<[f64; 4]>,
    pub rate: f64,
    pub average: f64,
    pub differential: f64,
    pub balance: f64,
    pub influence: f64,
    pub low_group_prob: f64,
    pub capture_prob: f64,
    pub capture_gate_skipped: bool,
    pub anti_capture_applied: bool,
    pub value: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_labels_are_distinct() {
        let stages = [
            Stage::Failsafe,
            Stage::Endgame,
            Stage::CaptureAssist,
            Stage::SigmoidLow,
            Stage::SigmoidHigh,
        ];
        for (i, a) in stages.iter().enumerate() {
            for b in &stages[i + 1..] {
                assert_ne!(a.label(), b.label());
            }
        }
    }

    #[test]
    fn trace_serializes_round_trip() {
        let trace = DecisionTrace {
            player: 0,
            is_human: true,
            turn: 12,
            stage: Stage::SigmoidLow,
            rates: SmallVec::from_slice(&[0.2, 0.3]),
            rate: 0.2,
            average: 0.25,
            differential: -0.05,
            balance: 0.1,
            influence: 1.65,
            low_group_prob: 0.84,
            capture_prob: 0.12,
            capture_gate_skipped: true,
            anti_capture_applied: false,
            value: 4,
        };
        let json = serde_json::to_string(&trace).unwrap();
        let back: DecisionTrace = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trace);
    }
}
