//! Centralized balance and tuning constants for Ludo Royale game logic.
//!
//! These values define the deterministic math for the dice-control pipeline
//! and the board rules. Keeping them together ensures that gameplay can only
//! be adjusted via code changes reviewed in version control.

// Path geometry ------------------------------------------------------------
pub(crate) const PATH_LENGTH: u8 = 56;
pub(crate) const RING_LENGTH: u8 = 52;
pub(crate) const RING_STEP_MAX: u8 = 50;
pub(crate) const PIECES_PER_PLAYER: usize = 4;
pub(crate) const TOTAL_STEPS: u32 = (PATH_LENGTH as u32) * (PIECES_PER_PLAYER as u32);
pub(crate) const RING_SAFE_SQUARES: [u8; 8] = [0, 13, 26, 39, 8, 21, 34, 47];
pub(crate) const ENTRY_DIE: u8 = 6;
pub(crate) const DIE_FACES: [u8; 6] = [1, 2, 3, 4, 5, 6];

// Win-rate estimator -------------------------------------------------------
pub(crate) const WEIGHT_BASE: f64 = 5.0;
pub(crate) const WEIGHT_TRACK: f64 = 15.0;
pub(crate) const WEIGHT_DONE: f64 = 25.0;
pub(crate) const SCORE_SCALE: f64 = 100.0;
pub(crate) const SCORE_BLEND: f64 = 0.5;

// Failsafe (stuck protection) ----------------------------------------------
pub(crate) const FAILSAFE_THRESHOLD_MIN: u32 = 10;
pub(crate) const FAILSAFE_THRESHOLD_MAX: u32 = 20;

// Endgame intervention -----------------------------------------------------
pub(crate) const ENDGAME_DISTANCE_MAX: u8 = 14;
pub(crate) const ENDGAME_FAVORABLE: [u8; 3] = [3, 5, 6];
pub(crate) const ENDGAME_UNFAVORABLE: [u8; 3] = [1, 2, 4];
pub(crate) const ENDGAME_HOT_BALANCE: f64 = 0.1;
pub(crate) const ENDGAME_COLD_BALANCE: f64 = -0.08;
pub(crate) const ENDGAME_PROB_HOT: f64 = 1.0;
pub(crate) const ENDGAME_PROB_WARM: f64 = 0.8;
pub(crate) const ENDGAME_PROB_COOL: f64 = 0.2;
pub(crate) const ENDGAME_PROB_COLD: f64 = 0.0;

// Capture intervention -----------------------------------------------------
pub(crate) const CAPTURE_GATE_OFFSET: f64 = 0.4;
pub(crate) const CAPTURE_IMPACT_CEILING: f64 = 0.3;
pub(crate) const CAPTURE_STREAK_PENALTY: f64 = 0.10;
pub(crate) const ERA_DEVELOPMENT_END: u32 = 20;
pub(crate) const ERA_RAMP_UP_END: u32 = 40;
pub(crate) const ERA_FULL_END: u32 = 80;
pub(crate) const ERA_RAMP_DOWN_END: u32 = 120;
pub(crate) const ERA_EARLY_COEFF: f64 = 0.3;
pub(crate) const ERA_FULL_COEFF: f64 = 1.0;
pub(crate) const ERA_LATE_COEFF: f64 = 0.2;

// Default sigmoid roll -----------------------------------------------------
pub(crate) const SIGMOID_BASE_OFFSET: f64 = 1.6;
pub(crate) const RESCUE_NUDGE_THREE_BASED: f64 = 0.5;
pub(crate) const RESCUE_NUDGE_TWO_BASED: f64 = 0.8;
pub(crate) const LOW_GROUP_HIGH_SUB_PROB: f64 = 0.8;
pub(crate) const LOW_SUB_HIGH: [u8; 3] = [3, 4, 5];
pub(crate) const LOW_SUB_LOW: [u8; 2] = [1, 2];

// Anti-capture protection --------------------------------------------------
pub(crate) const PROTECT_WEAK_MARGIN: f64 = -0.05;
pub(crate) const PROTECT_ENDGAME_TURN: u32 = 60;
pub(crate) const PROTECT_LEAD_CAP: f64 = 0.4;
pub(crate) const PROTECT_FINISHED_MIN: u8 = 2;
pub(crate) const PROTECT_HUMAN_HOT_RATE: f64 = 0.6;

// Balance signal -----------------------------------------------------------
pub(crate) const BALANCE_MIDPOINT: f64 = 0.5;

// Economy ------------------------------------------------------------------
pub(crate) const ENTRY_FEE: i64 = 100;
pub(crate) const STARTING_BALANCE: i64 = 500;
pub(crate) const HISTORY_WINDOW: usize = 100;

// Bot move scoring ---------------------------------------------------------
pub(crate) const MOVE_SCORE_CAPTURE: f64 = 100.0;
pub(crate) const MOVE_SCORE_ENTER: f64 = 50.0;
pub(crate) const MOVE_SCORE_FINISH: f64 = 200.0;
pub(crate) const MOVE_SCORE_SAFE: f64 = 20.0;
pub(crate) const MOVE_SCORE_JITTER: f64 = 10.0;
