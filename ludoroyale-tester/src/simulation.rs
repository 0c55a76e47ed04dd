//! Batch match simulation against the core engine.

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use ludoroyale_game::{GameSession, Profile, SessionError, Stage};

/// Configuration for one batch of matches sharing a profile.
#[derive(Debug, Clone, Copy)]
pub struct BatchConfig {
    pub seed: u64,
    pub games: usize,
    pub bots: usize,
    pub max_turns: u32,
    pub verbose: bool,
}

/// Aggregated outcome of one batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub seed: u64,
    pub games: usize,
    pub unfinished: usize,
    pub wins_by_seat: Vec<usize>,
    pub human_win_rate: f64,
    pub average_turns: f64,
    pub stage_counts: StageCounts,
    pub anti_capture_corrections: usize,
    pub no_move_turns: usize,
    pub rebuys: usize,
    pub final_balance: i64,
    pub final_recent_win_rate: f64,
}

/// Stage-trigger frequencies across every recorded turn.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StageCounts {
    pub failsafe: usize,
    pub endgame: usize,
    pub capture_assist: usize,
    pub sigmoid_low: usize,
    pub sigmoid_high: usize,
}

impl StageCounts {
    fn bump(&mut self, stage: Stage) {
        match stage {
            Stage::Failsafe => self.failsafe += 1,
            Stage::Endgame => self.endgame += 1,
            Stage::CaptureAssist => self.capture_assist += 1,
            Stage::SigmoidLow => self.sigmoid_low += 1,
            Stage::SigmoidHigh => self.sigmoid_high += 1,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.failsafe + self.endgame + self.capture_assist + self.sigmoid_low + self.sigmoid_high
    }
}

/// Run a batch of matches, threading the profile from game to game so the
/// balance signal evolves the way it does in real play.
pub fn run_batch(config: &BatchConfig) -> Result<BatchReport> {
    let mut profile = Profile::default();
    let mut wins_by_seat = vec![0usize; config.bots + 1];
    let mut unfinished = 0usize;
    let mut total_turns = 0usize;
    let mut stage_counts = StageCounts::default();
    let mut anti_capture = 0usize;
    let mut no_move_turns = 0usize;
    let mut human_wins = 0usize;
    let mut rebuys = 0usize;

    for game in 0..config.games {
        let game_seed = config.seed.wrapping_add(game as u64);
        let mut session = match GameSession::new(game_seed, config.bots, profile.clone()) {
            Ok(session) => session,
            Err(SessionError::InsufficientFunds { .. }) => {
                // Top the account back up so the batch can keep playing.
                profile.balance = Profile::default().balance;
                rebuys += 1;
                GameSession::new(game_seed, config.bots, profile.clone())
                    .with_context(|| format!("creating match {game} for seed {game_seed}"))?
            }
            Err(err) => return Err(err.into()),
        };
        let winner = session.run_to_completion(config.max_turns);

        total_turns += session.records().len();
        for record in session.records() {
            stage_counts.bump(record.stage);
            if record.anti_capture {
                anti_capture += 1;
            }
            if record.no_move {
                no_move_turns += 1;
            }
        }

        match winner {
            Some(id) => {
                if let Some(slot) = wins_by_seat.get_mut(usize::from(id)) {
                    *slot += 1;
                }
                if id == 0 {
                    human_wins += 1;
                }
                if config.verbose {
                    info!(
                        "seed {game_seed}: seat {id} won in {} turns",
                        session.turn()
                    );
                }
            }
            None => unfinished += 1,
        }
        profile = session.into_profile();
    }

    let games_f = to_f64(config.games);
    Ok(BatchReport {
        seed: config.seed,
        games: config.games,
        unfinished,
        wins_by_seat,
        human_win_rate: if config.games == 0 {
            0.0
        } else {
            to_f64(human_wins) / games_f
        },
        average_turns: if config.games == 0 {
            0.0
        } else {
            to_f64(total_turns) / games_f
        },
        stage_counts,
        anti_capture_corrections: anti_capture,
        no_move_turns,
        rebuys,
        final_balance: profile.balance,
        final_recent_win_rate: profile.recent_win_rate(),
    })
}

#[allow(clippy::cast_precision_loss)]
fn to_f64(value: usize) -> f64 {
    value as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_runs_and_accounts_for_every_game() {
        let report = run_batch(&BatchConfig {
            seed: 77,
            games: 4,
            bots: 3,
            max_turns: 5_000,
            verbose: false,
        })
        .unwrap();
        assert_eq!(report.games, 4);
        let decided: usize = report.wins_by_seat.iter().sum();
        assert_eq!(decided + report.unfinished, 4);
        assert!(report.stage_counts.total() > 0);
        assert!((0.0..=1.0).contains(&report.final_recent_win_rate));
    }

    #[test]
    fn identical_batches_agree() {
        let config = BatchConfig {
            seed: 5,
            games: 2,
            bots: 2,
            max_turns: 5_000,
            verbose: false,
        };
        let a = run_batch(&config).unwrap();
        let b = run_batch(&config).unwrap();
        assert_eq!(a.wins_by_seat, b.wins_by_seat);
        assert_eq!(a.stage_counts.total(), b.stage_counts.total());
        assert_eq!(a.final_balance, b.final_balance);
    }
}
