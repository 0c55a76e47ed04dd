//! Player account: balance, match history and the smoothed win-rate signal.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::constants::{HISTORY_WINDOW, STARTING_BALANCE};
use crate::numbers;

/// Persistent account for the human seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default = "default_balance")]
    pub balance: i64,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub total_games: u32,
    /// Results of the most recent matches, oldest first, capped at 100.
    #[serde(default)]
    pub history: VecDeque<bool>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            balance: STARTING_BALANCE,
            wins: 0,
            total_games: 0,
            history: VecDeque::new(),
        }
    }
}

impl Profile {
    /// Parse a profile from JSON, repairing inconsistent counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a profile.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut profile: Self = serde_json::from_str(json)?;
        profile.repair();
        Ok(profile)
    }

    /// Serialize the profile to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    fn repair(&mut self) {
        if self.total_games < self.wins {
            self.total_games = self.wins;
        }
        while self.history.len() > HISTORY_WINDOW {
            self.history.pop_front();
        }
    }

    /// Lifetime win rate; 0.0 before the first recorded match.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.total_games == 0 {
            return 0.0;
        }
        f64::from(self.wins) / f64::from(self.total_games)
    }

    /// Laplace-smoothed win rate over the recent window: `(wins+1)/(games+2)`.
    /// Seeded with one win and one loss so early sessions trend toward 0.5
    /// instead of swinging to the extremes.
    #[must_use]
    pub fn recent_win_rate(&self) -> f64 {
        let recent_wins = self.history.iter().filter(|won| **won).count();
        (numbers::usize_to_f64(recent_wins) + 1.0)
            / (numbers::usize_to_f64(self.history.len()) + 2.0)
    }

    /// Record a finished match in the counters and the rolling window.
    pub fn record_match(&mut self, won: bool) {
        self.history.push_back(won);
        while self.history.len() > HISTORY_WINDOW {
            self.history.pop_front();
        }
        self.total_games += 1;
        if won {
            self.wins += 1;
        }
    }
}

fn default_balance() -> i64 {
    STARTING_BALANCE
}
