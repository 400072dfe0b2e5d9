//! Player entries: ratings, peaks and running counters per mode

use crate::types::{Mode, PlayerId, SetScore, Side};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Running totals for one mode
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeCounters {
    pub matches_played: u32,
    pub matches_won: u32,
    pub sets_played: u32,
    pub sets_won: u32,
    /// Level sets are played but neither won nor lost
    pub sets_lost: u32,
    pub tiebreaks_played: u32,
    pub tiebreaks_won: u32,
    pub bagels_given: u32,
    pub bagels_taken: u32,
    pub current_win_streak: u32,
    pub best_win_streak: u32,
}

impl ModeCounters {
    /// Count one set played on `side`
    pub fn record_set(&mut self, set: &SetScore, side: Side, bagel_min_games: u32) {
        let won = set.winner() == Some(side);
        let lost = set.winner() == Some(side.opposite());

        self.sets_played += 1;
        if won {
            self.sets_won += 1;
        } else if lost {
            self.sets_lost += 1;
        }
        if set.is_tiebreak() {
            self.tiebreaks_played += 1;
            if won {
                self.tiebreaks_won += 1;
            }
        }
        if set.is_bagel(bagel_min_games) {
            if won {
                self.bagels_given += 1;
            } else if lost {
                self.bagels_taken += 1;
            }
        }
    }

    /// Count a finished match and roll the win streak
    pub fn record_match(&mut self, won: bool) {
        self.matches_played += 1;
        if won {
            self.matches_won += 1;
            self.current_win_streak += 1;
            self.best_win_streak = self.best_win_streak.max(self.current_win_streak);
        } else {
            self.current_win_streak = 0;
        }
    }

    pub fn matches_lost(&self) -> u32 {
        self.matches_played - self.matches_won
    }
}

/// Rating state of a player in one mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeProfile {
    pub rating: f64,
    /// Highest rating ever held; the current rating may have dropped since
    pub peak_rating: f64,
    pub peak_date: NaiveDate,
    #[serde(default)]
    pub counters: ModeCounters,
}

impl ModeProfile {
    pub fn new(rating: f64, date: NaiveDate) -> Self {
        Self {
            rating,
            peak_rating: rating,
            peak_date: date,
            counters: ModeCounters::default(),
        }
    }

    /// Move the rating by `delta`, returning true when it set a new peak
    pub fn apply_delta(&mut self, delta: f64, date: NaiveDate) -> bool {
        self.rating += delta;
        if self.rating > self.peak_rating {
            self.peak_rating = self.rating;
            self.peak_date = date;
            true
        } else {
            false
        }
    }
}

/// A registered player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub name: PlayerId,
    pub singles: ModeProfile,
    pub doubles: ModeProfile,
    pub last_match_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl PlayerEntry {
    pub fn new(name: PlayerId, singles: f64, doubles: f64, created_at: DateTime<Utc>) -> Self {
        let date = created_at.date_naive();
        Self {
            name,
            singles: ModeProfile::new(singles, date),
            doubles: ModeProfile::new(doubles, date),
            last_match_date: None,
            created_at,
        }
    }

    pub fn profile(&self, mode: Mode) -> &ModeProfile {
        match mode {
            Mode::Singles => &self.singles,
            Mode::Doubles => &self.doubles,
        }
    }

    pub fn profile_mut(&mut self, mode: Mode) -> &mut ModeProfile {
        match mode {
            Mode::Singles => &mut self.singles,
            Mode::Doubles => &mut self.doubles,
        }
    }

    pub fn rating(&self, mode: Mode) -> f64 {
        self.profile(mode).rating
    }

    pub fn counters(&self, mode: Mode) -> &ModeCounters {
        &self.profile(mode).counters
    }
}
