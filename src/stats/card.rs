//! Result types produced by the statistics aggregator

use crate::stats::query::Window;
use crate::types::{MatchId, Mode, Outcome, PlayerId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A won/lost tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLoss {
    pub won: u32,
    pub lost: u32,
}

impl WinLoss {
    pub fn record(&mut self, won: bool) {
        if won {
            self.won += 1;
        } else {
            self.lost += 1;
        }
    }

    pub fn total(&self) -> u32 {
        self.won + self.lost
    }

    /// Share won in percent, `None` before anything was played
    pub fn win_pct(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(100.0 * self.won as f64 / total as f64),
        }
    }
}

impl std::fmt::Display for WinLoss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.won, self.lost)
    }
}

/// Rating movement over a window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Momentum {
    /// Pre-match rating of the window's first match
    pub start_rating: f64,
    /// Post-match rating of the window's last match
    pub end_rating: f64,
    /// Sum of the window's deltas
    pub delta: f64,
}

/// One match line as seen by a single player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentMatch {
    pub match_id: MatchId,
    pub date: NaiveDate,
    pub outcome: Outcome,
    pub partners: Vec<PlayerId>,
    pub opponents: Vec<PlayerId>,
    /// Set scores from the player's side, e.g. `6-3, 4-6, 10-8[tiebreak]`
    pub score: String,
    pub delta: f64,
}

impl RecentMatch {
    /// `Bob` in singles, `Cat & Dan` in doubles
    pub fn opponent_label(&self) -> String {
        self.opponents.join(" & ")
    }
}

/// Record against one opponent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHead {
    pub opponent: PlayerId,
    pub matches: WinLoss,
    pub sets: WinLoss,
    pub last_meeting: Option<RecentMatch>,
}

/// Everything the `stats` command shows for one player and mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsCard {
    pub player: PlayerId,
    pub mode: Mode,
    pub window: Window,
    pub current_rating: f64,
    pub peak_rating: f64,
    pub peak_date: NaiveDate,
    pub matches: WinLoss,
    pub sets: WinLoss,
    pub tiebreaks: WinLoss,
    pub bagels_given: u32,
    pub bagels_taken: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// `None` when the window holds no matches
    pub momentum: Option<Momentum>,
    /// Oldest first
    pub recent_form: Vec<Outcome>,
    /// Newest first
    pub recent_matches: Vec<RecentMatch>,
    pub head_to_head: Option<HeadToHead>,
}

impl StatsCard {
    /// Recent form as a token string like `WWLW`
    pub fn form_string(&self) -> String {
        self.recent_form.iter().map(|o| o.token()).collect()
    }
}

/// One row of a rating leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub player: PlayerId,
    pub rating: f64,
    pub peak_rating: f64,
    pub matches: WinLoss,
}

/// Summed rating change of one player over a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    pub player: PlayerId,
    pub matches: usize,
    pub delta: f64,
}

/// A player's live win streak
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRow {
    pub player: PlayerId,
    pub current: u32,
    pub best: u32,
}
