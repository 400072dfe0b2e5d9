//! Statistics and report configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsSettings {
    /// Outcomes shown in a stats card's recent form
    pub recent_form_len: usize,
    /// Matches per player summed for movers when no window is given
    pub default_momentum_last: usize,
    /// Rows shown in leaderboards and mover tables
    pub default_top: usize,
    /// A winner rated this far below the loser is an upset
    pub upset_rating_gap: f64,
    /// A winner with at most this pre-match expectation is an upset
    pub upset_expectation: f64,
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            recent_form_len: 5,
            default_momentum_last: 5,
            default_top: 10,
            upset_rating_gap: 100.0,
            upset_expectation: 0.35,
        }
    }
}
