//! Rating calculator trait and match outcome types
//!
//! This module defines the interface for turning a played match into rating
//! changes, and the outcome structure every calculator returns.

use crate::rating::set_scorer::SetScoring;
use crate::types::{
    MatchRecord, MatchRequest, PlayerId, RatingSnapshot, SetScore, Side,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rating change information for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub player_id: PlayerId,
    pub side: Side,
    pub old_rating: f64,
    pub new_rating: f64,
    pub delta: f64,
}

/// Contribution of a single set to the match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRatingDelta {
    pub set: SetScore,
    pub scoring: SetScoring,
    /// Expected score of side A from the pre-match ratings
    pub expected: f64,
    /// Change credited to each player of side A (side B gets the negation)
    pub delta_a: f64,
}

/// Result of a match calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub winner: Side,
    pub sets_won_a: u32,
    pub sets_won_b: u32,
    /// Pre-match probability that side A wins
    pub expected_a: f64,
    pub sets: Vec<SetRatingDelta>,
    /// Bonus credited to the winning side as a whole
    pub match_bonus: f64,
    pub rating_changes: Vec<RatingChange>,
    pub decided_by_tiebreak: bool,
    pub comeback_win: bool,
}

impl MatchOutcome {
    /// Change for `player`, if they took part
    pub fn change_for(&self, player: &str) -> Option<&RatingChange> {
        self.rating_changes
            .iter()
            .find(|change| change.player_id == player)
    }

    /// Sum of all players' deltas; zero up to rounding for a closed match
    pub fn net_delta(&self) -> f64 {
        self.rating_changes.iter().map(|change| change.delta).sum()
    }

    /// Freeze the outcome into a log entry
    pub fn to_record(&self, request: &MatchRequest, timestamp: DateTime<Utc>) -> MatchRecord {
        let snapshot = |value: fn(&RatingChange) -> f64| -> RatingSnapshot {
            self.rating_changes
                .iter()
                .map(|change| (change.player_id.clone(), value(change)))
                .collect()
        };

        MatchRecord {
            id: crate::utils::generate_match_id(),
            timestamp,
            date: timestamp.date_naive(),
            mode: request.mode,
            side_a: request.side_a.clone(),
            side_b: request.side_b.clone(),
            sets: request.sets.clone(),
            winner: self.winner,
            sets_won_a: self.sets_won_a,
            sets_won_b: self.sets_won_b,
            decided_by_tiebreak: self.decided_by_tiebreak,
            comeback_win: self.comeback_win,
            match_bonus: self.match_bonus,
            ratings_before: snapshot(|change| change.old_rating),
            ratings_after: snapshot(|change| change.new_rating),
            rating_change: snapshot(|change| change.delta),
        }
    }
}

/// Trait for calculating rating changes after matches
pub trait RatingCalculator {
    /// Calculate rating changes for a played match
    ///
    /// # Arguments
    /// * `request` - Sides, mode and set scores of the match
    /// * `ratings` - Pre-match rating of every participant in the match's mode
    ///
    /// # Returns
    /// The outcome with per-player changes, or a rejected-input error
    fn calculate_match(
        &self,
        request: &MatchRequest,
        ratings: &RatingSnapshot,
    ) -> crate::error::Result<MatchOutcome>;

    /// Get the initial rating for new players
    fn initial_rating(&self) -> f64;

    /// Get current configuration as JSON
    fn config(&self) -> serde_json::Value;
}
