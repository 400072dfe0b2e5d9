//! Tennis Elo rating engine
//!
//! This module provides the win probability model, per-set scoring and the
//! match-level calculator that combines them.

pub mod calculator;
pub mod probability;
pub mod set_scorer;
pub mod tennis_elo;

// Re-export commonly used types
pub use calculator::{MatchOutcome, RatingCalculator, RatingChange, SetRatingDelta};
pub use probability::{expected_score, side_rating};
pub use set_scorer::{score_set, SetScoring};
pub use tennis_elo::TennisEloCalculator;
