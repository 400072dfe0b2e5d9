//! Tennis Elo rating engine
//!
//! Every set moves ratings by `K_eff * (S - E)`, where E always comes from the
//! pre-match ratings (side averages in doubles). The winner of the match then
//! collects a one-time bonus scaled by how unlikely the win was.

use crate::config::RatingConfig;
use crate::error::CampError;
use crate::rating::calculator::{MatchOutcome, RatingCalculator, RatingChange, SetRatingDelta};
use crate::rating::probability::{expected_score, side_rating};
use crate::rating::set_scorer::score_set;
use crate::types::{MatchRequest, RatingSnapshot, Side};
use tracing::debug;

/// Set-based Elo calculator with margin-of-victory and tiebreak weighting
#[derive(Debug, Clone, Default)]
pub struct TennisEloCalculator {
    config: RatingConfig,
}

impl TennisEloCalculator {
    /// Create a new calculator
    pub fn new(config: RatingConfig) -> crate::error::Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    pub fn rating_config(&self) -> &RatingConfig {
        &self.config
    }

    fn side_ratings(
        request: &MatchRequest,
        side: Side,
        ratings: &RatingSnapshot,
    ) -> crate::error::Result<Vec<f64>> {
        request
            .side(side)
            .iter()
            .map(|name| {
                let rating = ratings.get(name).copied().ok_or_else(|| {
                    CampError::UnknownPlayer { name: name.clone() }
                })?;
                if !rating.is_finite() {
                    return Err(CampError::InvalidRating { value: rating }.into());
                }
                Ok(rating)
            })
            .collect()
    }
}

impl RatingCalculator for TennisEloCalculator {
    fn calculate_match(
        &self,
        request: &MatchRequest,
        ratings: &RatingSnapshot,
    ) -> crate::error::Result<MatchOutcome> {
        request.validate()?;

        let ratings_a = Self::side_ratings(request, Side::A, ratings)?;
        let ratings_b = Self::side_ratings(request, Side::B, ratings)?;
        let expected_a = expected_score(side_rating(&ratings_a), side_rating(&ratings_b));

        let mut sets = Vec::with_capacity(request.sets.len());
        let mut sets_won_a = 0;
        let mut sets_won_b = 0;
        let mut total_a = 0.0;

        for set in &request.sets {
            let scoring = score_set(set, &self.config)?;
            let delta_a = scoring.k_eff * (scoring.actual - expected_a);
            total_a += delta_a;

            match set.winner() {
                Some(Side::A) => sets_won_a += 1,
                Some(Side::B) => sets_won_b += 1,
                None => {}
            }

            sets.push(SetRatingDelta {
                set: *set,
                scoring,
                expected: expected_a,
                delta_a,
            });
        }

        let winner = match sets_won_a.cmp(&sets_won_b) {
            std::cmp::Ordering::Greater => Side::A,
            std::cmp::Ordering::Less => Side::B,
            std::cmp::Ordering::Equal => {
                return Err(CampError::AmbiguousMatchResult {
                    sets_won: sets_won_a,
                }
                .into())
            }
        };

        // Surprise of the win: 1 - E(winner)
        let surprise = match winner {
            Side::A => 1.0 - expected_a,
            Side::B => expected_a,
        };
        let match_bonus = self.config.k_match(request.mode) * surprise;
        let bonus_share = match_bonus / request.mode.side_size() as f64;
        let bonus_a = match winner {
            Side::A => bonus_share,
            Side::B => -bonus_share,
        };

        let delta_a = total_a + bonus_a;
        let rating_changes = [(Side::A, &ratings_a, delta_a), (Side::B, &ratings_b, -delta_a)]
            .into_iter()
            .flat_map(|(side, side_ratings, delta)| {
                request
                    .side(side)
                    .iter()
                    .zip(side_ratings.iter())
                    .map(move |(name, &old_rating)| RatingChange {
                        player_id: name.clone(),
                        side,
                        old_rating,
                        new_rating: old_rating + delta,
                        delta,
                    })
            })
            .collect();

        let decided_by_tiebreak = request
            .sets
            .last()
            .map(|set| set.is_tiebreak())
            .unwrap_or(false);
        let comeback_win = request
            .sets
            .first()
            .and_then(|set| set.winner())
            .map(|first| first == winner.opposite())
            .unwrap_or(false);

        debug!(
            "Calculated {} match: sets {}-{}, E_A={:.3}, set delta {:+.2}, bonus {:.2}",
            request.mode, sets_won_a, sets_won_b, expected_a, total_a, match_bonus
        );

        Ok(MatchOutcome {
            winner,
            sets_won_a,
            sets_won_b,
            expected_a,
            sets,
            match_bonus,
            rating_changes,
            decided_by_tiebreak,
            comeback_win,
        })
    }

    fn initial_rating(&self) -> f64 {
        self.config.initial_rating
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }
}
