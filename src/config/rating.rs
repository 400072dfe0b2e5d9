//! Rating system configuration

use crate::error::CampError;
use serde::{Deserialize, Serialize};

/// Constants of the tennis Elo model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// K-factor applied to every set, singles and doubles alike
    pub k_base: f64,
    /// Match-win bonus scale for singles
    pub k_match_singles: f64,
    /// Match-win bonus scale for doubles, split between the partners
    pub k_match_doubles: f64,
    /// Maximum margin-of-victory boost (0.20 = +20% on a shutout)
    pub alpha_mov: f64,
    /// Tiebreak points that count as one game
    pub points_per_game_tiebreak: f64,
    /// Typical number of games in a full set
    pub avg_games_per_set: f64,
    /// Lower clamp of a tiebreak's weight against a full set
    pub tb_min_fraction: f64,
    /// Upper clamp of a tiebreak's weight against a full set
    pub tb_max_fraction: f64,
    /// Rating given to new players for any mode left unset
    pub initial_rating: f64,
    /// Games the winner needs for a shutout set to count as a bagel
    pub bagel_min_games: u32,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            k_base: 100.0,
            k_match_singles: 15.0,
            k_match_doubles: 15.0,
            alpha_mov: 0.20,
            points_per_game_tiebreak: 4.0,
            avg_games_per_set: 10.0,
            tb_min_fraction: 0.30,
            tb_max_fraction: 0.70,
            initial_rating: 1000.0,
            bagel_min_games: 6,
        }
    }
}

impl RatingConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        let positive = [
            ("k_base", self.k_base),
            ("k_match_singles", self.k_match_singles),
            ("k_match_doubles", self.k_match_doubles),
            ("points_per_game_tiebreak", self.points_per_game_tiebreak),
            ("avg_games_per_set", self.avg_games_per_set),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(CampError::ConfigurationError {
                    message: format!("{} must be positive, got {}", name, value),
                }
                .into());
            }
        }

        if !(self.alpha_mov.is_finite() && self.alpha_mov >= 0.0) {
            return Err(CampError::ConfigurationError {
                message: "alpha_mov must be non-negative".to_string(),
            }
            .into());
        }

        if !(self.tb_min_fraction > 0.0
            && self.tb_min_fraction <= self.tb_max_fraction
            && self.tb_max_fraction <= 1.0)
        {
            return Err(CampError::ConfigurationError {
                message: format!(
                    "tiebreak fractions must satisfy 0 < min <= max <= 1, got {}..{}",
                    self.tb_min_fraction, self.tb_max_fraction
                ),
            }
            .into());
        }

        if !self.initial_rating.is_finite() {
            return Err(CampError::ConfigurationError {
                message: "initial_rating must be finite".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Match bonus scale for `mode`
    pub fn k_match(&self, mode: crate::types::Mode) -> f64 {
        match mode {
            crate::types::Mode::Singles => self.k_match_singles,
            crate::types::Mode::Doubles => self.k_match_doubles,
        }
    }
}
