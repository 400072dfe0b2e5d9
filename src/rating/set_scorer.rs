//! Per-set scoring: actual score, margin of victory and tiebreak weight

use crate::config::RatingConfig;
use crate::error::CampError;
use crate::types::{SetKind, SetScore};
use serde::{Deserialize, Serialize};

/// Everything the engine needs to turn one set into a rating change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetScoring {
    /// Fraction of the set won by side A
    pub actual: f64,
    /// Margin-of-victory multiplier
    pub mov: f64,
    /// Weight against a full set (1.0 for normal sets)
    pub weight: f64,
    /// K-factor after MOV and weight scaling
    pub k_eff: f64,
}

/// Game counts of a set, with tiebreak points converted to games
pub fn equivalent_games(set: &SetScore, config: &RatingConfig) -> (f64, f64) {
    match set.kind {
        SetKind::Normal => (set.games_a as f64, set.games_b as f64),
        SetKind::Tiebreak => (
            set.games_a as f64 / config.points_per_game_tiebreak,
            set.games_b as f64 / config.points_per_game_tiebreak,
        ),
    }
}

/// Fraction of the set won by side A
pub fn actual_score(set: &SetScore, config: &RatingConfig) -> crate::error::Result<f64> {
    if set.total() == 0 {
        return Err(CampError::InvalidSetScore {
            reason: format!("set {} has no games played", set),
        }
        .into());
    }
    let (a, b) = equivalent_games(set, config);
    Ok(a / (a + b))
}

/// `1 + alpha * |2S - 1|`: 1.0 for an even split, `1 + alpha` for a shutout
pub fn mov_multiplier(actual: f64, alpha_mov: f64) -> f64 {
    let s = actual.clamp(0.0, 1.0);
    1.0 + alpha_mov * (2.0 * s - 1.0).abs()
}

/// How much of a full set a set counts for
///
/// Tiebreaks are weighted by their length in equivalent games, clamped to
/// `[tb_min_fraction, tb_max_fraction]`.
pub fn set_weight(set: &SetScore, config: &RatingConfig) -> f64 {
    match set.kind {
        SetKind::Normal => 1.0,
        SetKind::Tiebreak => {
            let (a, b) = equivalent_games(set, config);
            ((a + b) / config.avg_games_per_set)
                .clamp(config.tb_min_fraction, config.tb_max_fraction)
        }
    }
}

/// Score a set under `config`
pub fn score_set(set: &SetScore, config: &RatingConfig) -> crate::error::Result<SetScoring> {
    let actual = actual_score(set, config)?;
    let mov = mov_multiplier(actual, config.alpha_mov);
    let weight = set_weight(set, config);

    Ok(SetScoring {
        actual,
        mov,
        weight,
        k_eff: config.k_base * mov * weight,
    })
}
