//! Elo win probability

use skillratings::elo::EloRating;

/// Probability that a player rated `rating_a` beats one rated `rating_b`
///
/// `1 / (1 + 10^((rating_b - rating_a) / 400))`, always in (0, 1) for
/// finite inputs.
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    let (expected_a, _) = skillratings::elo::expected_score(
        &EloRating { rating: rating_a },
        &EloRating { rating: rating_b },
    );
    expected_a
}

/// Rating used for a side: the mean of its players' ratings
pub fn side_rating(ratings: &[f64]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    ratings.iter().sum::<f64>() / ratings.len() as f64
}
