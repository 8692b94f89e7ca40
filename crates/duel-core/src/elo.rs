//! Elo rating calculation.
//!
//! This module computes updated ratings from the outcome of a single
//! comparison. The K-factor of 32 is the default used throughout the arena.
//! Ratings are neither clamped nor bounded.

/// Default K-factor for rating updates.
pub const K_FACTOR: f64 = 32.0;

/// Rating assigned to catalog entries that do not specify one.
pub const DEFAULT_RATING: f64 = 1500.0;

/// Result of a comparison from the first participant's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// Actual score: 1.0 for a win, 0.5 for a draw, 0.0 for a loss.
    pub fn score(self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Draw => 0.5,
            Outcome::Loss => 0.0,
        }
    }
}

/// Calculate expected score for a player rated `rating` against `opponent_rating`.
pub fn expected_score(rating: f64, opponent_rating: f64) -> f64 {
    1.0 / (1.0 + 10_f64.powf((opponent_rating - rating) / 400.0))
}

/// Calculate both new ratings after a comparison.
///
/// Each side's expected score is computed from its own perspective rather
/// than as the complement of the other, and each rating change is rounded to
/// the nearest integer independently.
///
/// # Arguments
/// * `rating_winner` - Current rating of the first participant
/// * `rating_loser` - Current rating of the second participant
/// * `outcome` - Result for the first participant (always [`Outcome::Win`] for votes)
/// * `k` - K-factor
pub fn update_ratings(rating_winner: f64, rating_loser: f64, outcome: Outcome, k: f64) -> (f64, f64) {
    let expected_winner = expected_score(rating_winner, rating_loser);
    let expected_loser = expected_score(rating_loser, rating_winner);

    let score_winner = outcome.score();
    let score_loser = 1.0 - score_winner;

    let new_winner = rating_winner + (k * (score_winner - expected_winner)).round();
    let new_loser = rating_loser + (k * (score_loser - expected_loser)).round();
    (new_winner, new_loser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_expected_score_equal_ratings() {
        let expected = expected_score(1500.0, 1500.0);
        assert!((expected - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_expected_score_higher_rated() {
        let expected = expected_score(1700.0, 1500.0);
        assert!(expected > 0.7);
        assert!(expected < 0.8);
    }

    #[test]
    fn test_expected_score_lower_rated() {
        let expected = expected_score(1300.0, 1500.0);
        assert!(expected < 0.3);
        assert!(expected > 0.2);
    }

    #[test]
    fn test_update_ratings_win_at_equal_ratings() {
        assert_eq!(update_ratings(1500.0, 1500.0, Outcome::Win, K_FACTOR), (1516.0, 1484.0));
    }

    #[test]
    fn test_update_ratings_draw_at_equal_ratings() {
        assert_eq!(update_ratings(1500.0, 1500.0, Outcome::Draw, K_FACTOR), (1500.0, 1500.0));
    }

    #[test]
    fn test_update_ratings_loss_reverses_direction() {
        assert_eq!(update_ratings(1500.0, 1500.0, Outcome::Loss, K_FACTOR), (1484.0, 1516.0));
    }

    #[test]
    fn test_update_ratings_upset_win() {
        // Lower rated participant wins
        let (winner, loser) = update_ratings(1300.0, 1500.0, Outcome::Win, K_FACTOR);
        assert!(winner > 1320.0); // Bigger gain for upset
        assert!(loser < 1480.0);
    }

    #[test]
    fn test_update_ratings_favourite_win_gains_little() {
        let (winner, loser) = update_ratings(1900.0, 1100.0, Outcome::Win, K_FACTOR);
        assert_eq!(winner, 1900.0);
        assert_eq!(loser, 1100.0);
    }

    #[test]
    fn test_update_ratings_not_clamped() {
        let (_, loser) = update_ratings(10.0, 0.0, Outcome::Win, K_FACTOR);
        assert!(loser < 0.0);
    }

    #[test]
    fn test_update_ratings_changes_are_whole_numbers() {
        let (winner, loser) = update_ratings(1512.0, 1471.0, Outcome::Win, 24.0);
        assert_eq!(winner.fract(), 0.0);
        assert_eq!(loser.fract(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_equal_ratings_are_antisymmetric(r in -3000i32..5000, k in 1u32..100) {
            let r = f64::from(r);
            let (winner, loser) = update_ratings(r, r, Outcome::Win, f64::from(k));
            prop_assert_eq!(winner - r, r - loser);
        }

        #[test]
        fn prop_winner_never_loses_points(a in 0i32..3000, b in 0i32..3000) {
            let (winner, loser) = update_ratings(f64::from(a), f64::from(b), Outcome::Win, K_FACTOR);
            prop_assert!(winner >= f64::from(a));
            prop_assert!(loser <= f64::from(b));
        }
    }
}
