use crate::config::ScoringSettings;

use super::types::SideFactors;

/// Break-in test: strictly fewer matches played (before the current one)
/// than the configured period.
pub fn is_breaking_in(prior_matches_played: i64, settings: &ScoringSettings) -> bool {
    prior_matches_played < settings.ranking_factor_break_in_period
}

/// Ranking factors for one side of a match.
///
/// Outside the break-in stretch, performance relative to the league drives
/// the ranking factor and performance relative to the opponent drives the
/// diff factor (the stronger side earns less for the same games won). A zero
/// average on either side of a ratio is a defined case and yields a neutral
/// factor, never an error.
pub fn side_factors(
    settings: &ScoringSettings,
    prior_league_index: i64,
    breaking_in: bool,
    self_average: f64,
    opponent_average: f64,
    league_average: f64,
) -> SideFactors {
    let mut factors = SideFactors::neutral();
    factors.breaking_in = breaking_in;

    if settings.ignore_ranking_factors || prior_league_index == 0 {
        if breaking_in {
            factors.break_in_factor = settings.league_break_in_score_factor;
        }
        return factors;
    }

    if breaking_in {
        factors.break_in_factor = settings.league_break_in_score_factor;
        return factors;
    }

    if league_average != 0.0 {
        factors.ranking_factor =
            self_average / league_average * settings.ranking_factor_constant;
    }
    if self_average != 0.0 && opponent_average != 0.0 {
        factors.diff_ranking_factor =
            settings.ranking_diff_factor_constant / (self_average / opponent_average);
    }
    factors
}

/// Base points: share of games won, scaled by the cosmetic points-per-match
/// constant. A 0-0 match is worth 0 to both sides.
pub fn base_points(games_won: i64, total_games: i64, settings: &ScoringSettings) -> f64 {
    if total_games == 0 {
        return 0.0;
    }
    games_won as f64 / total_games as f64 * settings.points_per_match
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_break_in_comparison_is_strict() {
        let settings = ScoringSettings::default();
        assert!(is_breaking_in(2, &settings));
        assert!(!is_breaking_in(3, &settings));
        assert!(!is_breaking_in(4, &settings));
    }

    #[test]
    fn test_breaking_in_forces_neutral_factors_and_damps_score() {
        let settings = ScoringSettings::default();
        let factors = side_factors(&settings, 5, true, 8.0, 4.0, 6.0);
        assert_eq!(factors.ranking_factor, 1.0);
        assert_eq!(factors.diff_ranking_factor, 1.0);
        assert_eq!(factors.break_in_factor, settings.league_break_in_score_factor);
    }

    #[test]
    fn test_factors_from_averages() {
        let settings = ScoringSettings::default();
        let factors = side_factors(&settings, 5, false, 8.0, 4.0, 6.0);
        assert!((factors.ranking_factor - 8.0 / 6.0).abs() < 1e-9);
        assert!((factors.diff_ranking_factor - 0.5).abs() < 1e-9);
        assert_eq!(factors.break_in_factor, 1.0);
    }

    #[test]
    fn test_zero_averages_default_to_neutral() {
        let settings = ScoringSettings::default();
        let factors = side_factors(&settings, 5, false, 0.0, 4.0, 6.0);
        assert_eq!(factors.diff_ranking_factor, 1.0);
        let factors = side_factors(&settings, 5, false, 8.0, 0.0, 6.0);
        assert_eq!(factors.diff_ranking_factor, 1.0);
        let factors = side_factors(&settings, 5, false, 8.0, 4.0, 0.0);
        assert_eq!(factors.ranking_factor, 1.0);
    }

    #[test]
    fn test_ignore_ranking_factors_still_damps_break_in() {
        let mut settings = ScoringSettings::default();
        settings.ignore_ranking_factors = true;
        let factors = side_factors(&settings, 5, false, 8.0, 4.0, 6.0);
        assert_eq!(factors.ranking_factor, 1.0);
        assert_eq!(factors.diff_ranking_factor, 1.0);
        assert_eq!(factors.break_in_factor, 1.0);

        let factors = side_factors(&settings, 5, true, 8.0, 4.0, 6.0);
        assert_eq!(factors.break_in_factor, settings.league_break_in_score_factor);
    }

    #[test]
    fn test_zero_total_games_is_worth_zero() {
        let settings = ScoringSettings::default();
        assert_eq!(base_points(0, 0, &settings), 0.0);
        assert!((base_points(6, 9, &settings) - 200.0 / 3.0).abs() < 1e-9);
    }
}
