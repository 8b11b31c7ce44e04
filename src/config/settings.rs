/// Scoring constants for a ranking pass.
///
/// Prefer passing this explicitly (dependency injection) over any global:
/// the engine, the importer and the presenters each receive the piece they
/// need.
#[derive(Debug, Clone)]
pub struct ScoringSettings {
    /// Scaling constant for earned points. Purely cosmetic: it does not
    /// affect relative rankings.
    pub points_per_match: f64,
    /// Higher values favor higher-ranked players.
    pub ranking_factor_constant: f64,
    /// Higher values favor underdogs.
    pub ranking_diff_factor_constant: f64,
    /// Matches an entity must have played before ranking factors apply.
    pub ranking_factor_break_in_period: i64,
    /// Multiplier on points earned during the break-in stretch. Should stay
    /// small (the CLI refuses values above 0.5).
    pub league_break_in_score_factor: f64,
    /// Force all ranking factors to 1 regardless of history.
    pub ignore_ranking_factors: bool,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            points_per_match: 100.0,
            ranking_factor_constant: 1.0,
            ranking_diff_factor_constant: 1.0,
            ranking_factor_break_in_period: 3,
            league_break_in_score_factor: 0.1,
            ignore_ranking_factors: false,
        }
    }
}

pub struct AppConfig {
    pub scoring: ScoringSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            scoring: ScoringSettings::default(),
        }
    }
}
