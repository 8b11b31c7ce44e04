/// Multipliers applied to one side's base points for one match.
#[derive(Debug, Clone, Copy)]
pub struct SideFactors {
    pub ranking_factor: f64,
    pub diff_ranking_factor: f64,
    pub break_in_factor: f64,
    pub breaking_in: bool,
}

impl SideFactors {
    /// Neutral factors outside the break-in stretch.
    pub fn neutral() -> Self {
        Self {
            ranking_factor: 1.0,
            diff_ranking_factor: 1.0,
            break_in_factor: 1.0,
            breaking_in: false,
        }
    }
}

/// The points computed for one side of one match.
#[derive(Debug, Clone, Copy)]
pub struct SidePoints {
    pub games_won: i64,
    pub base_points: f64,
    pub level_factor: f64,
    pub earned_points: f64,
}
