use clap::{Args, Parser, Subcommand};

use crate::config::ScoringSettings;

#[derive(Parser, Debug)]
#[command(author, version, about = "recreational tennis league scoring and rankings")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Compute the rankings from a results file and print the standings
    Rank(RankArgs),
    /// List the matches played
    Games(GamesArgs),
    /// Print a seeded sample results file to stdout
    Sample(SampleArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RankArgs {
    /// Results file to import (see the importer's record formats)
    pub csv: String,

    /// Rank doubles teams instead of singles players
    #[arg(long)]
    pub doubles: bool,

    /// Print results as of this league match index (-1 for the latest)
    #[arg(short = 'm', long = "match-index", default_value_t = -1, allow_hyphen_values = true)]
    pub match_index: i64,

    /// Print information only for the listed players (repeatable)
    #[arg(short = 'p', long = "player-filter")]
    pub player_filter: Vec<String>,

    /// Emit the standings as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub scoring: ScoringArgs,
}

#[derive(Args, Debug, Clone)]
pub struct GamesArgs {
    /// Results file to import
    pub csv: String,

    /// List doubles matches instead of singles
    #[arg(long)]
    pub doubles: bool,

    /// List matches up to this league match index (-1 for all)
    #[arg(short = 'm', long = "match-index", default_value_t = -1, allow_hyphen_values = true)]
    pub match_index: i64,

    /// List only matches involving the given players (repeatable)
    #[arg(short = 'p', long = "player-filter")]
    pub player_filter: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SampleArgs {
    /// Seed for the generated data; the same seed yields the same file
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

/// Scoring model options, mirroring [`ScoringSettings`].
#[derive(Args, Debug, Clone)]
pub struct ScoringArgs {
    /// Points earned per match; purely cosmetic scaling
    #[arg(long = "ppm", default_value_t = 100.0)]
    pub points_per_match: f64,

    /// Ranking factor constant; higher values favor higher-ranked players
    #[arg(long = "rfc", default_value_t = 1.0)]
    pub ranking_factor_constant: f64,

    /// Ranking difference factor constant; higher values favor underdogs
    #[arg(long = "rdfc", default_value_t = 1.0)]
    pub ranking_diff_factor_constant: f64,

    /// Matches to play before ranking factors kick in
    #[arg(long = "rfbp", default_value_t = 3)]
    pub ranking_factor_break_in_period: i64,

    /// Score multiplier during the break-in period; must not exceed 0.5
    #[arg(long = "lbsf", default_value_t = 0.1)]
    pub league_break_in_score_factor: f64,

    /// Force all ranking factors to 1, no matter the other options
    #[arg(short = 'i', long)]
    pub ignore_ranking_factors: bool,
}

impl ScoringArgs {
    pub fn to_settings(&self) -> ScoringSettings {
        ScoringSettings {
            points_per_match: self.points_per_match,
            ranking_factor_constant: self.ranking_factor_constant,
            ranking_diff_factor_constant: self.ranking_diff_factor_constant,
            ranking_factor_break_in_period: self.ranking_factor_break_in_period,
            league_break_in_score_factor: self.league_break_in_score_factor,
            ignore_ranking_factors: self.ignore_ranking_factors,
        }
    }
}
