use colored::Colorize;
use serde::Serialize;

use crate::domain::{League, MatchRecord, PlayType};
use crate::errors::Result;
use crate::stats::{LeagueIndex, PlayerIndex, SeriesName};

/// One entity's line in the standings.
#[derive(Debug, Clone, Serialize)]
pub struct StandingRow {
    pub rank: i64,
    pub name: String,
    pub play_level: f64,
    pub points_per_match: f64,
    pub points: f64,
    pub matches_played: i64,
    pub games_won: i64,
    pub games_lost: i64,
    pub games_won_percent: f64,
}

/// League aggregate line printed under the standings.
#[derive(Debug, Clone, Serialize)]
pub struct LeagueSummary {
    pub points: f64,
    pub points_per_match: f64,
    pub matches_played: i64,
    pub games_won: i64,
    pub games_lost: i64,
    pub games_won_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StandingsReport {
    pub title: String,
    pub play_type: PlayType,
    pub as_of_match: i64,
    pub rows: Vec<StandingRow>,
    pub league: LeagueSummary,
}

/// Builds and prints the standings and match-list views over a computed
/// league. Read-only: the engine must have run first.
pub struct StatsReporter<'a> {
    league: &'a League,
    player_filter: Vec<String>,
}

impl<'a> StatsReporter<'a> {
    pub fn new(league: &'a League, player_filter: Vec<String>) -> Self {
        Self {
            league,
            player_filter: player_filter
                .into_iter()
                .map(|name| name.to_lowercase())
                .collect(),
        }
    }

    /// Standings per ranked entity (players for singles, teams for doubles)
    /// as of a league index; `-1` means the latest recorded match.
    pub fn standings(
        &self,
        play_type: PlayType,
        index: LeagueIndex,
        title: &str,
    ) -> Result<StandingsReport> {
        let names = self.league.entity_names(play_type);
        self.build_report(play_type, index, title, names)
    }

    /// Doubles standings per individual player, independent of partner.
    pub fn doubles_standings_per_player(
        &self,
        index: LeagueIndex,
        title: &str,
    ) -> Result<StandingsReport> {
        let names = self.league.player_names();
        self.build_report(PlayType::Doubles, index, title, names)
    }

    fn build_report(
        &self,
        play_type: PlayType,
        index: LeagueIndex,
        title: &str,
        names: Vec<String>,
    ) -> Result<StandingsReport> {
        let as_of = self.clamp_index(play_type, index)?;
        let mut rows = Vec::new();
        for name in names {
            if !self.in_filter(&name) {
                continue;
            }
            let stats = self.league.entity_stats(&name, play_type)?;
            let played = stats.matches_played_as_of(as_of)?;
            if as_of.value() != 0 && played == 0 {
                continue;
            }
            let at = PlayerIndex::new(played)?;
            let points = stats.get_cumulative_sum(SeriesName::MatchPoints, at)?.to_f64();
            let games_won = stats
                .get_cumulative_sum(SeriesName::GamesWon, at)?
                .as_integer()
                .unwrap_or(0);
            let games_lost = stats
                .get_cumulative_sum(SeriesName::GamesLost, at)?
                .as_integer()
                .unwrap_or(0);
            let total_games = games_won + games_lost;
            rows.push(StandingRow {
                rank: stats.get_rank(as_of)?,
                name: name.clone(),
                play_level: self.league.level_factor(&name, play_type, as_of)?,
                points_per_match: if played == 0 { 0.0 } else { points / played as f64 },
                points,
                matches_played: played,
                games_won,
                games_lost,
                games_won_percent: if total_games == 0 {
                    0.0
                } else {
                    games_won as f64 / total_games as f64 * 100.0
                },
            });
        }
        rows.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.name.cmp(&b.name)));

        let totals = self.league.aggregates(as_of, play_type)?;
        let league = LeagueSummary {
            points: totals.points,
            points_per_match: totals.average_points_per_match(),
            matches_played: as_of.value(),
            games_won: totals.games_won,
            games_lost: totals.games_lost,
            games_won_percent: totals.games_won_percent() * 100.0,
        };

        Ok(StandingsReport {
            title: title.to_string(),
            play_type,
            as_of_match: as_of.value(),
            rows,
            league,
        })
    }

    /// Matches recorded up to an index, respecting the player filter.
    pub fn match_list(&self, play_type: PlayType, index: LeagueIndex) -> Result<Vec<MatchRecord>> {
        let as_of = self.clamp_index(play_type, index)?;
        let records = self
            .league
            .matches(play_type)
            .iter()
            .take(as_of.value() as usize)
            .filter(|record| {
                self.in_filter(record.side_a()) || self.in_filter(record.side_b())
            })
            .cloned()
            .collect();
        Ok(records)
    }

    fn clamp_index(&self, play_type: PlayType, index: LeagueIndex) -> Result<LeagueIndex> {
        let last = self.league.last_match_index(play_type);
        if index.is_latest() || index.value() > last {
            return LeagueIndex::new(last);
        }
        Ok(index)
    }

    fn in_filter(&self, name: &str) -> bool {
        if self.player_filter.is_empty() {
            return true;
        }
        self.player_filter
            .iter()
            .any(|filter| name == filter || name.split(" and ").any(|member| member == filter))
    }
}

/// Fixed-width text rendering of a standings report.
pub fn print_standings(report: &StandingsReport) {
    let name_width = report
        .rows
        .iter()
        .map(|row| row.name.len())
        .chain(["league".len()])
        .max()
        .unwrap_or(6)
        + 2;

    let header = format!(
        "{:<6} {:<name_width$} {:>10} {:>12} {:>12}   {:<14} {:<10} {:<10} {:>11}",
        "Rank",
        "Name",
        "Play Level",
        "Points/Match",
        "Points",
        "Matches Played",
        "Games Won",
        "Games Lost",
        "% games won",
    );
    println!("{}", "-".repeat(header.len()));
    println!("{}", report.title.bold());
    println!("{}", "-".repeat(header.len()));
    println!("{header}");
    for row in &report.rows {
        println!(
            "{:<6} {:<name_width$} {:>10.3} {:>12.3} {:>12.3}   {:<14} {:<10} {:<10} {:>11.3}",
            row.rank,
            row.name,
            row.play_level,
            row.points_per_match,
            row.points,
            row.matches_played,
            row.games_won,
            row.games_lost,
            row.games_won_percent,
        );
    }
    println!("{}", "-".repeat(header.len()));
    let league = &report.league;
    println!(
        "{:<6} {:<name_width$} {:>10.3} {:>12.3} {:>12.3}   {:<14} {:<10} {:<10} {:>11.3}",
        "-",
        "league",
        0.0,
        league.points_per_match,
        league.points,
        league.matches_played,
        league.games_won,
        league.games_lost,
        league.games_won_percent,
    );
}

/// Plain list of the matches played.
pub fn print_match_list(records: &[MatchRecord]) {
    println!("{}", "MATCHES PLAYED".bold());
    println!("{}", "-".repeat(70));
    for record in records {
        println!("{record}");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringSettings;
    use crate::scoring::ScoreEngine;

    fn computed_league() -> League {
        let mut league = League::new();
        for name in ["anna", "ben", "carol"] {
            league.add_player(name, 1.0, 0.0).unwrap();
        }
        league.add_match("anna", 6, "ben", 3).unwrap();
        league.add_match("ben", 5, "carol", 5).unwrap();
        let engine = ScoreEngine::new(ScoringSettings::default());
        engine
            .compute(&mut league, PlayType::Singles, LeagueIndex::latest())
            .unwrap();
        league
    }

    #[test]
    fn test_standings_cover_every_entity_with_matches() {
        let league = computed_league();
        let reporter = StatsReporter::new(&league, Vec::new());
        let report = reporter
            .standings(PlayType::Singles, LeagueIndex::latest(), "singles stats")
            .unwrap();

        assert_eq!(report.as_of_match, 2);
        assert_eq!(report.rows.len(), 3);
        // rows come back rank-ordered
        for pair in report.rows.windows(2) {
            assert!(pair[0].rank <= pair[1].rank);
        }
        let anna = report.rows.iter().find(|row| row.name == "anna").unwrap();
        assert_eq!(anna.matches_played, 1);
        assert_eq!(anna.games_won, 6);
        assert_eq!(anna.games_lost, 3);
        assert!((anna.games_won_percent - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_standings_respect_the_player_filter() {
        let league = computed_league();
        let reporter = StatsReporter::new(&league, vec!["anna".to_string()]);
        let report = reporter
            .standings(PlayType::Singles, LeagueIndex::latest(), "singles stats")
            .unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].name, "anna");
    }

    #[test]
    fn test_out_of_range_index_clamps_to_latest() {
        let league = computed_league();
        let reporter = StatsReporter::new(&league, Vec::new());
        let report = reporter
            .standings(
                PlayType::Singles,
                LeagueIndex::new(99).unwrap(),
                "singles stats",
            )
            .unwrap();
        assert_eq!(report.as_of_match, 2);
    }

    #[test]
    fn test_match_list_honors_index_and_filter() {
        let league = computed_league();
        let reporter = StatsReporter::new(&league, vec!["carol".to_string()]);
        let records = reporter
            .match_list(PlayType::Singles, LeagueIndex::latest())
            .unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].involves("carol"));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let league = computed_league();
        let reporter = StatsReporter::new(&league, Vec::new());
        let report = reporter
            .standings(PlayType::Singles, LeagueIndex::latest(), "singles stats")
            .unwrap();
        let json = serde_json::to_string_pretty(&report).unwrap();
        assert!(json.contains("\"rows\""));
        assert!(json.contains("\"anna\""));
    }
}
