use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::errors::{Error, Result};
use crate::stats::{EntityStatistics, LeagueIndex, PlayerIndex, SeriesName, StatIndex, Translation};

use super::entity::{doubles_team_name, DoublesTeam, Player};
use super::models::{MatchRecord, PlayType};

/// League-wide aggregates at one point in time, per-entity perspective:
/// every entity contributes its own cumulative points and match count, and
/// entities that have not played yet are excluded.
#[derive(Debug, Clone, Serialize)]
pub struct LeagueAggregates {
    pub points: f64,
    pub matches_counted: i64,
    pub games_won: i64,
    pub games_lost: i64,
}

impl LeagueAggregates {
    pub fn average_points_per_match(&self) -> f64 {
        if self.matches_counted == 0 {
            return 0.0;
        }
        self.points / self.matches_counted as f64
    }

    pub fn total_games(&self) -> i64 {
        self.games_won + self.games_lost
    }

    pub fn games_won_percent(&self) -> f64 {
        let total = self.total_games();
        if total == 0 {
            return 0.0;
        }
        self.games_won as f64 / total as f64
    }
}

/// The entity registry and ordered match lists, one league clock per play
/// type. Constructed once and passed explicitly to the engine and the
/// presenters; there is no global league.
///
/// Entities iterate in name order (the maps are ordered), which keeps
/// ranking tie-breaks and report layouts deterministic across runs.
#[derive(Debug, Default)]
pub struct League {
    players: BTreeMap<String, Player>,
    teams: BTreeMap<String, DoublesTeam>,
    singles_matches: Vec<MatchRecord>,
    doubles_matches: Vec<MatchRecord>,
}

impl League {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Registration ---

    pub fn add_player(
        &mut self,
        name: &str,
        level_scoring_factor: f64,
        initial_points: f64,
    ) -> Result<()> {
        let player = Player::new(name, level_scoring_factor, initial_points)?;
        if self.players.contains_key(player.name()) {
            return Err(Error::DuplicateEntity(player.name().to_string()));
        }
        self.players.insert(player.name().to_string(), player);
        Ok(())
    }

    /// Creates every unordered pair of registered singles players as a
    /// doubles team. Safe to call again after late registrations; existing
    /// teams are kept.
    pub fn generate_doubles_combinations(&mut self) -> Result<()> {
        let names: Vec<String> = self.players.keys().cloned().collect();
        for (i, name1) in names.iter().enumerate() {
            for name2 in names.iter().skip(i + 1) {
                let team_name = doubles_team_name(name1, name2);
                if self.teams.contains_key(&team_name) {
                    continue;
                }
                let team = DoublesTeam::new(name1, name2, 0.0)?;
                debug!("doubles team created: {}", team.name());
                self.teams.insert(team_name, team);
            }
        }
        Ok(())
    }

    pub fn has_entity(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.players.contains_key(&name) || self.teams.contains_key(&name)
    }

    pub fn player(&self, name: &str) -> Result<&Player> {
        let name = name.to_lowercase();
        self.players
            .get(&name)
            .ok_or(Error::UnknownEntity(name))
    }

    pub fn team(&self, name: &str) -> Result<&DoublesTeam> {
        let name = name.to_lowercase();
        self.teams.get(&name).ok_or(Error::UnknownEntity(name))
    }

    /// The team formed by two players, however the caller orders them.
    pub fn doubles_team_for(&self, name1: &str, name2: &str) -> Result<&DoublesTeam> {
        self.team(&doubles_team_name(name1, name2))
    }

    // --- Matches ---

    pub fn matches(&self, play_type: PlayType) -> &[MatchRecord] {
        match play_type {
            PlayType::Singles => &self.singles_matches,
            PlayType::Doubles => &self.doubles_matches,
        }
    }

    /// Value of the league clock: the number of matches recorded so far.
    pub fn last_match_index(&self, play_type: PlayType) -> i64 {
        self.matches(play_type).len() as i64
    }

    /// Records a match between two entity names of the same play type and
    /// advances that play type's league clock. Both sides' statistics (and,
    /// for doubles, all four players' personal doubles statistics) receive
    /// the result.
    pub fn add_match(
        &mut self,
        side_a: &str,
        games_won_a: i64,
        side_b: &str,
        games_won_b: i64,
    ) -> Result<LeagueIndex> {
        let side_a = side_a.to_lowercase();
        let side_b = side_b.to_lowercase();

        let a_is_player = self.players.contains_key(&side_a);
        let b_is_player = self.players.contains_key(&side_b);
        let a_is_team = self.teams.contains_key(&side_a);
        let b_is_team = self.teams.contains_key(&side_b);

        if !a_is_player && !a_is_team {
            return Err(Error::UnknownEntity(side_a));
        }
        if !b_is_player && !b_is_team {
            return Err(Error::UnknownEntity(side_b));
        }
        if a_is_player != b_is_player {
            return Err(Error::MixedPlayTypes(side_a, side_b));
        }

        if a_is_player {
            self.add_singles_match(&side_a, games_won_a, &side_b, games_won_b)
        } else {
            self.add_doubles_match_by_teams(&side_a, games_won_a, &side_b, games_won_b)
        }
    }

    fn add_singles_match(
        &mut self,
        name_a: &str,
        games_won_a: i64,
        name_b: &str,
        games_won_b: i64,
    ) -> Result<LeagueIndex> {
        let record = MatchRecord::new(PlayType::Singles, name_a, games_won_a, name_b, games_won_b)?;
        let league_index = LeagueIndex::new(self.last_match_index(PlayType::Singles) + 1)?;

        let player_a = self
            .players
            .get_mut(name_a)
            .ok_or_else(|| Error::UnknownEntity(name_a.to_string()))?;
        player_a
            .stats_mut(PlayType::Singles)
            .set_match_results(games_won_a, games_won_b, league_index)?;
        let player_b = self
            .players
            .get_mut(name_b)
            .ok_or_else(|| Error::UnknownEntity(name_b.to_string()))?;
        player_b
            .stats_mut(PlayType::Singles)
            .set_match_results(games_won_b, games_won_a, league_index)?;

        self.singles_matches.push(record);
        Ok(league_index)
    }

    fn add_doubles_match_by_teams(
        &mut self,
        team_a: &str,
        games_won_a: i64,
        team_b: &str,
        games_won_b: i64,
    ) -> Result<LeagueIndex> {
        let record = MatchRecord::new(PlayType::Doubles, team_a, games_won_a, team_b, games_won_b)?;
        {
            let a = self.team(team_a)?;
            let b = self.team(team_b)?;
            if a.shares_member_with(b) {
                return Err(Error::OverlappingRosters(
                    a.name().to_string(),
                    b.name().to_string(),
                ));
            }
        }
        let league_index = LeagueIndex::new(self.last_match_index(PlayType::Doubles) + 1)?;

        let mut member_results: Vec<(String, i64, i64)> = Vec::with_capacity(4);
        for (team_name, won, lost) in [
            (team_a, games_won_a, games_won_b),
            (team_b, games_won_b, games_won_a),
        ] {
            let team = self
                .teams
                .get_mut(team_name)
                .ok_or_else(|| Error::UnknownEntity(team_name.to_string()))?;
            team.stats_mut().set_match_results(won, lost, league_index)?;
            let (member1, member2) = team.members();
            member_results.push((member1.to_string(), won, lost));
            member_results.push((member2.to_string(), won, lost));
        }
        for (member, won, lost) in member_results {
            let player = self
                .players
                .get_mut(&member)
                .ok_or(Error::UnknownEntity(member))?;
            player
                .stats_mut(PlayType::Doubles)
                .set_match_results(won, lost, league_index)?;
        }

        self.doubles_matches.push(record);
        Ok(league_index)
    }

    // --- Statistics access ---

    /// Ranked entity names of a play type, in name order. For doubles these
    /// are the team names.
    pub fn entity_names(&self, play_type: PlayType) -> Vec<String> {
        match play_type {
            PlayType::Singles => self.players.keys().cloned().collect(),
            PlayType::Doubles => self.teams.keys().cloned().collect(),
        }
    }

    pub fn player_names(&self) -> Vec<String> {
        self.players.keys().cloned().collect()
    }

    /// Statistics block for an entity name within a play type. Within
    /// doubles, a team name resolves to the team block and a plain player
    /// name to that player's personal doubles block.
    pub fn entity_stats(&self, name: &str, play_type: PlayType) -> Result<&EntityStatistics> {
        let name = name.to_lowercase();
        match play_type {
            PlayType::Singles => Ok(self.player(&name)?.stats(PlayType::Singles)),
            PlayType::Doubles => {
                if let Some(team) = self.teams.get(&name) {
                    Ok(team.stats())
                } else {
                    Ok(self.player(&name)?.stats(PlayType::Doubles))
                }
            }
        }
    }

    pub fn entity_stats_mut(
        &mut self,
        name: &str,
        play_type: PlayType,
    ) -> Result<&mut EntityStatistics> {
        let name = name.to_lowercase();
        match play_type {
            PlayType::Singles => {
                let player = self
                    .players
                    .get_mut(&name)
                    .ok_or(Error::UnknownEntity(name))?;
                Ok(player.stats_mut(PlayType::Singles))
            }
            PlayType::Doubles => {
                if let Some(team) = self.teams.get_mut(&name) {
                    return Ok(team.stats_mut());
                }
                let player = self
                    .players
                    .get_mut(&name)
                    .ok_or(Error::UnknownEntity(name))?;
                Ok(player.stats_mut(PlayType::Doubles))
            }
        }
    }

    /// Matches an entity had played when the league clock stood at `league`.
    pub fn matches_played_as_of(
        &self,
        league: LeagueIndex,
        name: &str,
        play_type: PlayType,
    ) -> Result<i64> {
        let league = if league.is_latest() {
            LeagueIndex::new(self.last_match_index(play_type))?
        } else {
            league
        };
        self.entity_stats(name, play_type)?.matches_played_as_of(league)
    }

    /// Level scoring factor for an entity at an index of either clock.
    /// Teams derive theirs from the members unless overridden.
    pub fn level_factor(
        &self,
        name: &str,
        play_type: PlayType,
        index: impl Into<StatIndex> + Copy,
    ) -> Result<f64> {
        let name = name.to_lowercase();
        if play_type == PlayType::Doubles {
            if let Some(team) = self.teams.get(&name) {
                let league_value = self.league_value_for(team.stats(), index.into())?;
                let (member1, member2) = team.members();
                let player1 = self.player(member1)?;
                let player2 = self.player(member2)?;
                return team.level_factor_at(league_value, index, player1, player2);
            }
        }
        self.entity_stats(&name, play_type)?.get_level_factor(index)
    }

    /// Best-effort league-clock value for an either-clock index, for
    /// override lookups. Unregistered personal ticks fall back to 0.
    fn league_value_for(&self, stats: &EntityStatistics, index: StatIndex) -> Result<i64> {
        if index.is_latest() {
            return Ok(i64::MAX);
        }
        match index {
            StatIndex::League(league) => Ok(league.value()),
            StatIndex::Player(_) => match stats.to_league(index)? {
                Translation::Exact(league) => Ok(league.value()),
                Translation::Unregistered => Ok(0),
            },
        }
    }

    // --- League-wide aggregates ---

    /// Per-entity-perspective totals as of a league index. Every entity
    /// contributes its own match count; the sum is deliberately not halved.
    pub fn aggregates(&self, league: LeagueIndex, play_type: PlayType) -> Result<LeagueAggregates> {
        let mut totals = LeagueAggregates {
            points: 0.0,
            matches_counted: 0,
            games_won: 0,
            games_lost: 0,
        };
        for name in self.entity_names(play_type) {
            let stats = self.entity_stats(&name, play_type)?;
            let played = stats.matches_played_as_of(league)?;
            if played == 0 {
                continue;
            }
            let at = PlayerIndex::new(played)?;
            totals.points += stats
                .get_cumulative_sum(SeriesName::MatchPoints, at)?
                .to_f64();
            totals.matches_counted += played;
            totals.games_won += stats
                .get_cumulative_sum(SeriesName::GamesWon, at)?
                .as_integer()
                .unwrap_or(0);
            totals.games_lost += stats
                .get_cumulative_sum(SeriesName::GamesLost, at)?
                .as_integer()
                .unwrap_or(0);
        }
        Ok(totals)
    }

    pub fn league_average_points_per_match(
        &self,
        league: LeagueIndex,
        play_type: PlayType,
    ) -> Result<f64> {
        Ok(self.aggregates(league, play_type)?.average_points_per_match())
    }

    // --- Recomputation support ---

    /// Wipes the derived series (match points, rank) for every entity of the
    /// play type; for doubles that includes each player's personal doubles
    /// block. Raw results are untouched.
    pub fn reset_derived(&mut self, play_type: PlayType) -> Result<()> {
        match play_type {
            PlayType::Singles => {
                for player in self.players.values_mut() {
                    let stats = player.stats_mut(PlayType::Singles);
                    stats.reset_series(SeriesName::MatchPoints)?;
                    stats.reset_series(SeriesName::Rank)?;
                }
            }
            PlayType::Doubles => {
                for team in self.teams.values_mut() {
                    let stats = team.stats_mut();
                    stats.reset_series(SeriesName::MatchPoints)?;
                    stats.reset_series(SeriesName::Rank)?;
                }
                for player in self.players.values_mut() {
                    let stats = player.stats_mut(PlayType::Doubles);
                    stats.reset_series(SeriesName::MatchPoints)?;
                    stats.reset_series(SeriesName::Rank)?;
                }
            }
        }
        Ok(())
    }

    // --- Level revisions ---

    pub fn revise_player_level(&mut self, name: &str, match_index: i64, factor: f64) -> Result<()> {
        let name = name.to_lowercase();
        let player = self
            .players
            .get_mut(&name)
            .ok_or(Error::UnknownEntity(name))?;
        player
            .stats_mut(PlayType::Singles)
            .revise_level_factor(factor, match_index)
    }

    pub fn revise_team_level(
        &mut self,
        name1: &str,
        name2: &str,
        league_index: i64,
        factor: f64,
    ) -> Result<()> {
        let team_name = doubles_team_name(name1, name2);
        let team = self
            .teams
            .get_mut(&team_name)
            .ok_or(Error::UnknownEntity(team_name.clone()))?;
        team.override_level_factor(factor, league_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn league_with_players(names: &[&str]) -> League {
        let mut league = League::new();
        for name in names {
            league.add_player(name, 1.0, 0.0).unwrap();
        }
        league
    }

    #[test]
    fn test_duplicate_player_is_rejected() {
        let mut league = league_with_players(&["anna"]);
        assert_eq!(
            league.add_player("Anna", 1.0, 0.0).unwrap_err(),
            Error::DuplicateEntity("anna".to_string())
        );
    }

    #[test]
    fn test_unknown_entity_fails_lookup_and_matches() {
        let mut league = league_with_players(&["anna", "ben"]);
        assert_eq!(
            league.player("carol").unwrap_err(),
            Error::UnknownEntity("carol".to_string())
        );
        assert_eq!(
            league.add_match("anna", 6, "carol", 3).unwrap_err(),
            Error::UnknownEntity("carol".to_string())
        );
    }

    #[test]
    fn test_singles_match_advances_clock_and_both_stats() {
        let mut league = league_with_players(&["anna", "ben", "carol"]);
        league.add_match("anna", 6, "ben", 3).unwrap();
        league.add_match("ben", 2, "carol", 5).unwrap();

        assert_eq!(league.last_match_index(PlayType::Singles), 2);
        let as_of = LeagueIndex::new(2).unwrap();
        assert_eq!(
            league.matches_played_as_of(as_of, "ben", PlayType::Singles).unwrap(),
            2
        );
        assert_eq!(
            league.matches_played_as_of(as_of, "anna", PlayType::Singles).unwrap(),
            1
        );
        assert_eq!(
            league.matches_played_as_of(as_of, "carol", PlayType::Singles).unwrap(),
            1
        );
    }

    #[test]
    fn test_doubles_combinations_cover_all_pairs() {
        let mut league = league_with_players(&["anna", "ben", "carol"]);
        league.generate_doubles_combinations().unwrap();
        assert_eq!(league.entity_names(PlayType::Doubles).len(), 3);
        assert!(league.doubles_team_for("ben", "anna").is_ok());
    }

    #[test]
    fn test_doubles_match_feeds_team_and_player_blocks() {
        let mut league = league_with_players(&["anna", "ben", "carol", "dave"]);
        league.generate_doubles_combinations().unwrap();
        let team_a = doubles_team_name("anna", "ben");
        let team_b = doubles_team_name("carol", "dave");
        league.add_match(&team_a, 6, &team_b, 4).unwrap();

        let as_of = LeagueIndex::new(1).unwrap();
        assert_eq!(
            league.matches_played_as_of(as_of, &team_a, PlayType::Doubles).unwrap(),
            1
        );
        // each member's personal doubles block advanced too
        for name in ["anna", "ben", "carol", "dave"] {
            assert_eq!(
                league.matches_played_as_of(as_of, name, PlayType::Doubles).unwrap(),
                1
            );
        }
        // singles untouched
        assert_eq!(
            league.matches_played_as_of(as_of, "anna", PlayType::Singles).unwrap(),
            0
        );
    }

    #[test]
    fn test_overlapping_rosters_are_rejected() {
        let mut league = league_with_players(&["anna", "ben", "carol"]);
        league.generate_doubles_combinations().unwrap();
        let team_a = doubles_team_name("anna", "ben");
        let team_b = doubles_team_name("ben", "carol");
        assert!(matches!(
            league.add_match(&team_a, 6, &team_b, 4).unwrap_err(),
            Error::OverlappingRosters(_, _)
        ));
    }

    #[test]
    fn test_mixed_play_types_are_rejected() {
        let mut league = league_with_players(&["anna", "ben", "carol"]);
        league.generate_doubles_combinations().unwrap();
        let team = doubles_team_name("ben", "carol");
        assert!(matches!(
            league.add_match("anna", 6, &team, 4).unwrap_err(),
            Error::MixedPlayTypes(_, _)
        ));
    }

    #[test]
    fn test_league_average_excludes_idle_entities_and_does_not_halve() {
        let mut league = league_with_players(&["anna", "ben", "carol"]);
        league.add_match("anna", 6, "ben", 3).unwrap();
        let league_index = LeagueIndex::new(1).unwrap();
        for (name, points) in [("anna", 4.0), ("ben", 2.0)] {
            league
                .entity_stats_mut(name, PlayType::Singles)
                .unwrap()
                .set_series_value(
                    SeriesName::MatchPoints,
                    crate::stats::SeriesValue::Float(points),
                    league_index,
                )
                .unwrap();
        }

        // 6 points over 2 per-entity matches; carol contributes nothing
        let average = league
            .league_average_points_per_match(league_index, PlayType::Singles)
            .unwrap();
        assert!((average - 3.0).abs() < 1e-9);

        let totals = league.aggregates(league_index, PlayType::Singles).unwrap();
        assert_eq!(totals.matches_counted, 2);
        assert_eq!(totals.games_won, 9);
        assert_eq!(totals.games_lost, 9);
    }
}
