use std::collections::BTreeMap;

use crate::errors::{Error, Result};
use crate::stats::{EntityStatistics, StatIndex};

use super::models::PlayType;

/// Doubles team names are derived from the member names, sorted, so the same
/// pair always resolves to the same entity.
pub fn doubles_team_name(name1: &str, name2: &str) -> String {
    let mut names = [name1.to_lowercase(), name2.to_lowercase()];
    names.sort();
    format!("{} and {}", names[0], names[1])
}

/// A singles player. Carries two statistics blocks: one for singles play and
/// one for the player's own doubles history, tracked independently of which
/// partner they were paired with.
#[derive(Debug)]
pub struct Player {
    name: String,
    singles: EntityStatistics,
    doubles: EntityStatistics,
}

impl Player {
    pub fn new(name: &str, level_scoring_factor: f64, initial_points: f64) -> Result<Self> {
        if !(level_scoring_factor > 0.0 && level_scoring_factor <= 1.0) {
            return Err(Error::InvalidLevelFactor(level_scoring_factor));
        }
        Ok(Self {
            name: name.to_lowercase(),
            singles: EntityStatistics::new(initial_points, level_scoring_factor),
            doubles: EntityStatistics::new(0.0, level_scoring_factor),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stats(&self, play_type: PlayType) -> &EntityStatistics {
        match play_type {
            PlayType::Singles => &self.singles,
            PlayType::Doubles => &self.doubles,
        }
    }

    pub fn stats_mut(&mut self, play_type: PlayType) -> &mut EntityStatistics {
        match play_type {
            PlayType::Singles => &mut self.singles,
            PlayType::Doubles => &mut self.doubles,
        }
    }
}

/// A doubles team: two players and the team's own statistics block.
///
/// The level scoring factor is derived from the members' singles factors
/// unless an explicit override was recorded; overrides are keyed by league
/// index and the most recent one at or before the queried index wins.
#[derive(Debug)]
pub struct DoublesTeam {
    name: String,
    members: [String; 2],
    stats: EntityStatistics,
    level_overrides: BTreeMap<i64, f64>,
}

impl DoublesTeam {
    pub fn new(name1: &str, name2: &str, initial_points: f64) -> Result<Self> {
        let name1 = name1.to_lowercase();
        let name2 = name2.to_lowercase();
        if name1 == name2 {
            return Err(Error::SelfPlay(name1));
        }
        let name = doubles_team_name(&name1, &name2);
        let mut members = [name1, name2];
        members.sort();
        Ok(Self {
            name,
            members,
            stats: EntityStatistics::new(initial_points, 1.0),
            level_overrides: BTreeMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> (&str, &str) {
        (&self.members[0], &self.members[1])
    }

    pub fn has_member(&self, player_name: &str) -> bool {
        let player_name = player_name.to_lowercase();
        self.members.iter().any(|member| *member == player_name)
    }

    pub fn shares_member_with(&self, other: &DoublesTeam) -> bool {
        self.members.iter().any(|member| other.has_member(member))
    }

    pub fn stats(&self) -> &EntityStatistics {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut EntityStatistics {
        &mut self.stats
    }

    /// Records an explicit level override effective from `league_index` on.
    pub fn override_level_factor(&mut self, factor: f64, league_index: i64) -> Result<()> {
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(Error::InvalidLevelFactor(factor));
        }
        self.level_overrides.insert(league_index, factor);
        Ok(())
    }

    /// Most recent override at or before the given league index, if any.
    pub fn level_override_at(&self, league_value: i64) -> Option<f64> {
        self.level_overrides
            .range(..=league_value)
            .next_back()
            .map(|(_, &factor)| factor)
    }

    /// Team factor at an index: an override wins, otherwise the product of
    /// the members' singles factors at the same point in time.
    pub fn level_factor_at(
        &self,
        league_value: i64,
        index: impl Into<StatIndex> + Copy,
        player1: &Player,
        player2: &Player,
    ) -> Result<f64> {
        if let Some(factor) = self.level_override_at(league_value) {
            return Ok(factor);
        }
        let factor1 = player1.stats(PlayType::Singles).get_level_factor(index)?;
        let factor2 = player2.stats(PlayType::Singles).get_level_factor(index)?;
        Ok(factor1 * factor2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::LeagueIndex;

    #[test]
    fn test_level_factor_range_is_validated() {
        assert_eq!(
            Player::new("anna", 0.0, 0.0).unwrap_err(),
            Error::InvalidLevelFactor(0.0)
        );
        assert_eq!(
            Player::new("anna", 1.2, 0.0).unwrap_err(),
            Error::InvalidLevelFactor(1.2)
        );
        assert!(Player::new("anna", 1.0, 0.0).is_ok());
    }

    #[test]
    fn test_team_name_is_sorted_and_lowercased() {
        let team = DoublesTeam::new("Zoe", "Anna", 0.0).unwrap();
        assert_eq!(team.name(), "anna and zoe");
        assert!(team.has_member("ZOE"));
        assert!(!team.has_member("ben"));
    }

    #[test]
    fn test_team_of_one_player_is_rejected() {
        assert_eq!(
            DoublesTeam::new("anna", "Anna", 0.0).unwrap_err(),
            Error::SelfPlay("anna".to_string())
        );
    }

    #[test]
    fn test_derived_level_factor_is_member_product() {
        let player1 = Player::new("anna", 0.8, 0.0).unwrap();
        let player2 = Player::new("ben", 0.9, 0.0).unwrap();
        let team = DoublesTeam::new("anna", "ben", 0.0).unwrap();

        let factor = team
            .level_factor_at(1, LeagueIndex::new(1).unwrap(), &player1, &player2)
            .unwrap();
        assert!((factor - 0.72).abs() < 1e-9);
    }

    #[test]
    fn test_override_takes_precedence_from_its_index_on() {
        let player1 = Player::new("anna", 0.8, 0.0).unwrap();
        let player2 = Player::new("ben", 0.9, 0.0).unwrap();
        let mut team = DoublesTeam::new("anna", "ben", 0.0).unwrap();
        team.override_level_factor(0.5, 3).unwrap();

        let index = LeagueIndex::new(2).unwrap();
        let before = team.level_factor_at(2, index, &player1, &player2).unwrap();
        assert!((before - 0.72).abs() < 1e-9);

        for league_value in 3..6 {
            let index = LeagueIndex::new(league_value).unwrap();
            let factor = team
                .level_factor_at(league_value, index, &player1, &player2)
                .unwrap();
            assert!((factor - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_override_is_range_checked() {
        let mut team = DoublesTeam::new("anna", "ben", 0.0).unwrap();
        assert_eq!(
            team.override_level_factor(1.5, 1).unwrap_err(),
            Error::InvalidLevelFactor(1.5)
        );
    }
}
