use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use regex::Regex;

use crate::domain::League;

/// Replacement players fill in for absent regulars; their results don't
/// count toward the standings.
pub const REPLACEMENT_PLAYER_PREFIX: &str = "RPL";

/// Line-oriented importer for league result files.
///
/// Recognized records (all whitespace is stripped before matching, `*`
/// markers are dropped from names):
///
/// ```text
/// NEW_PLAYER,name,level_scoring_factor,initial_points
/// SINGLES_GAME,name1,games_won_1,name2,games_won_2
/// DOUBLES_GAME,name1,name2,games_won_a,name3,name4,games_won_b
/// NEW_SINGLES_LEVEL,name,league_match_index,new_level
/// NEW_TEAM_LEVEL,name1,name2,league_match_index,new_level
/// ```
///
/// Players referenced by a game line without a prior registration are
/// registered with defaults. Anything else (headers, annotations) is
/// skipped with a debug log.
pub struct CsvImporter {
    new_player: Regex,
    singles_game: Regex,
    doubles_game: Regex,
    singles_level: Regex,
    team_level: Regex,
}

impl Default for CsvImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvImporter {
    pub fn new() -> Self {
        let number = r"(\d+(?:\.\d*)?)";
        Self {
            new_player: Regex::new(&format!(r"^NEW_PLAYER,([^,]+?),{number},{number}$"))
                .expect("static regex"),
            singles_game: Regex::new(r"^SINGLES_GAME,([^,]+?),(\d+),([^,]+?),(\d+)$")
                .expect("static regex"),
            doubles_game: Regex::new(
                r"^DOUBLES_GAME,([^,]+?),([^,]+?),(\d+),([^,]+?),([^,]+?),(\d+)$",
            )
            .expect("static regex"),
            singles_level: Regex::new(&format!(r"^NEW_SINGLES_LEVEL,([^,]+?),(\d+),{number}$"))
                .expect("static regex"),
            team_level: Regex::new(&format!(
                r"^NEW_TEAM_LEVEL,([^,]+?),([^,]+?),(\d+),{number}$"
            ))
            .expect("static regex"),
        }
    }

    pub fn import_file(&self, path: impl AsRef<Path>, league: &mut League) -> Result<()> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read results file: {}", path.display()))?;
        self.import_str(&text, league)
            .with_context(|| format!("Failed to import results from: {}", path.display()))
    }

    pub fn import_str(&self, text: &str, league: &mut League) -> Result<()> {
        let mut imported = 0usize;
        for (position, raw) in text.lines().enumerate() {
            let line: String = raw.split_whitespace().collect();
            if line.is_empty() {
                continue;
            }
            if line.to_uppercase().contains(REPLACEMENT_PLAYER_PREFIX) {
                info!("skipping replacement player entry: {line}");
                continue;
            }
            if self
                .apply_line(&line, league)
                .with_context(|| format!("line {}: {}", position + 1, raw.trim()))?
            {
                imported += 1;
            }
        }
        info!("imported {imported} records");
        Ok(())
    }

    /// Applies one stripped line; returns whether it matched a record.
    fn apply_line(&self, line: &str, league: &mut League) -> Result<bool> {
        if let Some(caps) = self.new_player.captures(line) {
            let name = cleanup_name(&caps[1]);
            let level: f64 = caps[2].parse()?;
            let initial_points: f64 = caps[3].parse()?;
            league.add_player(&name, level, initial_points)?;
            return Ok(true);
        }

        if let Some(caps) = self.singles_game.captures(line) {
            let name1 = cleanup_name(&caps[1]);
            let won1: i64 = caps[2].parse()?;
            let name2 = cleanup_name(&caps[3]);
            let won2: i64 = caps[4].parse()?;
            self.ensure_players(league, &[&name1, &name2])?;
            league.add_match(&name1, won1, &name2, won2)?;
            return Ok(true);
        }

        if let Some(caps) = self.doubles_game.captures(line) {
            let name1 = cleanup_name(&caps[1]);
            let name2 = cleanup_name(&caps[2]);
            let won_a: i64 = caps[3].parse()?;
            let name3 = cleanup_name(&caps[4]);
            let name4 = cleanup_name(&caps[5]);
            let won_b: i64 = caps[6].parse()?;
            self.ensure_players(league, &[&name1, &name2, &name3, &name4])?;
            let team_a = self.ensure_team(league, &name1, &name2)?;
            let team_b = self.ensure_team(league, &name3, &name4)?;
            league.add_match(&team_a, won_a, &team_b, won_b)?;
            return Ok(true);
        }

        if let Some(caps) = self.singles_level.captures(line) {
            let name = cleanup_name(&caps[1]);
            let match_index: i64 = caps[2].parse()?;
            let level: f64 = caps[3].parse()?;
            league.revise_player_level(&name, match_index, level)?;
            return Ok(true);
        }

        if let Some(caps) = self.team_level.captures(line) {
            let name1 = cleanup_name(&caps[1]);
            let name2 = cleanup_name(&caps[2]);
            let league_index: i64 = caps[3].parse()?;
            let level: f64 = caps[4].parse()?;
            league.revise_team_level(&name1, &name2, league_index, level)?;
            return Ok(true);
        }

        debug!("skipping unrecognized line: {line}");
        Ok(false)
    }

    /// Game lines may reference players that never got a NEW_PLAYER entry;
    /// register them with defaults.
    fn ensure_players(&self, league: &mut League, names: &[&str]) -> Result<()> {
        for name in names {
            if !league.has_entity(name) {
                debug!("auto-registering player {name}");
                league.add_player(name, 1.0, 0.0)?;
            }
        }
        Ok(())
    }

    /// Resolves a pair to its team name, generating the doubles
    /// combinations if the pair has no team yet (late registrations).
    fn ensure_team(&self, league: &mut League, name1: &str, name2: &str) -> Result<String> {
        if league.doubles_team_for(name1, name2).is_err() {
            league.generate_doubles_combinations()?;
        }
        Ok(league.doubles_team_for(name1, name2)?.name().to_string())
    }
}

fn cleanup_name(name: &str) -> String {
    name.replace('*', "").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{doubles_team_name, PlayType};
    use crate::stats::LeagueIndex;

    fn import(text: &str) -> League {
        let mut league = League::new();
        CsvImporter::new().import_str(text, &mut league).unwrap();
        league
    }

    #[test]
    fn test_players_and_singles_games() {
        let league = import(
            "New Player, name, level scoring factor, initial points\n\
             NEW_PLAYER,anna,0.8,0.0\n\
             NEW_PLAYER,ben,1.0,2.5\n\
             SINGLES_GAME,anna,6,ben,3\n",
        );
        assert_eq!(league.last_match_index(PlayType::Singles), 1);
        let as_of = LeagueIndex::new(1).unwrap();
        assert_eq!(
            league.matches_played_as_of(as_of, "anna", PlayType::Singles).unwrap(),
            1
        );
    }

    #[test]
    fn test_unknown_players_are_registered_with_defaults() {
        let league = import("SINGLES_GAME,anna,6,ben,3\n");
        assert!(league.player("anna").is_ok());
        assert!(league.player("ben").is_ok());
    }

    #[test]
    fn test_doubles_games_create_team_combinations() {
        let league = import(
            "NEW_PLAYER,anna,1.0,0\n\
             NEW_PLAYER,ben,1.0,0\n\
             NEW_PLAYER,carol,1.0,0\n\
             NEW_PLAYER,dave,1.0,0\n\
             DOUBLES_GAME,anna,ben,6,carol,dave,4\n",
        );
        assert_eq!(league.last_match_index(PlayType::Doubles), 1);
        let team = doubles_team_name("anna", "ben");
        let as_of = LeagueIndex::new(1).unwrap();
        assert_eq!(
            league.matches_played_as_of(as_of, &team, PlayType::Doubles).unwrap(),
            1
        );
    }

    #[test]
    fn test_replacement_player_lines_are_skipped() {
        let league = import(
            "NEW_PLAYER,anna,1.0,0\n\
             NEW_PLAYER,ben,1.0,0\n\
             SINGLES_GAME,anna,6,RPL_joe,3\n",
        );
        assert_eq!(league.last_match_index(PlayType::Singles), 0);
        assert!(league.player("rpl_joe").is_err());
    }

    #[test]
    fn test_whitespace_and_markers_are_stripped() {
        let league = import("NEW_PLAYER, anna* , 0.8 , 0.0\nSINGLES_GAME, anna ,6, ben ,3\n");
        assert!(league.player("anna").is_ok());
    }

    #[test]
    fn test_level_revision_records() {
        let mut league = League::new();
        let importer = CsvImporter::new();
        importer
            .import_str(
                "NEW_PLAYER,anna,1.0,0\n\
                 NEW_PLAYER,ben,1.0,0\n\
                 SINGLES_GAME,anna,6,ben,3\n\
                 NEW_SINGLES_LEVEL,anna,1,0.75\n",
                &mut league,
            )
            .unwrap();
        let factor = league
            .level_factor("anna", PlayType::Singles, crate::stats::PlayerIndex::latest())
            .unwrap();
        assert!((factor - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_bad_game_line_surfaces_the_line_number() {
        let mut league = League::new();
        let error = CsvImporter::new()
            .import_str("SINGLES_GAME,anna,6,anna,3\n", &mut league)
            .unwrap_err();
        assert!(format!("{error:#}").contains("line 1"));
    }
}
