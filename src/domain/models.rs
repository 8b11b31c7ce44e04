use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Singles and doubles are fully separate universes: statistics, indices and
/// rankings never mix across them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayType {
    Singles,
    Doubles,
}

impl PlayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayType::Singles => "singles",
            PlayType::Doubles => "doubles",
        }
    }
}

impl fmt::Display for PlayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of one match: two registered entity names and each
/// side's games won. Entity names are lowercased; for doubles they are team
/// names of the form `"<a> and <b>"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    play_type: PlayType,
    side_a: String,
    side_b: String,
    games_won_a: i64,
    games_won_b: i64,
}

impl MatchRecord {
    /// Registry-independent validation only (self-play); registration and
    /// roster checks belong to the league, which owns the entities.
    pub fn new(
        play_type: PlayType,
        side_a: &str,
        games_won_a: i64,
        side_b: &str,
        games_won_b: i64,
    ) -> Result<Self> {
        let side_a = side_a.to_lowercase();
        let side_b = side_b.to_lowercase();
        if side_a == side_b {
            return Err(Error::SelfPlay(side_a));
        }
        Ok(Self {
            play_type,
            side_a,
            side_b,
            games_won_a,
            games_won_b,
        })
    }

    pub fn play_type(&self) -> PlayType {
        self.play_type
    }

    pub fn side_a(&self) -> &str {
        &self.side_a
    }

    pub fn side_b(&self) -> &str {
        &self.side_b
    }

    pub fn games_won_a(&self) -> i64 {
        self.games_won_a
    }

    pub fn games_won_b(&self) -> i64 {
        self.games_won_b
    }

    pub fn total_games(&self) -> i64 {
        self.games_won_a + self.games_won_b
    }

    pub fn involves(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.side_a == name || self.side_b == name
    }

    /// Games won from the perspective of one side's entity name.
    pub fn games_won_for(&self, name: &str) -> Option<i64> {
        let name = name.to_lowercase();
        if self.side_a == name {
            Some(self.games_won_a)
        } else if self.side_b == name {
            Some(self.games_won_b)
        } else {
            None
        }
    }
}

impl fmt::Display for MatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<12} vs {:<12}: {}-{}",
            self.side_a, self.side_b, self.games_won_a, self.games_won_b
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_play_is_rejected() {
        let result = MatchRecord::new(PlayType::Singles, "Anna", 6, "anna", 3);
        assert_eq!(result.unwrap_err(), Error::SelfPlay("anna".to_string()));
    }

    #[test]
    fn test_names_are_normalized() {
        let record = MatchRecord::new(PlayType::Singles, "Anna", 6, "Ben", 3).unwrap();
        assert_eq!(record.side_a(), "anna");
        assert!(record.involves("BEN"));
        assert_eq!(record.games_won_for("ben"), Some(3));
        assert_eq!(record.games_won_for("carol"), None);
        assert_eq!(record.total_games(), 9);
    }
}
