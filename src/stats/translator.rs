use std::collections::BTreeMap;

use crate::errors::{Error, Result};

use super::index::{LeagueIndex, PlayerIndex, StatIndex};

/// Outcome of converting an index onto the other clock.
///
/// `Unregistered` is not an error: the requested tick simply never happened
/// for this entity, and the caller decides whether extend-forward semantics
/// apply or an exact lookup should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Translation<T> {
    Exact(T),
    Unregistered,
}

/// Bijective map between the league clock and one entity's personal clock.
///
/// Exactly one pair is registered per match the entity plays, both sides
/// keyed in ascending order, so "latest known at or before" queries are
/// ordered-map range scans instead of full walks.
#[derive(Debug, Default)]
pub struct IndexTranslator {
    league_to_player: BTreeMap<i64, i64>,
    player_to_league: BTreeMap<i64, i64>,
}

impl IndexTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a league/personal pair. Each side must be new to its clock.
    pub fn add(&mut self, league: LeagueIndex, player: PlayerIndex) -> Result<()> {
        if self.league_to_player.contains_key(&league.value()) {
            return Err(Error::DuplicateIndex(league.value()));
        }
        if self.player_to_league.contains_key(&player.value()) {
            return Err(Error::DuplicateIndex(player.value()));
        }
        self.league_to_player.insert(league.value(), player.value());
        self.player_to_league.insert(player.value(), league.value());
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.league_to_player.is_empty()
    }

    /// Number of registered pairs, which equals the number of matches played.
    pub fn len(&self) -> usize {
        self.league_to_player.len()
    }

    pub fn contains_league(&self, league: LeagueIndex) -> bool {
        self.league_to_player.contains_key(&league.value())
    }

    pub fn max_league(&self) -> Result<LeagueIndex> {
        let value = self
            .league_to_player
            .keys()
            .next_back()
            .copied()
            .ok_or(Error::NoMatchPlayedYet)?;
        Ok(LeagueIndex::new(value)?.locked())
    }

    pub fn max_player(&self) -> Result<PlayerIndex> {
        let value = self
            .player_to_league
            .keys()
            .next_back()
            .copied()
            .ok_or(Error::NoMatchPlayedYet)?;
        Ok(PlayerIndex::new(value)?.locked())
    }

    /// Resolves an index of either clock onto the personal clock.
    ///
    /// `-1` resolves to the latest registered personal index, `0` is always
    /// the personal zero, and a personal-clock input passes through
    /// untouched. A league tick this entity sat out resolves to
    /// `Unregistered`.
    pub fn to_player(&self, index: impl Into<StatIndex>) -> Result<Translation<PlayerIndex>> {
        let index = index.into();
        if index.is_latest() {
            return Ok(Translation::Exact(self.max_player()?));
        }
        if index.value() == 0 {
            return Ok(Translation::Exact(PlayerIndex::zero()));
        }
        match index {
            StatIndex::Player(player) => Ok(Translation::Exact(player)),
            StatIndex::League(league) => match self.league_to_player.get(&league.value()) {
                Some(&value) => Ok(Translation::Exact(PlayerIndex::new(value)?.locked())),
                None => Ok(Translation::Unregistered),
            },
        }
    }

    /// Mirror of [`to_player`](Self::to_player) for the league clock.
    pub fn to_league(&self, index: impl Into<StatIndex>) -> Result<Translation<LeagueIndex>> {
        let index = index.into();
        if index.is_latest() {
            return Ok(Translation::Exact(self.max_league()?));
        }
        if index.value() == 0 {
            return Ok(Translation::Exact(LeagueIndex::zero()));
        }
        match index {
            StatIndex::League(league) => Ok(Translation::Exact(league)),
            StatIndex::Player(player) => match self.player_to_league.get(&player.value()) {
                Some(&value) => Ok(Translation::Exact(LeagueIndex::new(value)?.locked())),
                None => Ok(Translation::Unregistered),
            },
        }
    }

    /// Largest registered league index at or before the given one, mapped to
    /// its personal pair. Falls back to personal zero when the entity had not
    /// played at all by then. This is the extend-forward fallback for league
    /// ticks the entity sat out.
    pub fn player_at_or_before(&self, league: LeagueIndex) -> Result<PlayerIndex> {
        if league.is_latest() {
            return self.max_player().or_else(|_| Ok(PlayerIndex::zero()));
        }
        let value = self
            .league_to_player
            .range(..=league.value())
            .next_back()
            .map(|(_, &player)| player)
            .unwrap_or(0);
        Ok(PlayerIndex::new(value)?.locked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn league(value: i64) -> LeagueIndex {
        LeagueIndex::new(value).unwrap()
    }

    fn player(value: i64) -> PlayerIndex {
        PlayerIndex::new(value).unwrap()
    }

    fn sample() -> IndexTranslator {
        let mut translator = IndexTranslator::new();
        translator.add(league(5), player(1)).unwrap();
        translator.add(league(8), player(2)).unwrap();
        translator.add(league(12), player(3)).unwrap();
        translator
    }

    #[test]
    fn test_round_trip_translation() {
        let translator = sample();
        assert_eq!(
            translator.to_player(league(8)).unwrap(),
            Translation::Exact(player(2))
        );
        assert_eq!(
            translator.to_league(player(2)).unwrap(),
            Translation::Exact(league(8))
        );
    }

    #[test]
    fn test_duplicate_league_index_is_rejected() {
        let mut translator = sample();
        assert_eq!(
            translator.add(league(5), player(4)).unwrap_err(),
            Error::DuplicateIndex(5)
        );
        assert_eq!(
            translator.add(league(13), player(3)).unwrap_err(),
            Error::DuplicateIndex(3)
        );
    }

    #[test]
    fn test_latest_resolves_to_max_of_target_clock() {
        let translator = sample();
        assert_eq!(
            translator.to_player(LeagueIndex::latest()).unwrap(),
            Translation::Exact(player(3))
        );
        assert_eq!(
            translator.to_league(PlayerIndex::latest()).unwrap(),
            Translation::Exact(league(12))
        );
    }

    #[test]
    fn test_latest_on_empty_translator_fails() {
        let translator = IndexTranslator::new();
        assert_eq!(
            translator.to_player(LeagueIndex::latest()).unwrap_err(),
            Error::NoMatchPlayedYet
        );
        assert_eq!(translator.max_league().unwrap_err(), Error::NoMatchPlayedYet);
    }

    #[test]
    fn test_zero_needs_no_lookup() {
        let translator = IndexTranslator::new();
        assert_eq!(
            translator.to_player(league(0)).unwrap(),
            Translation::Exact(PlayerIndex::zero())
        );
    }

    #[test]
    fn test_unregistered_league_tick_is_flagged_not_fatal() {
        let translator = sample();
        assert_eq!(
            translator.to_player(league(7)).unwrap(),
            Translation::Unregistered
        );
    }

    #[test]
    fn test_player_at_or_before_extends_backward() {
        let translator = sample();
        assert_eq!(translator.player_at_or_before(league(7)).unwrap(), player(1));
        assert_eq!(translator.player_at_or_before(league(8)).unwrap(), player(2));
        assert_eq!(translator.player_at_or_before(league(3)).unwrap(), player(0));
        assert_eq!(
            translator.player_at_or_before(LeagueIndex::latest()).unwrap(),
            player(3)
        );
    }
}
