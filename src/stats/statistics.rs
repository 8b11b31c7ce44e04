use std::collections::BTreeMap;

use crate::errors::{Error, Result};

use super::index::{LeagueIndex, PlayerIndex, StatIndex};
use super::series::{Series, SeriesName, SeriesValue};
use super::translator::{IndexTranslator, Translation};

/// Temporal statistics for one playing entity (a player or a doubles team)
/// within one play type.
///
/// Every series is keyed by the entity's personal clock; callers may query
/// with either clock and the embedded translator resolves the difference.
/// Match results drive the clock: the Nth `set_match_results` call becomes
/// personal index N, paired with the league index it arrived under.
#[derive(Debug)]
pub struct EntityStatistics {
    translator: IndexTranslator,
    series: BTreeMap<SeriesName, Series>,
    next_player_index: i64,
}

impl EntityStatistics {
    pub fn new(initial_points: f64, initial_level: f64) -> Self {
        let mut series = BTreeMap::new();
        // games won/lost: raw results, exact reads only, never reset
        series.insert(
            SeriesName::GamesWon,
            Series::new(SeriesName::GamesWon, SeriesValue::Integer(0), false, false, false),
        );
        series.insert(
            SeriesName::GamesLost,
            Series::new(SeriesName::GamesLost, SeriesValue::Integer(0), false, false, false),
        );
        // match points: derived, first-write-wins, wiped before a recompute
        series.insert(
            SeriesName::MatchPoints,
            Series::new(
                SeriesName::MatchPoints,
                SeriesValue::Float(initial_points),
                false,
                false,
                true,
            ),
        );
        // rank: derived and re-assigned after every league match
        series.insert(
            SeriesName::Rank,
            Series::new(SeriesName::Rank, SeriesValue::Integer(1), true, true, true),
        );
        // level factor: revisable mid-season, latest value carries forward
        series.insert(
            SeriesName::LevelFactor,
            Series::new(
                SeriesName::LevelFactor,
                SeriesValue::Float(initial_level),
                true,
                true,
                false,
            ),
        );
        Self {
            translator: IndexTranslator::new(),
            series,
            next_player_index: 1,
        }
    }

    /// Total matches recorded for this entity.
    pub fn matches_played(&self) -> i64 {
        self.translator.len() as i64
    }

    /// Matches this entity had played by the time the league clock hit
    /// `league` (the personal count, not the league count).
    pub fn matches_played_as_of(&self, league: LeagueIndex) -> Result<i64> {
        Ok(self.translator.player_at_or_before(league)?.value())
    }

    pub fn has_played_league_index(&self, league: LeagueIndex) -> bool {
        self.translator.contains_league(league)
    }

    /// Pairs an index of either clock with its league-clock twin, if the
    /// tick was registered.
    pub fn to_league(&self, index: impl Into<StatIndex>) -> Result<Translation<LeagueIndex>> {
        self.translator.to_league(index.into())
    }

    /// Records a match result under the given league index and advances the
    /// personal clock. League indices must arrive in strictly increasing
    /// order; re-recording or rewinding fails.
    pub fn set_match_results(
        &mut self,
        games_won: i64,
        games_lost: i64,
        league: LeagueIndex,
    ) -> Result<PlayerIndex> {
        if league.value() < 1 {
            return Err(Error::IndexOutOfRange(league.value()));
        }
        if let Ok(latest) = self.translator.max_league() {
            if league < latest {
                return Err(Error::BackToTheFuture {
                    given: league.value(),
                    latest: latest.value(),
                });
            }
        }
        let player = PlayerIndex::new(self.next_player_index)?.locked();
        self.translator.add(league.locked(), player)?;
        self.series_mut(SeriesName::GamesWon)
            .insert(player.value(), SeriesValue::Integer(games_won))?;
        self.series_mut(SeriesName::GamesLost)
            .insert(player.value(), SeriesValue::Integer(games_lost))?;
        self.next_player_index += 1;
        Ok(player)
    }

    /// Writes a value series sample at the personal index paired with
    /// `league`. The pair must exist, i.e. the match result comes first.
    pub fn set_series_value(
        &mut self,
        name: SeriesName,
        value: SeriesValue,
        league: LeagueIndex,
    ) -> Result<()> {
        let player = match self.translator.to_player(league)? {
            Translation::Exact(player) => player,
            Translation::Unregistered => return Err(Error::NoMatchPlayedYet),
        };
        self.series_mut(name).insert(player.value(), value)
    }

    /// Assigns the rank derived for this entity as of `index`. Unlike value
    /// series, rank is re-derived after every league match, so assignment is
    /// last-write-wins; a league tick the entity sat out lands on its latest
    /// earlier personal index.
    pub fn set_rank(&mut self, rank: i64, index: impl Into<StatIndex>) -> Result<()> {
        if rank < 1 {
            return Err(Error::InvalidRank(rank));
        }
        let player = self.resolve_extend(index.into())?;
        if player.value() == 0 {
            return Err(Error::NoMatchPlayedYet);
        }
        self.series_mut(SeriesName::Rank)
            .insert(player.value(), SeriesValue::Integer(rank))
    }

    /// Revises the level scoring factor, keyed at the current match count.
    /// `match_index` is the league-supplied effective match number and may
    /// not point past the matches actually played.
    pub fn revise_level_factor(&mut self, factor: f64, match_index: i64) -> Result<()> {
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(Error::InvalidLevelFactor(factor));
        }
        let played = self.matches_played();
        if match_index > played {
            return Err(Error::LevelRevisionTooEarly {
                index: match_index,
                played,
            });
        }
        self.series_mut(SeriesName::LevelFactor)
            .insert(played, SeriesValue::Float(factor))
    }

    /// Reads one series sample, applying extend-forward semantics where the
    /// series allows them.
    pub fn get_series_value(
        &self,
        name: SeriesName,
        index: impl Into<StatIndex>,
    ) -> Result<SeriesValue> {
        let index = index.into();
        let series = self.series(name);
        if series.is_extendable() {
            let player = self.resolve_extend(index)?;
            return self.series(name).get(player.value());
        }
        let player = match self.translator.to_player(index)? {
            Translation::Exact(player) => player,
            Translation::Unregistered if self.translator.is_empty() => {
                return Err(Error::NoMatchPlayedYet);
            }
            Translation::Unregistered => {
                return Err(Error::SeriesIndexNotFound {
                    series: name,
                    index: index.value(),
                });
            }
        };
        self.series(name).get(player.value())
    }

    /// Sum of the series up to and including the resolved personal index,
    /// seed included.
    pub fn get_cumulative_sum(
        &self,
        name: SeriesName,
        index: impl Into<StatIndex>,
    ) -> Result<SeriesValue> {
        let player = self.resolve_extend(index.into())?;
        Ok(self.series(name).cumulative(player.value()))
    }

    /// Cumulative match points divided by matches played as of the index.
    /// Zero matches played is a defined case, not an error: the average is 0.
    pub fn get_average_points_per_match(&self, index: impl Into<StatIndex>) -> Result<f64> {
        let player = self.resolve_extend(index.into())?;
        if player.value() == 0 {
            return Ok(0.0);
        }
        let points = self
            .series(SeriesName::MatchPoints)
            .cumulative(player.value())
            .to_f64();
        Ok(points / player.value() as f64)
    }

    pub fn get_level_factor(&self, index: impl Into<StatIndex>) -> Result<f64> {
        Ok(self.get_series_value(SeriesName::LevelFactor, index)?.to_f64())
    }

    pub fn get_rank(&self, index: impl Into<StatIndex>) -> Result<i64> {
        let value = self.get_series_value(SeriesName::Rank, index)?;
        Ok(value.as_integer().unwrap_or(0))
    }

    /// Wipes a derived series (match points or rank) back to its seed before
    /// a recomputation pass.
    pub fn reset_series(&mut self, name: SeriesName) -> Result<()> {
        self.series_mut(name).reset()
    }

    /// Resolution with extend-forward policy: `-1` on an empty history and
    /// league ticks the entity sat out both collapse onto the latest earlier
    /// personal index (or the seed).
    fn resolve_extend(&self, index: StatIndex) -> Result<PlayerIndex> {
        match self.translator.to_player(index) {
            Ok(Translation::Exact(player)) => Ok(player),
            Ok(Translation::Unregistered) => match index {
                StatIndex::League(league) => self.translator.player_at_or_before(league),
                StatIndex::Player(player) => Ok(player),
            },
            Err(Error::NoMatchPlayedYet) => Ok(PlayerIndex::zero()),
            Err(error) => Err(error),
        }
    }

    fn series(&self, name: SeriesName) -> &Series {
        self.series.get(&name).expect("all series are pre-registered")
    }

    fn series_mut(&mut self, name: SeriesName) -> &mut Series {
        self.series.get_mut(&name).expect("all series are pre-registered")
    }
}
