use std::cmp::Ordering;

use log::{debug, info};

use crate::config::ScoringSettings;
use crate::domain::{League, MatchRecord, PlayType};
use crate::errors::Result;
use crate::stats::{LeagueIndex, SeriesName, SeriesValue};

use super::factors::{base_points, is_breaking_in, side_factors};
use super::types::{SideFactors, SidePoints};

/// The ranking pass: consumes the ordered match list of one play type and
/// rewrites every entity's match points and rank, one league tick at a time.
///
/// A pass always starts by wiping the derived series and recomputing from
/// scratch; any error aborts the pass, leaving a known prefix processed.
pub struct ScoreEngine {
    settings: ScoringSettings,
    player_filter: Vec<String>,
}

impl ScoreEngine {
    pub fn new(settings: ScoringSettings) -> Self {
        Self {
            settings,
            player_filter: Vec::new(),
        }
    }

    /// Restricts the per-match debug dump to the named players.
    pub fn set_player_filter(&mut self, filter: Vec<String>) {
        self.player_filter = filter.into_iter().map(|name| name.to_lowercase()).collect();
    }

    /// Recomputes points and ranks up to `last` (league index; `-1` means
    /// everything recorded).
    pub fn compute(
        &self,
        league: &mut League,
        play_type: PlayType,
        last: LeagueIndex,
    ) -> Result<()> {
        let total = league.last_match_index(play_type);
        if total == 0 {
            return Ok(());
        }
        let last = if last.is_latest() || last.value() > total {
            total
        } else {
            last.value()
        };

        info!("computing {play_type} rankings over {last} matches");
        league.reset_derived(play_type)?;

        let records = league.matches(play_type).to_vec();
        for (position, record) in records.iter().enumerate() {
            let current = (position + 1) as i64;
            if current > last {
                break;
            }
            self.process_match(league, play_type, record, current)?;
        }

        if play_type == PlayType::Doubles {
            self.derive_player_doubles_ranks(league, LeagueIndex::new(last)?)?;
        }
        Ok(())
    }

    /// One league tick: factor computation, point writes, rank re-derivation.
    fn process_match(
        &self,
        league: &mut League,
        play_type: PlayType,
        record: &MatchRecord,
        current: i64,
    ) -> Result<()> {
        let prior = LeagueIndex::new(current - 1)?;
        let current_index = LeagueIndex::new(current)?;

        let sides = [record.side_a().to_string(), record.side_b().to_string()];
        let games_won = [record.games_won_a(), record.games_won_b()];
        let total_games = record.total_games();

        let mut prior_played = [0i64; 2];
        let mut averages = [0.0f64; 2];
        for (i, side) in sides.iter().enumerate() {
            prior_played[i] = league.matches_played_as_of(prior, side, play_type)?;
            averages[i] = league
                .entity_stats(side, play_type)?
                .get_average_points_per_match(prior)?;
        }
        let league_average = league.league_average_points_per_match(prior, play_type)?;

        let mut earned = [0.0f64; 2];
        for i in 0..2 {
            let breaking_in = is_breaking_in(prior_played[i], &self.settings);
            let factors = side_factors(
                &self.settings,
                prior.value(),
                breaking_in,
                averages[i],
                averages[1 - i],
                league_average,
            );
            let level_factor = league.level_factor(&sides[i], play_type, prior)?;
            let base = base_points(games_won[i], total_games, &self.settings);
            let points = SidePoints {
                games_won: games_won[i],
                base_points: base,
                level_factor,
                earned_points: base
                    * factors.ranking_factor
                    * factors.diff_ranking_factor
                    * factors.break_in_factor
                    * level_factor,
            };
            earned[i] = points.earned_points;
            self.debug_side(record, current, &sides[i], prior_played[i], &factors, &points);
        }

        for (i, side) in sides.iter().enumerate() {
            league
                .entity_stats_mut(side, play_type)?
                .set_series_value(SeriesName::MatchPoints, SeriesValue::Float(earned[i]), current_index)?;
        }

        // a team's earned points also land in both members' personal doubles
        // history, so per-player doubles standings stay queryable
        if play_type == PlayType::Doubles {
            for (i, side) in sides.iter().enumerate() {
                let (member1, member2) = {
                    let team = league.team(side)?;
                    let (m1, m2) = team.members();
                    (m1.to_string(), m2.to_string())
                };
                for member in [member1, member2] {
                    league.entity_stats_mut(&member, PlayType::Doubles)?.set_series_value(
                        SeriesName::MatchPoints,
                        SeriesValue::Float(earned[i]),
                        current_index,
                    )?;
                }
            }
        }

        self.derive_ranks(league, play_type, current_index)
    }

    /// Re-ranks every entity with at least one match as of `current` by
    /// average points per match played. Identical averages share a rank and
    /// the next distinct average gets the next sequential number.
    fn derive_ranks(
        &self,
        league: &mut League,
        play_type: PlayType,
        current: LeagueIndex,
    ) -> Result<()> {
        let names = league.entity_names(play_type);
        self.assign_ranks(league, play_type, names, current)
    }

    /// Doubles standings per individual player, independent of partner.
    fn derive_player_doubles_ranks(&self, league: &mut League, last: LeagueIndex) -> Result<()> {
        let names = league.player_names();
        self.assign_ranks(league, PlayType::Doubles, names, last)
    }

    fn assign_ranks(
        &self,
        league: &mut League,
        play_type: PlayType,
        names: Vec<String>,
        current: LeagueIndex,
    ) -> Result<()> {
        let mut scored: Vec<(String, f64)> = Vec::with_capacity(names.len());
        for name in names {
            let stats = league.entity_stats(&name, play_type)?;
            if stats.matches_played_as_of(current)? == 0 {
                continue;
            }
            let average = stats.get_average_points_per_match(current)?;
            scored.push((name, average));
        }

        // names arrive sorted; keep that order within equal averages so tie
        // handling is deterministic
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        let mut rank = 0;
        let mut previous: Option<f64> = None;
        for (name, average) in scored {
            if previous != Some(average) {
                rank += 1;
                previous = Some(average);
            }
            league
                .entity_stats_mut(&name, play_type)?
                .set_rank(rank, current)?;
        }
        Ok(())
    }

    fn debug_side(
        &self,
        record: &MatchRecord,
        current: i64,
        side: &str,
        prior_played: i64,
        factors: &SideFactors,
        points: &SidePoints,
    ) {
        if !self.in_filter(side) {
            return;
        }
        debug!("league match {current}: {record}");
        debug!(
            "  {side}: played={prior_played} breaking_in={} rf={:.3} drf={:.3} break_factor={:.3} level={:.3} base={:.3} earned={:.3}",
            factors.breaking_in,
            factors.ranking_factor,
            factors.diff_ranking_factor,
            factors.break_in_factor,
            points.level_factor,
            points.base_points,
            points.earned_points,
        );
    }

    fn in_filter(&self, side: &str) -> bool {
        if self.player_filter.is_empty() {
            return true;
        }
        self.player_filter
            .iter()
            .any(|name| side == name || side.split(" and ").any(|member| member == name))
    }
}
