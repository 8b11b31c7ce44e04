pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod scoring;
pub mod services;
pub mod stats;

use anyhow::{bail, Context, Result};
use clap::Parser;

use crate::cli::{Cli, Command, GamesArgs, RankArgs, SampleArgs};
use crate::domain::{League, PlayType};
use crate::scoring::ScoreEngine;
use crate::services::{print_match_list, print_standings, CsvImporter, StatsReporter};
use crate::stats::LeagueIndex;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_rank(args: &RankArgs) -> Result<()> {
    if args.scoring.league_break_in_score_factor > 0.5 {
        bail!("league break in score factor --lbsf can't be set above 0.5");
    }
    let play_type = play_type_for(args.doubles);
    let as_of = league_index(args.match_index)?;

    let mut league = import_league(&args.csv)?;
    let mut engine = ScoreEngine::new(args.scoring.to_settings());
    engine.set_player_filter(args.player_filter.clone());
    engine.compute(&mut league, play_type, as_of)?;

    let reporter = StatsReporter::new(&league, args.player_filter.clone());
    let mut reports = vec![reporter.standings(
        play_type,
        as_of,
        &format!("{play_type} stats"),
    )?];
    if play_type == PlayType::Doubles {
        reports.push(
            reporter.doubles_standings_per_player(as_of, "doubles stats per singles player")?,
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_standings(report);
            println!();
        }
    }
    Ok(())
}

pub fn handle_games(args: &GamesArgs) -> Result<()> {
    let play_type = play_type_for(args.doubles);
    let league = import_league(&args.csv)?;
    let reporter = StatsReporter::new(&league, args.player_filter.clone());
    let records = reporter.match_list(play_type, league_index(args.match_index)?)?;
    print_match_list(&records);
    Ok(())
}

pub fn handle_sample(args: &SampleArgs) -> Result<()> {
    print!("{}", services::generate_sample_csv(args.seed));
    Ok(())
}

fn import_league(csv: &str) -> Result<League> {
    let mut league = League::new();
    CsvImporter::new().import_file(csv, &mut league)?;
    Ok(league)
}

fn play_type_for(doubles: bool) -> PlayType {
    if doubles {
        PlayType::Doubles
    } else {
        PlayType::Singles
    }
}

fn league_index(value: i64) -> Result<LeagueIndex> {
    LeagueIndex::new(value).context("invalid league match index")
}
