use anyhow::Result;

use tennis_league_ranking::cli::Command;
use tennis_league_ranking::{handle_games, handle_rank, handle_sample, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Rank(args) => handle_rank(args),
        Command::Games(args) => handle_games(args),
        Command::Sample(args) => handle_sample(args),
    }
}
