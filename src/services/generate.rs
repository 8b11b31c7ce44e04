use std::fmt::Write as _;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SAMPLE_PLAYERS: [&str; 6] = ["math", "andrew", "ben", "jessica", "anika", "carolina"];
const SAMPLE_MATCHES: usize = 50;
const SAMPLE_LEVEL_CHANGES: usize = 4;

/// Emits a seeded sample results file in the importer's format, handy for
/// demos and for exercising the full pipeline. The same seed always yields
/// the same file.
pub fn generate_sample_csv(seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = String::new();

    out.push_str("New Player, name, level scoring factor, initial points\n");
    for name in SAMPLE_PLAYERS {
        let level: f64 = rng.random_range(0.7..0.9);
        let initial_points: f64 = rng.random_range(5.0..15.0);
        let _ = writeln!(out, "NEW_PLAYER,{name},{level:.3},{initial_points:.3}");
    }

    out.push_str("Singles games, player 1, games won, player 2, games won\n");
    for _ in 0..SAMPLE_MATCHES {
        let (player1, player2) = pick_two(&mut rng);
        let won1 = rng.random_range(0..=8);
        let won2 = rng.random_range(0..=8);
        let _ = writeln!(out, "SINGLES_GAME,{player1},{won1},{player2},{won2}");
    }

    out.push_str("Doubles games, player 1, player 2, games won, player 3, player 4, games won\n");
    for _ in 0..SAMPLE_MATCHES {
        let picks = pick_four(&mut rng);
        let won_a = rng.random_range(0..=8);
        let won_b = rng.random_range(0..=8);
        let _ = writeln!(
            out,
            "DOUBLES_GAME,{},{},{won_a},{},{},{won_b}",
            picks[0], picks[1], picks[2], picks[3]
        );
    }

    out.push_str("New player level, name, league match index to take effect, new level\n");
    for _ in 0..SAMPLE_LEVEL_CHANGES {
        let name = SAMPLE_PLAYERS[rng.random_range(0..SAMPLE_PLAYERS.len())];
        let index = rng.random_range(1..=5);
        let level: f64 = rng.random_range(0.4..1.0);
        let _ = writeln!(out, "NEW_SINGLES_LEVEL,{name},{index},{level:.3}");
    }

    out.push_str("New team level, name 1, name 2, league match index to take effect, new level\n");
    for _ in 0..SAMPLE_LEVEL_CHANGES {
        let picks = pick_four(&mut rng);
        let index = rng.random_range(1..=3);
        let level: f64 = rng.random_range(0.4..1.0);
        let _ = writeln!(out, "NEW_TEAM_LEVEL,{},{},{index},{level:.3}", picks[0], picks[1]);
    }

    out
}

fn pick_two(rng: &mut StdRng) -> (&'static str, &'static str) {
    let picks = pick_distinct(rng, 2);
    (picks[0], picks[1])
}

fn pick_four(rng: &mut StdRng) -> Vec<&'static str> {
    pick_distinct(rng, 4)
}

fn pick_distinct(rng: &mut StdRng, count: usize) -> Vec<&'static str> {
    let mut pool: Vec<&'static str> = SAMPLE_PLAYERS.to_vec();
    let mut picks = Vec::with_capacity(count);
    for _ in 0..count {
        let position = rng.random_range(0..pool.len());
        picks.push(pool.swap_remove(position));
    }
    picks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{League, PlayType};
    use crate::services::import::CsvImporter;

    #[test]
    fn test_sample_is_deterministic_per_seed() {
        assert_eq!(generate_sample_csv(7), generate_sample_csv(7));
        assert_ne!(generate_sample_csv(7), generate_sample_csv(8));
    }

    #[test]
    fn test_sample_imports_cleanly() {
        let text = generate_sample_csv(42);
        let mut league = League::new();
        CsvImporter::new().import_str(&text, &mut league).unwrap();
        assert_eq!(
            league.last_match_index(PlayType::Singles),
            SAMPLE_MATCHES as i64
        );
        assert_eq!(
            league.last_match_index(PlayType::Doubles),
            SAMPLE_MATCHES as i64
        );
    }
}
