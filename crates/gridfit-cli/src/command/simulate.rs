use std::path::PathBuf;

use anyhow::ensure;
use gridfit_engine::{Action, ClearMode, Dealing, GameConfig, GameState, PieceSeed};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Number of games to play
    #[clap(long, default_value_t = 100)]
    games: usize,
    /// Seed for the whole run (32 hex digits); each game gets a seed derived from it
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Deal pieces uniformly instead of favoring pieces that fit
    #[clap(long)]
    random_dealing: bool,
    /// Stop a game after this many placements
    #[clap(long, default_value_t = 10_000)]
    max_turns: usize,
    /// Output file for the JSON report (stdout if omitted)
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct GameResult {
    seed: PieceSeed,
    score: u32,
    placements: usize,
    cleared_lines: usize,
    best_streak: u32,
    /// `false` if the game hit the turn limit.
    game_over: bool,
}

#[derive(Debug, Clone, Serialize)]
struct SimulationReport {
    games: usize,
    dealing: Dealing,
    mean_score: f64,
    max_score: u32,
    mean_placements: f64,
    best_streak: u32,
    results: Vec<GameResult>,
}

impl SimulationReport {
    #[expect(clippy::cast_precision_loss)]
    fn new(dealing: Dealing, results: Vec<GameResult>) -> Self {
        let games = results.len();
        let mean = |total: f64| if games == 0 { 0.0 } else { total / games as f64 };
        Self {
            games,
            dealing,
            mean_score: mean(results.iter().map(|r| f64::from(r.score)).sum()),
            max_score: results.iter().map(|r| r.score).max().unwrap_or(0),
            mean_placements: mean(results.iter().map(|r| r.placements as f64).sum()),
            best_streak: results.iter().map(|r| r.best_streak).max().unwrap_or(0),
            results,
        }
    }
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        games,
        seed,
        random_dealing,
        max_turns,
        output,
    } = arg;
    ensure!(*games > 0, "--games must be at least 1");

    let dealing = if *random_dealing {
        Dealing::Random
    } else {
        Dealing::Smart
    };
    let mut seeds = match seed {
        Some(seed) => Pcg32::from_seed(seed.to_bytes()),
        None => Pcg32::from_rng(&mut rand::rng()),
    };

    eprintln!("Simulating {games} games...");
    let mut results = Vec::with_capacity(*games);
    for i in 0..*games {
        let result = play_game(dealing, seeds.random(), *max_turns);
        results.push(result);
        if (i + 1) % 10 == 0 {
            eprintln!("Simulated {}/{games} games", i + 1);
        }
    }

    let report = SimulationReport::new(dealing, results);
    eprintln!(
        "Mean score {:.1}, max score {}, best streak {}",
        report.mean_score, report.max_score, report.best_streak
    );
    Output::save_json(&report, output.clone())?;
    Ok(())
}

fn play_game(dealing: Dealing, seed: PieceSeed, max_turns: usize) -> GameResult {
    let mut game = GameState::new(GameConfig {
        dealing,
        clear_mode: ClearMode::Immediate,
        seed: Some(seed),
    });
    for _ in 0..max_turns {
        let Some(action) = choose_placement(&game) else {
            break;
        };
        game.dispatch(action);
    }

    let stats = game.stats();
    GameResult {
        seed,
        score: stats.score(),
        placements: stats.placed_pieces(),
        cleared_lines: stats.cleared_lines(),
        best_streak: stats.best_streak(),
        game_over: game.phase().is_game_over(),
    }
}

/// Greedy policy: most lines cleared, then most cells placed; the first
/// placement in slot and row-major order wins ties.
fn choose_placement(game: &GameState) -> Option<Action> {
    let mut best: Option<((usize, usize), Action)> = None;
    for (slot, piece) in game.tray().remaining() {
        let shape = piece.shape();
        for (row, col) in game.legal_placements(slot) {
            let lines = game
                .grid()
                .place_piece(shape, row, col)
                .find_completed_lines()
                .total();
            let key = (lines, shape.len());
            if best.is_none_or(|(best_key, _)| key > best_key) {
                best = Some((key, Action::PlacePiece { slot, row, col }));
            }
        }
    }
    best.map(|(_, action)| action)
}

#[cfg(test)]
mod tests {
    use gridfit_engine::{Grid, Piece, PieceId, Shape, Tray};

    use super::*;

    fn game(grid: Grid, ids: [&str; 3]) -> GameState {
        let mut n = 0;
        let tray = Tray::new(ids.map(|id| {
            n += 1;
            Piece::new(PieceId(n), Shape::by_id(id).unwrap())
        }));
        let config = GameConfig {
            clear_mode: ClearMode::Immediate,
            seed: Some(PieceSeed::from_bytes([1; 16])),
            ..GameConfig::default()
        };
        GameState::from_position(config, grid, tray)
    }

    #[test]
    fn test_greedy_prefers_clearing_lines() {
        let game = game(
            Grid::from_ascii(
                "
                #####...
                .....#..
                ",
            ),
            ["square3", "line3_h", "dot"],
        );
        assert_eq!(
            choose_placement(&game),
            Some(Action::PlacePiece {
                slot: 1,
                row: 0,
                col: 5
            })
        );
    }

    #[test]
    fn test_greedy_prefers_larger_pieces_without_clear() {
        let game = game(Grid::EMPTY, ["dot", "square3", "square2"]);
        assert_eq!(
            choose_placement(&game),
            Some(Action::PlacePiece {
                slot: 1,
                row: 0,
                col: 0
            })
        );
    }

    #[test]
    fn test_no_placement_when_game_over() {
        let full_but_one = Grid::from_ascii(
            "
            .#######
            #.######
            ##.#####
            ###.####
            ####.###
            #####.##
            ######.#
            #######.
            ",
        );
        let game = game(full_but_one, ["square2", "square2", "square2"]);
        assert!(game.phase().is_game_over());
        assert_eq!(choose_placement(&game), None);
    }

    #[test]
    fn test_seeded_games_are_reproducible() {
        let seed = PieceSeed::from_bytes([9; 16]);
        let a = play_game(Dealing::Smart, seed, 200);
        let b = play_game(Dealing::Smart, seed, 200);
        assert_eq!((a.score, a.placements), (b.score, b.placements));
        assert!(a.placements > 0);
        assert!(a.game_over || a.placements == 200);
    }

    #[test]
    fn test_report_summary() {
        let result = |score, placements, best_streak| GameResult {
            seed: PieceSeed::from_bytes([0; 16]),
            score,
            placements,
            cleared_lines: 0,
            best_streak,
            game_over: true,
        };
        let report = SimulationReport::new(
            Dealing::Smart,
            vec![result(100, 10, 1), result(300, 30, 4)],
        );
        assert_eq!(report.games, 2);
        assert!((report.mean_score - 200.0).abs() < f64::EPSILON);
        assert_eq!(report.max_score, 300);
        assert!((report.mean_placements - 20.0).abs() < f64::EPSILON);
        assert_eq!(report.best_streak, 4);
    }
}
