use crate::algorithms::{search, SearchResult, Strategy};
use crate::config::Config;
use crate::generator::GeneratorKind;
use crate::grid::{Grid, GridError, Overlay};
use crate::runner::SearchRunner;
use crate::statistics::{compare, optimal_path_len, ComparisonReport};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Maze used when neither a file nor a generator is given.
pub const DEFAULT_MAZE: &str = "\
###############
#S............#
#.###.#####.#.#
#.#.#.....#.#.#
#.#.#####.#.#.#
#.#.......#.#.#
#.###########.#
#.............#
#.#########.###
#.#.......#...#
#.#.#####.###.#
#.#.#...#.....#
#.#.#.#.#####.#
#.....#.....#G#
###############";

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("failed to write results: {0}")]
    Io(#[from] std::io::Error),

    #[error("maze needs both a start (S) and a goal (G)")]
    MissingEndpoints,
}

/// Seeded when a seed is given, otherwise from OS entropy.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

pub struct Simulation {
    config: Config,
    grid: Grid,
}

impl Simulation {
    /// Builds the maze the config asks for: a file, a generator, or
    /// [`DEFAULT_MAZE`].
    pub fn new(config: Config) -> Result<Self, SimulationError> {
        let grid = if let Some(path) = &config.maze {
            info!("loading maze from {}", path.display());
            Grid::load(path)?
        } else if let Some(choice) = config.generator {
            let kind = GeneratorKind::from(choice);
            let mut rng = seeded_rng(config.seed);
            kind.generate(config.rows, config.cols, config.wall_density, &mut rng)?
        } else {
            Grid::parse(DEFAULT_MAZE)?
        };
        Self::with_grid(config, grid)
    }

    pub fn with_grid(config: Config, grid: Grid) -> Result<Self, SimulationError> {
        if grid.endpoints().is_none() {
            return Err(SimulationError::MissingEndpoints);
        }
        Ok(Simulation { config, grid })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Runs one strategy to completion and prints the outcome. With
    /// `--animate` the search is first replayed step by step on the terminal.
    pub fn run_single(&self, strategy: Strategy) -> SearchResult {
        if self.config.animate {
            self.animate(strategy);
        }

        let result = search(strategy, &self.grid);
        if self.config.quiet {
            return result;
        }

        println!("\n=== {} RESULTS ===", strategy.name().to_uppercase());
        match &result.path {
            Some(path) => {
                println!("Path found: {} cells, {} moves", path.len(), path.len() - 1);
                if let Some(optimal) = optimal_path_len(&self.grid) {
                    println!("Shortest possible: {} cells", optimal);
                }
            }
            None => println!("No path from start to goal"),
        }
        println!("Nodes explored: {}", result.explored_count);
        println!("Search time: {:.2?}", result.elapsed);
        println!();
        print!(
            "{}",
            self.grid.render(Overlay {
                explored: Some(&result.explored),
                path: result.path.as_deref(),
                current: None,
            })
        );
        result
    }

    /// Runs every strategy `--runs` times on this maze and prints the ranking.
    pub fn run_comparison(&self) -> ComparisonReport {
        let report = compare(&self.grid, self.config.runs);
        if self.config.quiet {
            return report;
        }

        println!("\n=== ALGORITHM COMPARISON RESULTS ===");
        println!();
        print!("{}", report);
        println!();
        if let Some(fastest) = report.fastest() {
            println!(
                "Fastest: {} ({:.2?} avg)",
                fastest.strategy, fastest.mean_elapsed
            );
        }
        if let Some(fewest) = report.fewest_explored() {
            println!(
                "Fewest nodes explored: {} ({:.1} avg)",
                fewest.strategy, fewest.mean_explored
            );
        }
        report
    }

    fn animate(&self, strategy: Strategy) {
        let delay = Duration::from_millis(self.config.delay_ms);
        for (step, snapshot) in SearchRunner::new(strategy, &self.grid).enumerate() {
            self.clear_screen();
            println!("=== PATHFINDING VISUALIZATION ===");
            println!(
                "Algorithm: {} | Step: {} | Explored: {}",
                strategy,
                step + 1,
                snapshot.explored.len()
            );
            match (snapshot.goal_reached, snapshot.current) {
                (true, _) => println!("Goal reached!"),
                (false, Some(current)) => println!("Current node: {}", current),
                (false, None) => println!("Frontier exhausted, goal unreachable"),
            }
            print!(
                "{}",
                self.grid.render(Overlay {
                    explored: Some(&snapshot.explored),
                    path: snapshot.path.as_deref(),
                    current: snapshot.current,
                })
            );
            thread::sleep(delay);
        }
    }

    fn clear_screen(&self) {
        print!("\x1B[2J\x1B[1;1H");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Position;
    use clap::Parser;

    fn quiet_config(extra: &[&str]) -> Config {
        let mut args = vec!["maze_pathfinder", "--quiet"];
        args.extend_from_slice(extra);
        Config::parse_from(args)
    }

    #[test]
    fn default_maze_is_used_without_file_or_generator() {
        let sim = Simulation::new(quiet_config(&[])).unwrap();
        let grid = sim.grid();

        assert_eq!((grid.rows(), grid.cols()), (15, 15));
        assert_eq!(grid.start(), Some(Position::new(1, 1)));
        assert_eq!(grid.goal(), Some(Position::new(13, 13)));
    }

    #[test]
    fn default_maze_is_solved_optimally() {
        let sim = Simulation::new(quiet_config(&[])).unwrap();
        let bfs = sim.run_single(Strategy::Bfs);
        let a_star = sim.run_single(Strategy::AStar);

        assert!(bfs.found());
        assert_eq!(bfs.path_len(), optimal_path_len(sim.grid()));
        assert_eq!(a_star.path_len(), bfs.path_len());
    }

    #[test]
    fn seeded_generator_is_reproducible() {
        let args = ["--generator", "backtracking", "--rows", "13", "--cols", "17", "--seed", "11"];
        let a = Simulation::new(quiet_config(&args)).unwrap();
        let b = Simulation::new(quiet_config(&args)).unwrap();

        assert_eq!(a.grid(), b.grid());
        assert_eq!((a.grid().rows(), a.grid().cols()), (13, 17));
    }

    #[test]
    fn comparison_covers_all_strategies() {
        let sim = Simulation::new(quiet_config(&["--runs", "2"])).unwrap();
        let report = sim.run_comparison();

        assert_eq!(report.runs, 2);
        assert_eq!(report.stats.len(), Strategy::ALL.len());
        assert!(report.stats.iter().all(|s| s.found()));
    }

    #[test]
    fn rejects_maze_without_goal() {
        let grid = Grid::parse("S..\n.#.").unwrap();
        assert!(matches!(
            Simulation::with_grid(quiet_config(&[]), grid),
            Err(SimulationError::MissingEndpoints)
        ));
    }

    #[test]
    fn reports_generator_errors() {
        let result = Simulation::new(quiet_config(&["--generator", "empty", "--rows", "3"]));
        assert!(matches!(
            result,
            Err(SimulationError::Grid(GridError::TooSmall { rows: 3, .. }))
        ));
    }
}
