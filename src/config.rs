use crate::algorithms::Strategy;
use crate::generator::GeneratorKind;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmChoice {
    Bfs,
    Dfs,
    DfsOptimized,
    AStar,
    Bidirectional,
    All,
}

impl AlgorithmChoice {
    /// The single strategy to run, or `None` for `all`.
    pub fn strategy(self) -> Option<Strategy> {
        match self {
            AlgorithmChoice::Bfs => Some(Strategy::Bfs),
            AlgorithmChoice::Dfs => Some(Strategy::Dfs),
            AlgorithmChoice::DfsOptimized => Some(Strategy::DfsOptimized),
            AlgorithmChoice::AStar => Some(Strategy::AStar),
            AlgorithmChoice::Bidirectional => Some(Strategy::Bidirectional),
            AlgorithmChoice::All => None,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorChoice {
    Random,
    Backtracking,
    Empty,
}

impl From<GeneratorChoice> for GeneratorKind {
    fn from(choice: GeneratorChoice) -> Self {
        match choice {
            GeneratorChoice::Random => GeneratorKind::Random,
            GeneratorChoice::Backtracking => GeneratorKind::Backtracking,
            GeneratorChoice::Empty => GeneratorKind::Empty,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Maze text file to load instead of generating one
    #[arg(long, conflicts_with = "generator")]
    pub maze: Option<PathBuf>,

    /// Generate a maze instead of using the built-in one
    #[arg(long, value_enum)]
    pub generator: Option<GeneratorChoice>,

    #[arg(long, default_value_t = 15)]
    pub rows: usize,

    #[arg(long, default_value_t = 15)]
    pub cols: usize,

    /// Chance of an interior wall for the random generator
    #[arg(long, default_value_t = 0.3)]
    pub wall_density: f64,

    /// RNG seed for generated mazes; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = AlgorithmChoice::AStar)]
    pub algorithm: AlgorithmChoice,

    /// Runs per algorithm when comparing
    #[arg(long, default_value_t = 3)]
    pub runs: usize,

    /// Step through the search on the terminal
    #[arg(long, default_value_t = false)]
    pub animate: bool,

    #[arg(long, default_value_t = 50)]
    pub delay_ms: u64,

    #[arg(long, default_value_t = false)]
    pub batch_mode: bool,

    #[arg(long, default_value_t = 11)]
    pub min_size: usize,

    #[arg(long, default_value_t = 51)]
    pub max_size: usize,

    #[arg(long, default_value_t = 10)]
    pub size_step: usize,

    /// Mazes generated per size in batch mode
    #[arg(long, default_value_t = 5)]
    pub num_mazes: usize,

    #[arg(long, default_value = "batch_results.csv")]
    pub output_file: PathBuf,

    /// Write the maze in use to this file
    #[arg(long)]
    pub save: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,

    #[arg(long, default_value_t = false)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::parse_from(["maze_pathfinder"]);
        assert_eq!(config.algorithm, AlgorithmChoice::AStar);
        assert_eq!((config.rows, config.cols), (15, 15));
        assert_eq!(config.runs, 3);
        assert!(config.maze.is_none());
        assert!(config.generator.is_none());
        assert!(!config.batch_mode);
    }

    #[test]
    fn parses_algorithm_and_generator() {
        let config = Config::parse_from([
            "maze_pathfinder",
            "--algorithm",
            "dfs-optimized",
            "--generator",
            "backtracking",
            "--seed",
            "9",
        ]);
        assert_eq!(config.algorithm.strategy(), Some(Strategy::DfsOptimized));
        assert_eq!(
            config.generator.map(GeneratorKind::from),
            Some(GeneratorKind::Backtracking)
        );
        assert_eq!(config.seed, Some(9));

        let all = Config::parse_from(["maze_pathfinder", "--algorithm", "all"]);
        assert_eq!(all.algorithm.strategy(), None);
    }

    #[test]
    fn maze_file_excludes_generator() {
        let parsed = Config::try_parse_from([
            "maze_pathfinder",
            "--maze",
            "maze.txt",
            "--generator",
            "random",
        ]);
        assert!(parsed.is_err());
    }
}
