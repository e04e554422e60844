use crate::algorithms::Strategy;
use crate::config::Config;
use crate::generator::GeneratorKind;
use crate::simulation::{seeded_rng, SimulationError};
use crate::statistics::{compare, ComparisonReport};
use log::{debug, info};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::time::{Duration, Instant};

const CSV_HEADER: &str = "maze_id,generator,rows,cols,algorithm,found,path_length,optimal_path_length,route_efficiency,mean_explored,mean_elapsed_ns";

#[derive(Debug, Clone)]
pub struct BatchResult {
    pub maze_id: usize,
    pub generator: &'static str,
    pub rows: usize,
    pub cols: usize,
    pub strategy: Strategy,
    pub found: bool,
    pub path_length: usize,
    pub optimal_path_length: Option<usize>,
    pub route_efficiency: Option<f64>,
    pub mean_explored: f64,
    pub mean_elapsed: Duration,
}

impl BatchResult {
    fn csv_row(&self) -> String {
        let optional = |v: Option<String>| v.unwrap_or_default();
        format!(
            "{},{},{},{},{},{},{},{},{},{:.1},{}",
            self.maze_id,
            self.generator,
            self.rows,
            self.cols,
            self.strategy.name(),
            self.found,
            self.path_length,
            optional(self.optimal_path_length.map(|len| len.to_string())),
            optional(self.route_efficiency.map(|e| format!("{:.6}", e))),
            self.mean_explored,
            self.mean_elapsed.as_nanos()
        )
    }
}

/// Running totals for one strategy across the whole sweep.
#[derive(Debug, Clone)]
pub struct StrategySummary {
    pub strategy: Strategy,
    pub mazes: usize,
    pub solved: usize,
    total_path_length: usize,
    total_efficiency: f64,
    total_explored: f64,
    total_elapsed: Duration,
}

impl StrategySummary {
    fn new(strategy: Strategy) -> Self {
        StrategySummary {
            strategy,
            mazes: 0,
            solved: 0,
            total_path_length: 0,
            total_efficiency: 0.0,
            total_explored: 0.0,
            total_elapsed: Duration::ZERO,
        }
    }

    fn record(&mut self, result: &BatchResult) {
        self.mazes += 1;
        self.total_explored += result.mean_explored;
        self.total_elapsed += result.mean_elapsed;
        if result.found {
            self.solved += 1;
            self.total_path_length += result.path_length;
            self.total_efficiency += result.route_efficiency.unwrap_or(1.0);
        }
    }

    pub fn average_path_length(&self) -> Option<f64> {
        (self.solved > 0).then(|| self.total_path_length as f64 / self.solved as f64)
    }

    pub fn average_efficiency(&self) -> Option<f64> {
        (self.solved > 0).then(|| self.total_efficiency / self.solved as f64)
    }

    pub fn average_explored(&self) -> f64 {
        if self.mazes == 0 {
            0.0
        } else {
            self.total_explored / self.mazes as f64
        }
    }

    pub fn average_elapsed(&self) -> Duration {
        if self.mazes == 0 {
            Duration::ZERO
        } else {
            self.total_elapsed / self.mazes as u32
        }
    }
}

/// Sweeps maze sizes, comparing every strategy on freshly generated mazes and
/// appending one CSV row per strategy per maze.
pub struct BatchSimulation {
    config: Config,
    results: Vec<BatchResult>,
    summaries: Vec<StrategySummary>,
    start_time: Instant,
    batch_size: usize,
    total_results_written: usize,
    mazes_generated: usize,
}

impl BatchSimulation {
    pub fn new(config: Config) -> Self {
        BatchSimulation {
            config,
            results: Vec::new(),
            summaries: Strategy::ALL.into_iter().map(StrategySummary::new).collect(),
            start_time: Instant::now(),
            batch_size: 100,
            total_results_written: 0,
            mazes_generated: 0,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn sizes(&self) -> Vec<usize> {
        (self.config.min_size..=self.config.max_size)
            .step_by(self.config.size_step.max(1))
            .collect()
    }

    pub fn summaries(&self) -> &[StrategySummary] {
        &self.summaries
    }

    pub fn results_written(&self) -> usize {
        self.total_results_written
    }

    pub fn run(&mut self) -> Result<(), SimulationError> {
        let kind = self
            .config
            .generator
            .map_or(GeneratorKind::Backtracking, GeneratorKind::from);
        let seed = self.config.seed.unwrap_or_else(rand::random);
        let mut rng = seeded_rng(Some(seed));
        let sizes = self.sizes();

        self.initialize_csv_file()?;
        if !self.config.quiet {
            println!("=== BATCH SIMULATION STARTED ===");
            println!("Generator: {}", kind.name());
            println!("Sizes: {:?}", sizes);
            println!("Mazes per size: {}", self.config.num_mazes);
            println!("Runs per algorithm: {}", self.config.runs.max(1));
            println!("Seed: {} (for reproducibility)", seed);
            println!("Output file: {}", self.config.output_file.display());
            println!();
        }
        info!("batch sweep over sizes {:?} with seed {}", sizes, seed);

        for (index, &size) in sizes.iter().enumerate() {
            if !self.config.quiet {
                println!(
                    "Size {}/{}: {}x{}, {} maze(s)",
                    index + 1,
                    sizes.len(),
                    size,
                    size,
                    self.config.num_mazes
                );
            }
            for _ in 0..self.config.num_mazes {
                let grid = kind.generate(size, size, self.config.wall_density, &mut rng)?;
                let report = compare(&grid, self.config.runs);
                self.record(kind, &report);
                self.mazes_generated += 1;

                if self.results.len() >= self.batch_size {
                    self.flush_results_to_csv()?;
                }
            }
        }

        self.flush_results_to_csv()?;

        if !self.config.quiet {
            println!("\n=== BATCH SIMULATION COMPLETED ===");
            println!("Mazes generated: {}", self.mazes_generated);
            println!("Rows written: {}", self.total_results_written);
            println!("Results saved to: {}", self.config.output_file.display());
            println!("Total time: {:.2?}", self.start_time.elapsed());
        } else {
            println!(
                "Batch simulation completed: {} rows in {:.1}s -> {}",
                self.total_results_written,
                self.start_time.elapsed().as_secs_f64(),
                self.config.output_file.display()
            );
        }
        Ok(())
    }

    fn record(&mut self, kind: GeneratorKind, report: &ComparisonReport) {
        let maze_id = self.mazes_generated;
        for stats in &report.stats {
            let result = BatchResult {
                maze_id,
                generator: kind.name(),
                rows: report.rows,
                cols: report.cols,
                strategy: stats.strategy,
                found: stats.found(),
                path_length: stats.path_len(),
                optimal_path_length: report.optimal_path_len,
                route_efficiency: stats.route_efficiency(report.optimal_path_len),
                mean_explored: stats.mean_explored,
                mean_elapsed: stats.mean_elapsed,
            };
            if let Some(summary) = self
                .summaries
                .iter_mut()
                .find(|s| s.strategy == result.strategy)
            {
                summary.record(&result);
            }
            self.results.push(result);
        }
    }

    fn flush_results_to_csv(&mut self) -> Result<(), SimulationError> {
        if self.results.is_empty() {
            return Ok(());
        }

        let file = OpenOptions::new()
            .append(true)
            .open(&self.config.output_file)?;
        let mut out = BufWriter::new(file);
        for result in &self.results {
            writeln!(out, "{}", result.csv_row())?;
        }
        out.flush()?;

        self.total_results_written += self.results.len();
        debug!(
            "flushed {} rows to CSV (total: {})",
            self.results.len(),
            self.total_results_written
        );
        self.results.clear();
        Ok(())
    }

    fn initialize_csv_file(&self) -> Result<(), SimulationError> {
        let mut file = File::create(&self.config.output_file)?;
        writeln!(file, "{}", CSV_HEADER)?;
        debug!("initialized CSV file {}", self.config.output_file.display());
        Ok(())
    }

    pub fn print_summary(&self) {
        if self.summaries.iter().all(|s| s.mazes == 0) {
            println!("No results to summarize.");
            return;
        }

        println!("\n=== BATCH SIMULATION SUMMARY ===");
        for summary in &self.summaries {
            println!("\n{} results:", summary.strategy);
            let success_rate = summary.solved as f64 / summary.mazes as f64 * 100.0;
            println!(
                "  Solved: {}/{} ({:.1}%)",
                summary.solved, summary.mazes, success_rate
            );
            println!("  Average nodes explored: {:.1}", summary.average_explored());
            println!("  Average search time: {:.2?}", summary.average_elapsed());
            if let Some(length) = summary.average_path_length() {
                println!("  Average path length: {:.1}", length);
            }
            if let Some(efficiency) = summary.average_efficiency() {
                println!("  Average route efficiency: {:.3}", efficiency);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}-{}.csv", name, std::process::id()))
    }

    fn batch_config(output: &PathBuf, extra: &[&str]) -> Config {
        let mut args = vec![
            "maze_pathfinder".to_string(),
            "--batch-mode".to_string(),
            "--quiet".to_string(),
            "--output-file".to_string(),
            output.display().to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        Config::parse_from(args)
    }

    #[test]
    fn writes_one_row_per_strategy_per_maze() {
        let output = scratch_file("batch-rows");
        let config = batch_config(
            &output,
            &[
                "--min-size", "7", "--max-size", "11", "--size-step", "2",
                "--num-mazes", "2", "--runs", "1", "--seed", "5",
            ],
        );
        let mut batch = BatchSimulation::new(config).with_batch_size(4);
        assert_eq!(batch.sizes(), vec![7, 9, 11]);
        batch.run().unwrap();

        let csv = fs::read_to_string(&output).unwrap();
        fs::remove_file(&output).ok();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines.len(), 1 + 3 * 2 * Strategy::ALL.len());
        assert_eq!(batch.results_written(), lines.len() - 1);
        for line in &lines[1..] {
            let fields: Vec<&str> = line.split(',').collect();
            assert_eq!(fields.len(), 11, "{}", line);
            assert_eq!(fields[1], "backtracking");
            // perfect mazes always connect start and goal
            assert_eq!(fields[5], "true");
        }
        assert!(lines[1].starts_with("0,backtracking,7,7,"));

        for summary in batch.summaries() {
            assert_eq!(summary.mazes, 6);
            assert_eq!(summary.solved, 6);
        }
        let bfs = &batch.summaries()[0];
        assert_eq!(bfs.strategy, Strategy::Bfs);
        assert_eq!(bfs.average_efficiency(), Some(1.0));
    }

    #[test]
    fn unsolvable_mazes_leave_blank_efficiency() {
        let output = scratch_file("batch-blank");
        let config = batch_config(
            &output,
            &[
                "--generator", "random", "--wall-density", "1.0",
                "--min-size", "5", "--max-size", "5", "--num-mazes", "1", "--runs", "1",
            ],
        );
        let mut batch = BatchSimulation::new(config);
        batch.run().unwrap();

        let csv = fs::read_to_string(&output).unwrap();
        fs::remove_file(&output).ok();
        for line in csv.lines().skip(1) {
            let fields: Vec<&str> = line.split(',').collect();
            assert_eq!(fields[5], "false");
            assert_eq!(fields[7], "");
            assert_eq!(fields[8], "");
        }
        assert!(batch.summaries().iter().all(|s| s.average_path_length().is_none()));
    }

    #[test]
    fn too_small_sizes_fail() {
        let output = scratch_file("batch-small");
        let config = batch_config(&output, &["--min-size", "3", "--max-size", "3", "--num-mazes", "1"]);
        let result = BatchSimulation::new(config).run();
        fs::remove_file(&output).ok();

        assert!(matches!(result, Err(SimulationError::Grid(_))));
    }
}
