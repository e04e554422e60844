use clap::Parser;
use env_logger::Env;

use maze_pathfinder::batch_simulation::BatchSimulation;
use maze_pathfinder::config::Config;
use maze_pathfinder::simulation::{Simulation, SimulationError};

// Setup logging output
fn init_logging(config: &Config) {
    let default_level = if config.verbose { "info" } else { "warn" };
    let env = Env::default()
        .filter_or("MAZE_LOG", default_level)
        .write_style_or("MAZE_LOG_STYLE", "auto");
    env_logger::init_from_env(env);
}

fn run(config: Config) -> Result<(), SimulationError> {
    if config.batch_mode {
        let quiet = config.quiet;
        let mut batch_sim = BatchSimulation::new(config);
        batch_sim.run()?;
        if !quiet {
            batch_sim.print_summary();
        }
        return Ok(());
    }

    let simulation = Simulation::new(config.clone())?;
    if let Some(path) = &config.save {
        simulation.grid().save(path)?;
        if !config.quiet {
            println!("Maze saved to {}", path.display());
        }
    }

    if !config.quiet {
        println!(
            "Maze: {}x{}",
            simulation.grid().rows(),
            simulation.grid().cols()
        );
        if config.animate {
            println!("Visualization enabled with {}ms delay", config.delay_ms);
            println!("Press Ctrl+C to stop the simulation");
        }
    }

    match config.algorithm.strategy() {
        Some(strategy) => {
            simulation.run_single(strategy);
        }
        None => {
            simulation.run_comparison();
        }
    }
    Ok(())
}

fn main() {
    let config = Config::parse();
    init_logging(&config);

    if let Err(e) = run(config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
