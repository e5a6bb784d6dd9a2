use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};

use evodrive::config::Config;
use evodrive::evolution::engine::EvolutionEngine;
use evodrive::simulation::track::RingTrack;
use evodrive::simulation::trainer::Trainer;

/// Evolve driving networks on a headless ring track.
#[derive(Debug, Parser)]
#[command(name = "evodrive", version, about)]
struct Cli {
    /// JSON configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of generations to train.
    #[arg(short, long, default_value_t = 50)]
    generations: u32,

    /// Seed overriding the configured one.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the effective configuration and exit.
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(seed) = cli.seed {
        config.evolution.seed = Some(seed);
    }

    if cli.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    info!(
        "training {} generations of {} networks",
        cli.generations, config.evolution.start_population
    );

    let engine = EvolutionEngine::new(config.evolution)?;
    let track = RingTrack::new(config.track);
    let mut trainer = Trainer::new(engine, track, config.trainer)?;

    let target = trainer.episode().params().target_fitness;
    for _ in 0..cli.generations {
        let summary = trainer.run_generation()?;
        if summary.best >= target {
            info!(
                "generation {} reached the target fitness {target}",
                summary.generation
            );
        }
    }

    match trainer.engine().history().best_ever() {
        Some(best) => info!("best fitness over the run: {best:.3}"),
        None => warn!("no generation was completed"),
    }
    Ok(())
}
