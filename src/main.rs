//! Command-line front end: generate a random instance and evolve a tour.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use u_tsp_ga::random::create_rng;
use u_tsp_ga::{DistanceMatrix, EvolutionConfig, EvolutionLoop};

#[derive(Parser)]
#[command(version, about = "Evolutionary solver for a random symmetric TSP instance")]
struct Args {
    /// number of cities
    #[arg(long, default_value_t = 10)]
    cities: usize,

    /// minimum distance between two cities
    #[arg(long, default_value_t = 1)]
    min_distance: u64,

    /// maximum distance between two cities
    #[arg(long, default_value_t = 100)]
    max_distance: u64,

    /// population size
    #[arg(long, default_value_t = 50)]
    population: usize,

    /// number of generations
    #[arg(long, default_value_t = 100)]
    iterations: usize,

    /// mutation probability
    #[arg(long, default_value_t = 0.1)]
    mutation_prob: f64,

    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// breed children on all cores (needs the `parallel` feature)
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // One generator drives both the instance and the evolution.
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "seeded generator");
    let mut rng = create_rng(seed);

    let config = EvolutionConfig::default()
        .with_population_size(args.population)
        .with_generations(args.iterations)
        .with_mutation_probability(args.mutation_prob)
        .with_seed(seed)
        .with_parallel(args.parallel);
    config.validate().context("invalid run parameters")?;

    let matrix = DistanceMatrix::random(args.cities, args.min_distance, args.max_distance, &mut rng)
        .context("cannot generate distance matrix")?;

    println!("Generated Distance Matrix:");
    print!("{matrix}");

    let result = EvolutionLoop::new(&matrix, config, rng)?.run()?;

    println!("\nInitial Population:");
    print!("{}", result.initial);

    println!("\nFinal Population:");
    print!("{}", result.final_population);

    println!("\nBest Route:");
    println!("Distance: {}", result.best_cost);
    println!("Route: {:?}", result.best.cities());

    if result.best_ever.cost() < result.best_cost {
        println!(
            "(best seen in any generation: {} via {:?})",
            result.best_ever.cost(),
            result.best_ever.cities()
        );
    }

    Ok(())
}
