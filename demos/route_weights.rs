//! Route Weight Optimisation
//!
//! Evolves the four weights that blend travel time, traffic delay,
//! distance and route complexity into one score, then explains how each
//! candidate route scores under the chosen weights and the user's
//! preferences.
//!
//! Run with `RUST_LOG=debug` to see per-generation statistics.

use ci_evo::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== Route Weight Optimisation ===\n");

    let config = EvolutionConfig::route_weights().with_seed(42);
    let routes = RouteDataset::new(vec![
        RouteMetrics::new(34.5, 6.2, 31.8, RouteKind::Fastest),
        RouteMetrics::new(39.0, 8.9, 27.4, RouteKind::Shortest),
        RouteMetrics::new(42.3, 3.1, 29.9, RouteKind::Eco),
    ])?;
    let preferences = UserPreferences {
        environmental_impact: 70.0,
        ..UserPreferences::default()
    };

    println!("Candidate routes: {}", routes.len());
    println!(
        "Population {}, {} generations, cxpb {}, mutpb {}\n",
        config.population_size,
        config.generations,
        config.crossover_probability,
        config.mutation_probability
    );

    let result = optimize_route_weights(
        &config,
        routes.clone(),
        preferences.score_adjustment(),
        &mut config.rng(),
    )?;

    println!("Fitness trend (best of each generation):");
    for stats in result.statistics.iter().step_by(5) {
        println!("  gen {:3}: max {:.4}  mean {:.4}", stats.generation, stats.max, stats.mean);
    }

    let weights = result.best_genome.genes();
    println!("\nBest weights:");
    for (name, w) in ["time", "traffic", "distance", "complexity"].iter().zip(weights) {
        println!("  {:<10} {:.4}", name, w);
    }
    println!("Aggregate score: {:.4}", result.best_fitness);
    println!("Evaluations: {}\n", result.evaluations);

    println!("Route assessment:");
    for assessment in assess_routes(weights, &routes, &preferences) {
        println!("  [{}] score {:.4}", assessment.kind.label(), assessment.score);
        println!("    {}", assessment.feedback);
    }

    Ok(())
}
