//! Symbolic Regression of Traffic Counts
//!
//! Fits an expression predicting outbound vehicle counts from inbound
//! counts. Both series are normalised and split 80/20 before the run; the
//! best expression is then checked on the held-out rows and the run's best
//! fitness per generation is appended to a CSV log.

use ci_evo::prelude::*;
use rand::Rng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== Symbolic Regression with GP ===\n");

    let mut config = EvolutionConfig::symbolic_regression().with_seed(42);
    config.generations = 60;
    let mut rng = config.rng();

    // Hourly counts at a junction: outbound roughly tracks inbound with noise
    let inbound: Vec<f64> = (0..48)
        .map(|h| 120.0 + 80.0 * ((h as f64) / 24.0 * std::f64::consts::TAU).sin())
        .collect();
    let outbound: Vec<f64> = inbound
        .iter()
        .map(|x| 0.8 * x + 15.0 + rng.gen_range(-6.0..6.0))
        .collect();

    let dataset = RegressionDataset::prepare(&inbound, &outbound)?;
    println!("Training pairs: {}", dataset.train().len());
    println!("Validation pairs: {}\n", dataset.validation().len());

    let fitted = fit_expression(&config, &dataset, &mut rng)?;

    println!("Fitness progression (min per generation):");
    for stats in fitted.result.statistics.iter().step_by(10) {
        println!("  gen {:3}: min {:.6}  avg {:.6}", stats.generation, stats.min, stats.mean);
    }

    println!("\nBest individual: {}", fitted.expression());
    println!("Best training fitness: {:.6}", fitted.result.best_fitness);
    println!("Tree size: {}, depth: {}", fitted.best().size(), fitted.best().depth());

    let report = fitted.validate(&dataset)?;
    println!("\nValidation RMSE: {:.6}", report.rmse);
    match report.mean_percentage_error {
        Some(pct) => println!("Validation percentage error: {:.2}%", pct),
        None => println!("Validation percentage error: n/a (all actuals zero)"),
    }

    let log = RunLog::new(std::env::temp_dir().join("ci_evo_rmse_results.csv"));
    let run = log.append_statistics(&fitted.result.statistics, LoggedValue::Min)?;
    println!("\nRun {} appended to {}", run, log.path().display());

    Ok(())
}
