//! Example usage of the finito library
//!
//! Run with: RUST_LOG=info cargo run --release

use std::time::Duration;

use finito::{
    ecdf::{empirical_cdf, EmpiricalCdf},
    wiener::{generate_general_wiener, quadratic_variation, WienerOptions},
    GaussianMixture,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> finito::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("=== Stochastic Modeling Utilities ===\n");

    example_mixture()?;
    example_wiener()?;
    example_empirical_cdf()?;

    Ok(())
}

fn example_mixture() -> finito::Result<()> {
    println!("--- Gaussian Mixture ---");

    let gmm = GaussianMixture::new(
        [-0.02, 0.01],   // Crash and calm regime means
        [0.0009, 0.0001], // Regime variances
        Some(vec![0.1, 0.9]),
    )?;

    println!("Components: {}", gmm.component_count());
    println!("Mixture mean: {:.5}", gmm.mean());
    println!("Mixture volatility: {:.5}", gmm.variance().sqrt());

    for x in [-0.05, -0.02, 0.0, 0.01, 0.03] {
        println!("  x = {:+.2}: pdf = {:8.3}, cdf = {:.4}", x, gmm.pdf(x), gmm.cdf(x));
    }

    let samples = gmm.sample(10_000, Some(7))?;
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    println!("Sample mean of 10000 draws: {:.5}", mean);

    let random_weights = GaussianMixture::new([0.0, 1.0, 2.0], [1.0, 1.0, 1.0], None)?;
    println!("Random simplex weights: {:.3?}", random_weights.weights());
    println!();

    Ok(())
}

fn example_wiener() -> finito::Result<()> {
    println!("--- Generalized Wiener Process ---");

    let step = Duration::from_secs(60);
    let total = Duration::from_secs(60 * 60 * 24);
    let path = generate_general_wiener(1e-5, 1e-3, step, total, WienerOptions::default())?;

    let t_end = (path.len() - 1) as f64 * step.as_secs_f64();
    println!("Points: {} (one per minute over a day)", path.len());
    println!("Final value X_T = {:.4}", path.last().copied().unwrap_or_default());
    println!(
        "Quadratic variation [X,X]_T = {:.4} (expected ≈ {:.4})",
        quadratic_variation(&path),
        1e-6 * t_end
    );
    println!();

    Ok(())
}

fn example_empirical_cdf() -> finito::Result<()> {
    println!("--- Empirical CDF ---");

    let gmm = GaussianMixture::new([0.0, 5.0], [1.0, 1.0], Some(vec![0.5, 0.5]))?;
    let samples = gmm.sample(2_000, Some(1))?;
    let ecdf = EmpiricalCdf::new(&samples)?;

    let points = [-1.0, 2.5, 6.0];
    let estimated = empirical_cdf(&samples, Some(&points[..]))?;
    for (x, p) in points.iter().zip(&estimated) {
        println!("  F_N({:+.1}) = {:.4}, F({:+.1}) = {:.4}", x, p, x, gmm.cdf(*x));
    }
    println!(
        "Kolmogorov-Smirnov distance: {:.4}",
        ecdf.max_deviation(|x| gmm.cdf(x))
    );

    Ok(())
}
