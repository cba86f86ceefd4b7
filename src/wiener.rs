//! Generalized Wiener process generation
//!
//! A generalized Wiener (Ito) process with constant coefficients:
//!
//! dX_t = μ dt + σ dW_t
//!
//! discretized with the Euler–Maruyama rule
//!
//! X_i = X_{i-1} + μ Δt + σ √Δt Z_i,  Z_i ~ N(0, 1)
//!
//! where Δt is the step length in seconds.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use rayon::prelude::*;

use crate::error::{FinitoError, Result};
use crate::progress::{LogProgress, Progress, Silent};

const PROGRESS_LABEL: &str = "Generating Wiener process";

/// A one-dimensional Ito process dX_t = a(t, X_t) dt + b(t, X_t) dW_t
pub trait ItoProcess {
    /// Drift coefficient a(t, x)
    fn drift(&self, t: f64, x: f64) -> f64;

    /// Diffusion coefficient b(t, x)
    fn diffusion(&self, t: f64, x: f64) -> f64;

    /// Starting value X_0
    fn initial_state(&self) -> f64;
}

/// Generalized Wiener process with constant drift and diffusion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneralWiener {
    /// Drift per second μ
    pub mu: f64,
    /// Diffusion per √second σ
    pub sigma: f64,
    /// Initial value X_0
    pub x0: f64,
}

impl GeneralWiener {
    /// Creates a new generalized Wiener process
    ///
    /// # Example
    /// ```
    /// use finito::GeneralWiener;
    /// let process = GeneralWiener::new(0.1, 0.3, 100.0);
    /// ```
    pub fn new(mu: f64, sigma: f64, x0: f64) -> Self {
        Self { mu, sigma, x0 }
    }

    /// Generates a path sampled every `step` over `total`
    ///
    /// The path has `floor(total / step)` points and starts at `x0`.
    ///
    /// # Errors
    /// [`FinitoError::InvalidArgument`] if either duration is zero or
    /// `step > total`.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use finito::{progress::Silent, GeneralWiener};
    ///
    /// let process = GeneralWiener::new(0.0, 1.0, 0.0);
    /// let mut rng = rand::thread_rng();
    /// let path = process
    ///     .generate_path(&mut rng, Duration::from_secs(1), Duration::from_secs(60), Silent)
    ///     .unwrap();
    /// assert_eq!(path.len(), 60);
    /// assert_eq!(path[0], 0.0);
    /// ```
    pub fn generate_path<R, P>(
        &self,
        rng: &mut R,
        step: Duration,
        total: Duration,
        progress: P,
    ) -> Result<Vec<f64>>
    where
        R: Rng + ?Sized,
        P: Progress,
    {
        let n_points = point_count(step, total)?;
        Ok(euler_path(self, rng, n_points, step.as_secs_f64(), progress))
    }

    /// Generates `n_paths` independent paths in parallel
    ///
    /// Path `i` is driven by a generator seeded with `seed + i`, so the result
    /// does not depend on the number of worker threads.
    pub fn generate_paths_parallel(
        &self,
        n_paths: usize,
        step: Duration,
        total: Duration,
        seed: u64,
    ) -> Result<Vec<Vec<f64>>> {
        let n_points = point_count(step, total)?;
        let dt = step.as_secs_f64();

        Ok((0..n_paths)
            .into_par_iter()
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
                euler_path(self, &mut rng, n_points, dt, Silent)
            })
            .collect())
    }
}

impl ItoProcess for GeneralWiener {
    fn drift(&self, _t: f64, _x: f64) -> f64 {
        self.mu
    }

    fn diffusion(&self, _t: f64, _x: f64) -> f64 {
        self.sigma
    }

    fn initial_state(&self) -> f64 {
        self.x0
    }
}

/// Options for [`generate_general_wiener`]
#[derive(Debug, Clone, PartialEq)]
pub struct WienerOptions {
    /// Seed of the generator created for the run
    pub seed: u64,
    /// First value of the path
    pub initial_value: f64,
    /// Log progress through `tracing` while generating
    pub show_progress: bool,
}

impl Default for WienerOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            initial_value: 0.0,
            show_progress: true,
        }
    }
}

impl WienerOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_initial_value(mut self, initial_value: f64) -> Self {
        self.initial_value = initial_value;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}

/// Generates a generalized Wiener path from a fixed seed
///
/// The generator is seeded once with `options.seed`, so equal arguments give
/// equal paths. Progress logging does not affect the values.
///
/// # Arguments
/// * `drift` - Drift per second
/// * `diffusion` - Diffusion per √second
/// * `step` - Sampling interval
/// * `total` - Duration of the path
/// * `options` - Seed, initial value and progress switch
///
/// # Example
/// ```
/// use std::time::Duration;
/// use finito::wiener::{generate_general_wiener, WienerOptions};
///
/// let options = WienerOptions::default().with_progress(false);
/// let a = generate_general_wiener(0.1, 0.2, Duration::from_secs(1), Duration::from_secs(30), options.clone()).unwrap();
/// let b = generate_general_wiener(0.1, 0.2, Duration::from_secs(1), Duration::from_secs(30), options).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn generate_general_wiener(
    drift: f64,
    diffusion: f64,
    step: Duration,
    total: Duration,
    options: WienerOptions,
) -> Result<Vec<f64>> {
    let process = GeneralWiener::new(drift, diffusion, options.initial_value);
    let mut rng = StdRng::seed_from_u64(options.seed);

    if options.show_progress {
        process.generate_path(&mut rng, step, total, LogProgress::new())
    } else {
        process.generate_path(&mut rng, step, total, Silent)
    }
}

/// Number of points `floor(total / step)` after validating the durations
fn point_count(step: Duration, total: Duration) -> Result<usize> {
    if step.is_zero() {
        return Err(FinitoError::argument("step size must be positive"));
    }
    if total.is_zero() {
        return Err(FinitoError::argument("total duration must be positive"));
    }
    if step > total {
        return Err(FinitoError::argument(format!(
            "step size {step:?} exceeds total duration {total:?}"
        )));
    }

    usize::try_from(total.as_nanos() / step.as_nanos())
        .map_err(|_| FinitoError::argument("too many points for this platform"))
}

/// Euler–Maruyama path of `n_points` values spaced `dt` seconds apart
fn euler_path<S, R, P>(
    process: &S,
    rng: &mut R,
    n_points: usize,
    dt: f64,
    mut progress: P,
) -> Vec<f64>
where
    S: ItoProcess + ?Sized,
    R: Rng + ?Sized,
    P: Progress,
{
    let sqrt_dt = dt.sqrt();
    let mut path = Vec::with_capacity(n_points);
    if n_points == 0 {
        return path;
    }

    let mut x = process.initial_state();
    path.push(x);

    let steps = n_points - 1;
    progress.begin(PROGRESS_LABEL, steps);
    for i in 1..n_points {
        let t = (i - 1) as f64 * dt;
        let z: f64 = StandardNormal.sample(rng);
        x += process.drift(t, x) * dt + process.diffusion(t, x) * z * sqrt_dt;
        path.push(x);
        progress.advance(i);
    }
    progress.finish();

    path
}

/// Computes the quadratic variation of a path
///
/// For a generalized Wiener process, [X,X]_T ≈ σ² T.
pub fn quadratic_variation(path: &[f64]) -> f64 {
    path.windows(2)
        .map(|w| {
            let diff = w[1] - w[0];
            diff * diff
        })
        .sum()
}
