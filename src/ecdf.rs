//! Empirical cumulative distribution function
//!
//! F_N(x) = #{ i : data_i ≤ x } / N
//!
//! The data are sorted once; each evaluation is a binary search.

use rayon::prelude::*;

use crate::error::{FinitoError, Result};

/// Empirical CDF built from a sample
#[derive(Debug, Clone, PartialEq)]
pub struct EmpiricalCdf {
    sorted: Vec<f64>,
}

impl EmpiricalCdf {
    /// Builds the estimator from `data`
    ///
    /// # Errors
    /// [`FinitoError::InvalidArgument`] if `data` is empty or contains NaN.
    pub fn new(data: &[f64]) -> Result<Self> {
        if data.is_empty() {
            return Err(FinitoError::argument("data must not be empty"));
        }
        if let Some(index) = data.iter().position(|x| x.is_nan()) {
            return Err(FinitoError::argument(format!(
                "data contains NaN at index {index}"
            )));
        }

        let mut sorted = data.to_vec();
        sorted.sort_by(f64::total_cmp);
        Ok(Self { sorted })
    }

    /// Sample size N
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    /// Always false; construction rejects empty data
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Fraction of the sample that is ≤ `x`
    pub fn evaluate(&self, x: f64) -> f64 {
        let count = self.sorted.partition_point(|&v| v <= x);
        count as f64 / self.sorted.len() as f64
    }

    /// Evaluates every point, keeping the order of `points`
    pub fn evaluate_many(&self, points: &[f64]) -> Vec<f64> {
        points.par_iter().map(|&x| self.evaluate(x)).collect()
    }

    /// Kolmogorov–Smirnov distance sup_x |F_N(x) - F(x)| to a reference CDF
    ///
    /// The supremum is attained at a sample point, just before or at a jump.
    pub fn max_deviation<F>(&self, cdf: F) -> f64
    where
        F: Fn(f64) -> f64,
    {
        let n = self.sorted.len() as f64;
        self.sorted
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let reference = cdf(x);
                let below = (reference - i as f64 / n).abs();
                let at = ((i + 1) as f64 / n - reference).abs();
                below.max(at)
            })
            .fold(0.0, f64::max)
    }
}

/// Estimates the empirical CDF of `data` at `points` (or at `data` itself)
///
/// The returned probabilities are sorted in ascending order, so they line up
/// with `points` only when `points` is itself sorted. Use
/// [`EmpiricalCdf::evaluate_many`] for positionally aligned results.
///
/// # Errors
/// [`FinitoError::InvalidArgument`] if `data` is empty or contains NaN.
///
/// # Example
/// ```
/// use finito::ecdf::empirical_cdf;
///
/// let probs = empirical_cdf(&[1.0, 2.0, 3.0, 4.0, 5.0], None).unwrap();
/// assert_eq!(probs, vec![0.2, 0.4, 0.6, 0.8, 1.0]);
/// ```
pub fn empirical_cdf(data: &[f64], points: Option<&[f64]>) -> Result<Vec<f64>> {
    let ecdf = EmpiricalCdf::new(data)?;
    let mut probs = ecdf.evaluate_many(points.unwrap_or(data));
    probs.sort_by(f64::total_cmp);
    Ok(probs)
}
