//! Univariate Gaussian mixture distribution
//!
//! A mixture of K normal components with means μ_k, variances σ_k² and
//! weights w_k:
//!
//! f(x) = Σ_k w_k φ(x; μ_k, σ_k²)
//!
//! Parameters are validated once at construction and never change afterwards.

use rand::distributions::WeightedIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Dirichlet, Distribution, StandardNormal};
use rayon::prelude::*;
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

use crate::error::{FinitoError, ParameterError, Result};
use crate::random;

/// Absolute tolerance on `|Σ w_k - 1|`
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-8;

/// Snapshot of the parameters of a [`GaussianMixture`]
#[derive(Debug, Clone, PartialEq)]
pub struct MixtureParameters {
    pub means: Vec<f64>,
    pub variances: Vec<f64>,
    pub weights: Vec<f64>,
}

/// Immutable univariate Gaussian mixture model
#[derive(Debug, Clone)]
pub struct GaussianMixture {
    means: Vec<f64>,
    variances: Vec<f64>,
    weights: Vec<f64>,
    /// Per-component laws used for pdf/cdf evaluation
    laws: Vec<Normal>,
    /// Categorical distribution over component indices
    chooser: WeightedIndex<f64>,
}

impl GaussianMixture {
    /// Creates a mixture from its parameters
    ///
    /// When `weights` is `None` a weight vector is drawn uniformly from the
    /// probability simplex (symmetric Dirichlet with concentration 1) using
    /// the process-wide random source.
    ///
    /// # Arguments
    /// * `means` - Component means
    /// * `variances` - Component variances (all > 0)
    /// * `weights` - Component weights (non-negative, summing to 1)
    ///
    /// # Errors
    /// [`FinitoError::InvalidParameters`] naming the violated invariant.
    ///
    /// # Example
    /// ```
    /// use finito::GaussianMixture;
    ///
    /// let gmm = GaussianMixture::new([0.0, 5.0], [1.0, 1.0], Some(vec![0.5, 0.5])).unwrap();
    /// assert!((gmm.pdf(0.0) - 0.19947).abs() < 1e-4);
    /// ```
    pub fn new(
        means: impl Into<Vec<f64>>,
        variances: impl Into<Vec<f64>>,
        weights: Option<Vec<f64>>,
    ) -> Result<Self> {
        let means = means.into();
        let variances = variances.into();
        let weights = match weights {
            Some(weights) => weights,
            None => random::with_global_rng(|rng| simplex_weights(rng, means.len()))?,
        };
        Self::from_parts(means, variances, weights)
    }

    /// Creates a mixture whose weights are drawn from the simplex with `rng`
    pub fn with_random_weights<R: Rng + ?Sized>(
        means: impl Into<Vec<f64>>,
        variances: impl Into<Vec<f64>>,
        rng: &mut R,
    ) -> Result<Self> {
        let means = means.into();
        let weights = simplex_weights(rng, means.len())?;
        Self::from_parts(means, variances.into(), weights)
    }

    fn from_parts(means: Vec<f64>, variances: Vec<f64>, weights: Vec<f64>) -> Result<Self> {
        validate(&means, &variances, &weights)?;

        let laws = means
            .iter()
            .zip(&variances)
            .map(|(&mean, &variance)| {
                Normal::new(mean, variance.sqrt()).map_err(|e| {
                    FinitoError::argument(format!("component law rejected: {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let chooser = WeightedIndex::new(&weights).map_err(|_| {
            ParameterError::WeightsNotNormalized {
                sum: weights.iter().sum(),
            }
        })?;

        tracing::debug!(components = means.len(), "constructed gaussian mixture");

        Ok(Self {
            means,
            variances,
            weights,
            laws,
            chooser,
        })
    }

    /// Number of components K
    pub fn component_count(&self) -> usize {
        self.means.len()
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn variances(&self) -> &[f64] {
        &self.variances
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Returns an owned copy of (means, variances, weights) in component order
    pub fn parameters(&self) -> MixtureParameters {
        MixtureParameters {
            means: self.means.clone(),
            variances: self.variances.clone(),
            weights: self.weights.clone(),
        }
    }

    /// Mixture density at `x`
    pub fn pdf(&self, x: f64) -> f64 {
        self.weights
            .iter()
            .zip(&self.laws)
            .map(|(w, law)| w * law.pdf(x))
            .sum()
    }

    /// Mixture cumulative probability at `x`
    pub fn cdf(&self, x: f64) -> f64 {
        self.weights
            .iter()
            .zip(&self.laws)
            .map(|(w, law)| w * law.cdf(x))
            .sum()
    }

    /// Element-wise [`pdf`](Self::pdf), evaluated in parallel
    pub fn pdf_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.par_iter().map(|&x| self.pdf(x)).collect()
    }

    /// Element-wise [`cdf`](Self::cdf), evaluated in parallel
    pub fn cdf_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.par_iter().map(|&x| self.cdf(x)).collect()
    }

    /// Theoretical mean Σ w_k μ_k
    pub fn mean(&self) -> f64 {
        self.weights.iter().zip(&self.means).map(|(w, m)| w * m).sum()
    }

    /// Theoretical variance Σ w_k (σ_k² + μ_k²) - mean²
    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        let second_moment: f64 = self
            .weights
            .iter()
            .zip(self.means.iter().zip(&self.variances))
            .map(|(w, (m, v))| w * (v + m * m))
            .sum();
        second_moment - mean * mean
    }

    /// Draws `count` independent samples using `rng`
    ///
    /// Each sample picks a component k with probability w_k and then draws
    /// from N(μ_k, σ_k²); both draws come from `rng`.
    pub fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<f64> {
        (0..count)
            .map(|_| {
                let k = self.chooser.sample(rng);
                let z: f64 = StandardNormal.sample(rng);
                self.means[k] + self.variances[k].sqrt() * z
            })
            .collect()
    }

    /// Draws `count` samples, optionally reproducible
    ///
    /// With `random_seed` set, a fresh generator seeded with it drives both the
    /// component choice and the normal draw. Without it the process-wide
    /// source is used.
    ///
    /// # Errors
    /// [`FinitoError::InvalidArgument`] if `count` is negative.
    ///
    /// # Example
    /// ```
    /// use finito::GaussianMixture;
    ///
    /// let gmm = GaussianMixture::new([0.0, 5.0], [1.0, 1.0], Some(vec![0.5, 0.5])).unwrap();
    /// let a = gmm.sample(100, Some(3)).unwrap();
    /// let b = gmm.sample(100, Some(3)).unwrap();
    /// assert_eq!(a, b);
    /// assert!(gmm.sample(-1, None).is_err());
    /// ```
    pub fn sample(&self, count: i64, random_seed: Option<u64>) -> Result<Vec<f64>> {
        let count = usize::try_from(count).map_err(|_| {
            FinitoError::argument(format!("sample count must be non-negative, got {count}"))
        })?;

        Ok(match random_seed {
            Some(seed) => self.sample_with(&mut StdRng::seed_from_u64(seed), count),
            None => random::with_global_rng(|rng| self.sample_with(rng, count)),
        })
    }
}

/// Draws a uniformly random point of the (k-1)-simplex
fn simplex_weights<R: Rng + ?Sized>(rng: &mut R, k: usize) -> Result<Vec<f64>> {
    let weights = match k {
        // Nothing to draw; validation reports the empty mixture.
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let dirichlet = Dirichlet::new_with_size(1.0, k)
                .map_err(|e| FinitoError::argument(format!("dirichlet: {e}")))?;
            dirichlet.sample(rng)
        }
    };
    tracing::debug!(components = k, "generated random mixture weights");
    Ok(weights)
}

fn validate(
    means: &[f64],
    variances: &[f64],
    weights: &[f64],
) -> std::result::Result<(), ParameterError> {
    if means.len() != variances.len() || means.len() != weights.len() {
        return Err(ParameterError::ShapeMismatch {
            means: means.len(),
            variances: variances.len(),
            weights: weights.len(),
        });
    }
    if means.is_empty() {
        return Err(ParameterError::NoComponents);
    }
    if let Some((index, &value)) = means.iter().enumerate().find(|(_, m)| !m.is_finite()) {
        return Err(ParameterError::NonFiniteMean { index, value });
    }
    // `!(v > 0)` also rejects NaN
    if let Some((index, &value)) = variances
        .iter()
        .enumerate()
        .find(|&(_, &v)| !(v > 0.0 && v.is_finite()))
    {
        return Err(ParameterError::NonPositiveVariance { index, value });
    }
    if let Some((index, &value)) = weights.iter().enumerate().find(|&(_, &w)| !(w >= 0.0)) {
        return Err(ParameterError::NegativeWeight { index, value });
    }
    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(ParameterError::WeightsNotNormalized { sum });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn two_peaks() -> GaussianMixture {
        GaussianMixture::new([0.0, 5.0], [1.0, 1.0], Some(vec![0.5, 0.5])).unwrap()
    }

    fn invalid(
        means: Vec<f64>,
        variances: Vec<f64>,
        weights: Option<Vec<f64>>,
    ) -> ParameterError {
        match GaussianMixture::new(means, variances, weights) {
            Err(FinitoError::InvalidParameters(e)) => e,
            other => panic!("expected InvalidParameters, got {:?}", other),
        }
    }

    #[test]
    fn test_pdf_is_weighted_sum_of_components() {
        let gmm = two_peaks();
        let phi =
            |x: f64, m: f64| (-(x - m).powi(2) / 2.0).exp() / (2.0 * std::f64::consts::PI).sqrt();

        assert!((gmm.pdf(0.0) - 0.19947).abs() < 1e-4, "pdf(0) = {}", gmm.pdf(0.0));
        for &x in &[-2.0, 0.0, 1.3, 2.5, 5.0, 9.0] {
            let expected = 0.5 * phi(x, 0.0) + 0.5 * phi(x, 5.0);
            assert!(
                (gmm.pdf(x) - expected).abs() < 1e-12,
                "pdf({}) = {}, expected {}",
                x,
                gmm.pdf(x),
                expected
            );
        }
    }

    #[test]
    fn test_pdf_integrates_to_one() {
        let gmm = GaussianMixture::new(
            [-3.0, 0.5, 4.0],
            [0.25, 2.0, 1.5],
            Some(vec![0.2, 0.5, 0.3]),
        )
        .unwrap();

        // Trapezoid rule on [-40, 40]
        let n = 80_000;
        let h = 80.0 / n as f64;
        let xs: Vec<f64> = (0..=n).map(|i| -40.0 + i as f64 * h).collect();
        let ys = gmm.pdf_many(&xs);
        let integral = h * (ys.iter().sum::<f64>() - 0.5 * (ys[0] + ys[n]));

        assert!((integral - 1.0).abs() < 1e-6, "integral = {}", integral);
    }

    #[test]
    fn test_cdf_limits() {
        let gmm = two_peaks();
        assert!(gmm.cdf(-1e3) < 1e-12);
        assert!((gmm.cdf(1e3) - 1.0).abs() < 1e-12);
        // Symmetric around 2.5
        assert!((gmm.cdf(2.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_batch_matches_scalar() {
        let gmm = two_peaks();
        let xs = [3.0, -1.0, 0.0, 7.5, 2.5];
        let pdfs = gmm.pdf_many(&xs);
        let cdfs = gmm.cdf_many(&xs);

        for (i, &x) in xs.iter().enumerate() {
            assert_eq!(pdfs[i], gmm.pdf(x));
            assert_eq!(cdfs[i], gmm.cdf(x));
        }
        assert!(gmm.pdf_many(&[]).is_empty());
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let err = invalid(vec![0.0, 1.0], vec![1.0, 1.0, 1.0], Some(vec![0.5, 0.5]));
        assert_eq!(
            err,
            ParameterError::ShapeMismatch {
                means: 2,
                variances: 3,
                weights: 2
            }
        );

        let err = invalid(vec![0.0, 1.0], vec![1.0, 1.0, 1.0], None);
        assert!(matches!(err, ParameterError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_non_positive_variance_rejected() {
        let err = invalid(vec![0.0, 1.0], vec![1.0, 0.0], Some(vec![0.5, 0.5]));
        assert_eq!(err, ParameterError::NonPositiveVariance { index: 1, value: 0.0 });

        let err = invalid(vec![0.0, 1.0], vec![-1.0, 1.0], Some(vec![0.5, 0.5]));
        assert_eq!(err, ParameterError::NonPositiveVariance { index: 0, value: -1.0 });
    }

    #[test]
    fn test_bad_weights_rejected() {
        let err = invalid(vec![0.0, 1.0], vec![1.0, 1.0], Some(vec![0.5, 0.4]));
        assert!(
            matches!(err, ParameterError::WeightsNotNormalized { sum } if (sum - 0.9).abs() < 1e-12)
        );

        let err = invalid(vec![0.0, 1.0], vec![1.0, 1.0], Some(vec![1.2, -0.2]));
        assert!(matches!(err, ParameterError::NegativeWeight { index: 1, .. }));
    }

    #[test]
    fn test_empty_and_non_finite_rejected() {
        assert_eq!(invalid(vec![], vec![], Some(vec![])), ParameterError::NoComponents);
        assert_eq!(invalid(vec![], vec![], None), ParameterError::NoComponents);

        let err = invalid(vec![f64::NAN], vec![1.0], Some(vec![1.0]));
        assert!(matches!(err, ParameterError::NonFiniteMean { index: 0, .. }));
    }

    #[test]
    fn test_random_weights_on_simplex() {
        let mut rng = StdRng::seed_from_u64(11);
        for k in 1..6 {
            let means: Vec<f64> = (0..k).map(|i| i as f64).collect();
            let gmm = GaussianMixture::with_random_weights(means, vec![1.0; k], &mut rng).unwrap();

            assert_eq!(gmm.component_count(), k);
            assert!(gmm.weights().iter().all(|&w| w >= 0.0));
            assert!((gmm.weights().iter().sum::<f64>() - 1.0).abs() < 1e-12);
        }

        let gmm = GaussianMixture::new([1.0, 2.0, 3.0], [1.0, 1.0, 1.0], None).unwrap();
        assert_eq!(gmm.weights().len(), 3);
    }

    #[test]
    fn test_parameters_are_a_copy() {
        let gmm = two_peaks();
        let mut params = gmm.parameters();
        params.means[0] = 100.0;
        params.weights.clear();

        assert_eq!(gmm.means(), &[0.0, 5.0]);
        assert_eq!(gmm.parameters().weights, vec![0.5, 0.5]);
        assert_eq!(gmm.parameters().variances, vec![1.0, 1.0]);
    }

    #[test]
    fn test_sample_moments() {
        let gmm = two_peaks();
        let samples = gmm.sample(10_000, Some(42)).unwrap();
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);

        assert_eq!(samples.len(), 10_000);
        assert!((gmm.mean() - 2.5).abs() < 1e-12);
        assert!((gmm.variance() - 7.25).abs() < 1e-12);
        assert!((mean - gmm.mean()).abs() < 0.15, "sample mean = {}", mean);
        assert!((var - gmm.variance()).abs() < 0.5, "sample variance = {}", var);
    }

    #[test]
    fn test_sample_count_edges() {
        let gmm = two_peaks();
        assert!(gmm.sample(0, None).unwrap().is_empty());
        assert!(matches!(
            gmm.sample(-1, None),
            Err(FinitoError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_degenerate_weight_never_sampled() {
        let gmm = GaussianMixture::new([0.0, 1000.0], [1.0, 1.0], Some(vec![1.0, 0.0])).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let samples = gmm.sample_with(&mut rng, 2000);
        assert!(samples.iter().all(|x| x.abs() < 100.0));
    }

    proptest! {
        #[test]
        fn prop_cdf_non_decreasing(
            mean in -10.0f64..10.0,
            var in 0.01f64..10.0,
            w in 0.0f64..=1.0,
            a in -50.0f64..50.0,
            b in -50.0f64..50.0,
        ) {
            let gmm = GaussianMixture::new(
                vec![mean, -mean],
                vec![var, 1.0],
                Some(vec![w, 1.0 - w]),
            ).unwrap();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(gmm.cdf(lo) <= gmm.cdf(hi) + 1e-15);
            prop_assert!((0.0..=1.0 + 1e-12).contains(&gmm.cdf(lo)));
            prop_assert!(gmm.pdf(lo) >= 0.0);
        }
    }
}
