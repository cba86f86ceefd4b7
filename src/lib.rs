//! # Finito: stochastic modeling utilities
//!
//! Small numerical building blocks for finance-style stochastic models.
//!
//! ## Modules
//!
//! - [`mixture`] - Univariate Gaussian mixture: density, CDF, sampling
//! - [`wiener`] - Generalized Wiener process generation
//! - [`ecdf`] - Empirical cumulative distribution function
//! - [`progress`] - Progress sinks for long-running generators
//! - [`random`] - Process-wide default random source
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```rust
//! use finito::{ecdf::EmpiricalCdf, GaussianMixture};
//!
//! let gmm = GaussianMixture::new([0.0, 5.0], [1.0, 1.0], Some(vec![0.3, 0.7])).unwrap();
//! let samples = gmm.sample(5_000, Some(42)).unwrap();
//!
//! let ecdf = EmpiricalCdf::new(&samples).unwrap();
//! let distance = ecdf.max_deviation(|x| gmm.cdf(x));
//! assert!(distance < 0.05);
//! ```

pub mod ecdf;
pub mod error;
pub mod mixture;
pub mod progress;
pub mod random;
pub mod wiener;

pub use ecdf::{empirical_cdf, EmpiricalCdf};
pub use error::{FinitoError, ParameterError, Result};
pub use mixture::{GaussianMixture, MixtureParameters};
pub use wiener::{generate_general_wiener, GeneralWiener, ItoProcess, WienerOptions};
