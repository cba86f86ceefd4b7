//! Process-wide default random source.
//!
//! Every stochastic routine in the crate accepts an explicit `&mut R: Rng`.
//! The helpers here back the convenience entry points that do not take one:
//! they share a single lazily created [`StdRng`], seeded from OS entropy until
//! [`seed_global`] is called. Calls that draw from it are ordered by the lock,
//! so callers that need reproducibility across several calls must seed and
//! call in a fixed order.

use std::sync::{Mutex, MutexGuard, OnceLock};

use rand::rngs::StdRng;
use rand::SeedableRng;

static GLOBAL_RNG: OnceLock<Mutex<StdRng>> = OnceLock::new();

fn lock() -> MutexGuard<'static, StdRng> {
    GLOBAL_RNG
        .get_or_init(|| Mutex::new(StdRng::from_entropy()))
        .lock()
        // A panic while holding the lock cannot leave the generator invalid.
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Reseeds the process-wide generator
///
/// # Example
/// ```
/// use finito::random::{seed_global, with_global_rng};
/// use rand::Rng;
///
/// seed_global(7);
/// let a: f64 = with_global_rng(|rng| rng.gen());
/// seed_global(7);
/// let b: f64 = with_global_rng(|rng| rng.gen());
/// assert_eq!(a, b);
/// ```
pub fn seed_global(seed: u64) {
    *lock() = StdRng::seed_from_u64(seed);
    tracing::debug!(seed, "reseeded global random source");
}

/// Lends the process-wide generator to `f`
///
/// The generator stays locked for the duration of `f`; do not call back into
/// this module from inside it.
pub fn with_global_rng<T>(f: impl FnOnce(&mut StdRng) -> T) -> T {
    f(&mut lock())
}
