//! Hill-climbing search for the interpolation curve exponent.
//!
//! Plain local search: start from an initial exponent, perturb it by a
//! uniformly random factor in [0.9, 1.1], and keep the proposal only when the
//! objective strictly improves. A fixed iteration budget, no convergence
//! check. Every random draw flows through the caller's generator so runs are
//! reproducible under a fixed seed.

use rand::Rng;
use rand::rngs::StdRng;

/// Default starting exponent (linear interpolation).
pub const DEFAULT_INITIAL_EXPONENT: f64 = 1.0;

/// Default iteration budget.
pub const DEFAULT_ITERATIONS: usize = 100;

/// Run the search and return the (possibly unchanged) exponent.
///
/// `baseline_score` is the score of the unmodified dataset; a proposal is
/// accepted only when `score_fn(candidate)` is strictly greater than the
/// current score. When `score_fn` does not depend on its argument the search
/// never moves and the initial exponent comes back untouched.
pub fn hill_climb<F>(
    initial: f64,
    iterations: usize,
    rng: &mut StdRng,
    baseline_score: f64,
    mut score_fn: F,
) -> f64
where
    F: FnMut(f64) -> f64,
{
    let mut current = initial;
    let mut current_score = baseline_score;

    for _ in 0..iterations {
        let candidate = current * rng.gen_range(0.9..1.1);
        let candidate_score = score_fn(candidate);
        if candidate_score > current_score {
            current = candidate;
            current_score = candidate_score;
        }
    }

    current
}
