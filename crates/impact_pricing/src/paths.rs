//! Path enumeration and trajectory evaluation.
//!
//! A path is a `u64` bit pattern: bit `i` is the move at step `i`, with
//! 1 = up. The full path set is simply the index range `0..2^n`, which
//! gives a fixed canonical enumeration order for reproducible summation
//! and parallel-chunking for free. Paths are walked, never stored: each
//! evaluation streams prices into a [`PathStats`] accumulator in O(n)
//! time and O(1) space.

use impact_core::{DegeneracyError, EffectiveFactors, PathStats};

/// Walks one trajectory and folds its `n + 1` prices into `stats`.
///
/// Starts from `spot` (included in the average) and multiplies by the
/// effective up or down factor at each step, reading moves from the low
/// `n_steps` bits of `bits`. The incremental product is preferred over
/// `S0 * u^a * d^b` at every step: one multiply per step instead of two
/// exponentiations.
///
/// Returns the number of up moves, which determines the path probability.
///
/// # Errors
///
/// Propagates [`DegeneracyError`] from the accumulator if an intermediate
/// price degenerates (unreachable for valid factors).
pub fn walk_path(
    spot: f64,
    bits: u64,
    n_steps: u32,
    factors: &EffectiveFactors,
    stats: &mut PathStats,
) -> Result<u32, DegeneracyError> {
    let mut price = spot;
    stats.observe(price)?;

    let mut n_ups = 0u32;
    for step in 0..n_steps {
        if (bits >> step) & 1 == 1 {
            price *= factors.up;
            n_ups += 1;
        } else {
            price *= factors.down;
        }
        stats.observe(price)?;
    }

    Ok(n_ups)
}

/// Risk-neutral probability of a path with `n_ups` up moves out of
/// `n_steps`: `p^n_ups * (1 - p)^(n_steps - n_ups)`.
#[inline]
pub fn path_probability(prob_up: f64, n_ups: u32, n_steps: u32) -> f64 {
    prob_up.powi(n_ups as i32) * (1.0 - prob_up).powi((n_steps - n_ups) as i32)
}
