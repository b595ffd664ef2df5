//! Arithmetic Asian bounds engine.
//!
//! No closed form exists for the arithmetic-average payoff under this
//! model, so the engine brackets it:
//!
//! - **Lower bound**: by the AM-GM inequality the arithmetic average of
//!   any path dominates its geometric average, so the arithmetic option
//!   value dominates the geometric one. The lower bound *is* the exact
//!   geometric price, reused from the same enumeration.
//! - **Global upper bound**: a reverse-AM-GM argument with the worst-case
//!   n-step spread gives `rho* = exp[(u~^n - d~^n)^2 / (4 u~^n d~^n)]` and
//!   `V_A <= V_G + r^-n (rho* - 1) E^Q[G_n]`. `rho*` grows
//!   super-exponentially in `n` and the bound legitimately overflows to
//!   `+inf` for large `n`; it is reported as-is, never capped, because a
//!   capped value would misrepresent the mathematics.
//! - **Path-specific upper bound**: most realised paths never approach
//!   the theoretical n-step extreme, so replacing `rho*` with the
//!   per-path spread `rho(w) = exp[(S_max - S_min)^2 / (4 S_min S_max)]`
//!   and taking `V_G + r^-n E^Q[(rho(w) - 1) G(w)]` yields a far tighter,
//!   still-valid bound. The expectation is computed exhaustively when the
//!   path set fits under the sample cap, otherwise estimated from
//!   uniformly drawn path indices with importance weight `2^n / m`.

use impact_core::{BinomialParams, DegeneracyError, EffectiveFactors, PathStats};
use rayon::prelude::*;

use crate::config::SamplingConfig;
use crate::geometric::enumerate_paths;
use crate::paths::{path_probability, walk_path};
use crate::rng::SampleRng;
use crate::warnings::EngineWarning;

/// Sample draws handled by one parallel worker, each with its own
/// deterministically seeded RNG sub-stream.
const SAMPLES_PER_WORKER: u64 = 16_384;

/// Bounds on the arithmetic Asian option value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundsResult {
    /// AM-GM lower bound; numerically identical to the exact geometric
    /// price for the same parameters.
    pub lower_bound: f64,
    /// Closed-form global upper bound. May legitimately be `+inf` for
    /// large step counts.
    pub upper_bound_global: f64,
    /// Tightened per-path-spread upper bound; present only when
    /// requested via a [`SamplingConfig`].
    pub upper_bound_path_specific: Option<f64>,
    /// Worst-case spread parameter `rho*`, always >= 1.
    pub rho_star: f64,
    /// Undiscounted `E^Q[G_n]`.
    pub expected_geometric: f64,
    /// Paths used for the path-specific bound (the full `2^n` when
    /// enumerated exhaustively).
    pub n_paths_sampled: Option<u64>,
    /// Non-fatal conditions encountered.
    pub warnings: Vec<EngineWarning>,
}

/// Worst-case spread parameter over the whole tree.
///
/// `rho* = exp[(u~^n - d~^n)^2 / (4 u~^n d~^n)]`, from the reverse AM-GM
/// inequality applied to the n-step extreme prices. Always >= 1; reaches
/// `+inf` for large `n`, which is the documented fate of the global bound.
///
/// The spread term equals `sinh^2(n/2 * ln(u~/d~))`, and that is the form
/// evaluated here: the ratio of log factors stays finite long after
/// `u~^n` itself has overflowed, so the only possible non-finite outcome
/// is `+inf` -- never the `inf/inf` NaN of the naive quotient.
pub fn rho_star(factors: &EffectiveFactors, n_steps: u32) -> f64 {
    let half_log_spread = 0.5 * n_steps as f64 * (factors.up / factors.down).ln();
    half_log_spread.sinh().powi(2).exp()
}

/// Per-path spread parameter from the realised minimum and maximum.
///
/// Same sinh form as [`rho_star`], on the realised log-price range.
#[inline]
fn path_rho(stats: &PathStats) -> f64 {
    let half_log_spread = 0.5 * (stats.maximum().ln() - stats.minimum().ln());
    half_log_spread.sinh().powi(2).exp()
}

/// One path's contribution to `E^Q[(rho(w) - 1) G(w)]`, probability
/// weighted. Non-negative for every path since `rho(w) >= 1`.
fn spread_term(
    params: &BinomialParams,
    factors: &EffectiveFactors,
    bits: u64,
) -> Result<f64, DegeneracyError> {
    let mut stats = PathStats::new();
    let n_ups = walk_path(params.spot(), bits, params.n_steps(), factors, &mut stats)?;
    let probability = path_probability(factors.prob_up, n_ups, params.n_steps());
    Ok(probability * (path_rho(&stats) - 1.0) * stats.geometric_average())
}

/// Computes `E^Q[(rho(w) - 1) G(w)]` exhaustively over all paths.
fn spread_expectation_exact(
    params: &BinomialParams,
    factors: &EffectiveFactors,
) -> Result<f64, DegeneracyError> {
    (0..params.n_paths())
        .into_par_iter()
        .try_fold(
            || 0.0f64,
            |sum, bits| Ok(sum + spread_term(params, factors, bits)?),
        )
        .try_reduce(|| 0.0, |a, b| Ok(a + b))
}

/// Estimates `E^Q[(rho(w) - 1) G(w)]` from `n_samples` uniformly drawn
/// path indices.
///
/// Uniform draws over `0..2^n` are importance-weighted by `2^n / m` so the
/// estimator is unbiased under the risk-neutral measure. Workers draw from
/// independent sub-streams seeded `seed + worker_index`, so the estimate
/// is reproducible for a fixed seed regardless of thread scheduling.
fn spread_expectation_sampled(
    params: &BinomialParams,
    factors: &EffectiveFactors,
    n_samples: u64,
    seed: u64,
) -> Result<f64, DegeneracyError> {
    let n_paths = params.n_paths();
    let n_workers = n_samples.div_ceil(SAMPLES_PER_WORKER);

    let total: f64 = (0..n_workers)
        .into_par_iter()
        .try_fold(
            || 0.0f64,
            |sum, worker| {
                let first = worker * SAMPLES_PER_WORKER;
                let count = SAMPLES_PER_WORKER.min(n_samples - first);

                let mut rng = SampleRng::for_worker(seed, worker);
                let mut local = 0.0;
                for _ in 0..count {
                    let bits = rng.draw_path(n_paths);
                    local += spread_term(params, factors, bits)?;
                }
                Ok(sum + local)
            },
        )
        .try_reduce(|| 0.0, |a, b| Ok(a + b))?;

    Ok(total * (n_paths as f64 / n_samples as f64))
}

/// Computes the full bounds result.
///
/// `warnings` carries any advisories already raised by the engine layer
/// (path-count checks); sample-size advisories are appended here.
pub(crate) fn compute(
    params: &BinomialParams,
    factors: &EffectiveFactors,
    sampling: Option<&SamplingConfig>,
    mut warnings: Vec<EngineWarning>,
) -> Result<BoundsResult, DegeneracyError> {
    let sums = enumerate_paths(params, factors)?;
    let discount = params.discount();

    let lower_bound = discount * sums.payoff;
    let rho_star = self::rho_star(factors, params.n_steps());
    let upper_bound_global = lower_bound + discount * (rho_star - 1.0) * sums.geometric;

    let mut upper_bound_path_specific = None;
    let mut n_paths_sampled = None;

    if let Some(sampling) = sampling {
        let n_paths = params.n_paths();

        // Exact beats approximate whenever affordable: enumerate the
        // whole path set if it fits under the sample cap.
        let (expectation, n_used) = if n_paths <= sampling.max_samples() {
            (spread_expectation_exact(params, factors)?, n_paths)
        } else {
            let n_samples = sampling.sample_count(n_paths);
            if n_samples < sampling.min_reliable() {
                warnings.push(EngineWarning::SampleSize {
                    n_sampled: n_samples,
                    minimum: sampling.min_reliable(),
                });
            }
            let estimate =
                spread_expectation_sampled(params, factors, n_samples, sampling.seed())?;
            (estimate, n_samples)
        };

        upper_bound_path_specific = Some(lower_bound + discount * expectation);
        n_paths_sampled = Some(n_used);
    }

    Ok(BoundsResult {
        lower_bound,
        upper_bound_global,
        upper_bound_path_specific,
        rho_star,
        expected_geometric: sums.geometric,
        n_paths_sampled,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use impact_core::OptionType;

    fn impact_params(n_steps: u32) -> BinomialParams {
        BinomialParams::builder()
            .spot(100.0)
            .strike(100.0)
            .rate(1.05)
            .up(1.2)
            .down(0.8)
            .lambda(0.1)
            .volume_up(1.0)
            .volume_down(1.0)
            .n_steps(n_steps)
            .option_type(OptionType::Call)
            .build()
            .unwrap()
    }

    fn bounds_of(params: &BinomialParams, sampling: Option<&SamplingConfig>) -> BoundsResult {
        let factors = EffectiveFactors::from_params(params).unwrap();
        compute(params, &factors, sampling, Vec::new()).unwrap()
    }

    #[test]
    fn reference_three_step_bounds() {
        let result = bounds_of(&impact_params(3), None);

        assert_relative_eq!(result.lower_bound, 12.3519, epsilon = 1e-2);
        assert_relative_eq!(result.upper_bound_global, 187.76, epsilon = 1e-2);
        assert_relative_eq!(result.rho_star, 2.94, epsilon = 1e-2);
        assert_relative_eq!(result.expected_geometric, 104.72, epsilon = 1e-2);
        assert!(result.upper_bound_path_specific.is_none());
        assert!(result.n_paths_sampled.is_none());
    }

    #[test]
    fn exhaustive_path_specific_bound_is_ordered() {
        let sampling = SamplingConfig::with_seed(42);
        let result = bounds_of(&impact_params(3), Some(&sampling));

        let path_specific = result.upper_bound_path_specific.unwrap();
        assert!(result.lower_bound <= path_specific);
        assert!(path_specific <= result.upper_bound_global);
        // All 8 paths fit under the cap, so the bound is exact.
        assert_eq!(result.n_paths_sampled, Some(8));
        assert_relative_eq!(path_specific, 23.0079, epsilon = 1e-3);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn path_specific_bound_is_materially_tighter() {
        let sampling = SamplingConfig::with_seed(42);
        let result = bounds_of(&impact_params(10), Some(&sampling));

        let path_specific = result.upper_bound_path_specific.unwrap();
        let global_excess = result.upper_bound_global - result.lower_bound;
        let specific_excess = path_specific - result.lower_bound;
        // The realised-spread bound cuts the slack by well over 90% here.
        assert!(specific_excess < 0.1 * global_excess);
    }

    #[test]
    fn rho_star_is_at_least_one_and_overflows_gracefully() {
        let factors = EffectiveFactors::compute(1.05, 1.2, 0.8, 0.1, 1.0, 1.0).unwrap();

        for n_steps in [1u32, 5, 10] {
            assert!(rho_star(&factors, n_steps) >= 1.0);
        }

        // The global bound is allowed, and expected, to blow up.
        assert_eq!(rho_star(&factors, 2_000), f64::INFINITY);
    }

    #[test]
    fn rho_star_overflows_to_infinity_not_nan() {
        // u~^n alone overflows f64 here (1e16^20 = 1e320); the naive
        // quotient would evaluate inf/inf. The sinh form must land on
        // +inf instead.
        let factors = EffectiveFactors::compute(2.0, 1e16, 0.5, 0.0, 0.0, 0.0).unwrap();
        let rho = rho_star(&factors, 20);
        assert_eq!(rho, f64::INFINITY);
        assert!(!rho.is_nan());
    }

    #[test]
    fn extreme_factors_keep_the_global_bound_infinite_not_nan() {
        // Every path price stays finite (1e-30 * 1e16^k tops out at
        // 1e290), so enumeration succeeds; only the worst-case spread
        // blows up, and it must do so cleanly.
        let params = BinomialParams::builder()
            .spot(1e-30)
            .strike(1.0)
            .rate(2.0)
            .up(1e16)
            .down(0.5)
            .n_steps(20)
            .build()
            .unwrap();

        let result = bounds_of(&params, None);
        assert_eq!(result.rho_star, f64::INFINITY);
        assert_eq!(result.upper_bound_global, f64::INFINITY);
        assert!(result.lower_bound.is_finite());
        assert!(result.expected_geometric.is_finite());
    }

    #[test]
    fn zero_volatility_spread_collapses() {
        // A constant path has max == min, so rho(w) == 1 and the
        // path-specific excess vanishes entirely.
        let mut stats = PathStats::new();
        for _ in 0..4 {
            stats.observe(100.0).unwrap();
        }
        assert_relative_eq!(path_rho(&stats), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn sampled_bound_is_reproducible_per_seed() {
        let params = impact_params(12); // 4096 paths
        let sampling = SamplingConfig::builder()
            .fraction(0.1)
            .max_samples(64)
            .seed(7)
            .build()
            .unwrap();

        let a = bounds_of(&params, Some(&sampling));
        let b = bounds_of(&params, Some(&sampling));
        assert_eq!(
            a.upper_bound_path_specific.unwrap(),
            b.upper_bound_path_specific.unwrap()
        );
        assert_eq!(a.n_paths_sampled, Some(64));

        let other_seed = SamplingConfig::builder()
            .fraction(0.1)
            .max_samples(64)
            .seed(8)
            .build()
            .unwrap();
        let c = bounds_of(&params, Some(&other_seed));
        assert_ne!(
            a.upper_bound_path_specific.unwrap(),
            c.upper_bound_path_specific.unwrap()
        );
    }

    #[test]
    fn small_sample_attaches_a_warning() {
        let params = impact_params(12);
        let sampling = SamplingConfig::builder()
            .fraction(0.01)
            .max_samples(64)
            .seed(7)
            .build()
            .unwrap();

        let result = bounds_of(&params, Some(&sampling));
        assert!(result
            .warnings
            .iter()
            .any(|w| matches!(w, EngineWarning::SampleSize { .. })));

        // Sampled or not, the bound never undercuts the lower bound:
        // every sampled term is non-negative.
        assert!(result.upper_bound_path_specific.unwrap() >= result.lower_bound);
    }
}
