//! Exact geometric Asian pricer.
//!
//! The geometric-average payoff admits an exact price under the discrete
//! model: enumerate every one of the `2^n` paths, weight each payoff by
//! its risk-neutral probability, sum, and discount by `r^-n`. The only
//! error in the result is floating-point summation; there is no sampling
//! noise.
//!
//! The enumeration also accumulates `E^Q[G_n]`, the undiscounted expected
//! geometric average, as a by-product. The bounds engine needs it and it
//! costs nothing extra to carry through the same reduction.
//!
//! The per-path work is independent, so the reduction runs on rayon with
//! per-worker partial sums combined by plain addition. Parallel summation
//! order varies with scheduling, which perturbs only the last few bits of
//! the result; callers must not expect bit-identical output across
//! different thread counts.

use impact_core::{BinomialParams, DegeneracyError, EffectiveFactors, PathStats};
use rayon::prelude::*;

use crate::paths::{path_probability, walk_path};
use crate::warnings::EngineWarning;

/// Exact geometric Asian pricing result.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeometricPrice {
    /// Discounted risk-neutral expectation of the geometric-average
    /// payoff; the exact price under the discrete model.
    pub price: f64,
    /// Undiscounted `E^Q[G_n]`, the expected geometric average.
    pub expected_geometric: f64,
    /// Number of paths enumerated, always `2^n`.
    pub n_paths: u64,
    /// Non-fatal conditions encountered (path-count advisories).
    pub warnings: Vec<EngineWarning>,
}

/// Probability-weighted sums accumulated over the full path set.
///
/// Both sums are undiscounted; discounting is applied once at the end.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct PathSums {
    /// `sum over paths of p(path) * payoff(G(path))`.
    pub payoff: f64,
    /// `sum over paths of p(path) * G(path)`.
    pub geometric: f64,
}

/// Enumerates the full path set and reduces the probability-weighted
/// payoff and geometric-average sums in parallel.
pub(crate) fn enumerate_paths(
    params: &BinomialParams,
    factors: &EffectiveFactors,
) -> Result<PathSums, DegeneracyError> {
    let spot = params.spot();
    let strike = params.strike();
    let n_steps = params.n_steps();
    let option_type = params.option_type();
    let prob_up = factors.prob_up;

    (0..params.n_paths())
        .into_par_iter()
        .try_fold(PathSums::default, |mut sums, bits| {
            let mut stats = PathStats::new();
            let n_ups = walk_path(spot, bits, n_steps, factors, &mut stats)?;

            let average = stats.geometric_average();
            let probability = path_probability(prob_up, n_ups, n_steps);

            sums.payoff += probability * option_type.intrinsic(average, strike);
            sums.geometric += probability * average;
            Ok(sums)
        })
        .try_reduce(PathSums::default, |a, b| {
            Ok(PathSums {
                payoff: a.payoff + b.payoff,
                geometric: a.geometric + b.geometric,
            })
        })
}

/// Prices the geometric Asian option exactly.
///
/// Ceiling checks live in the engine layer; this function assumes the
/// caller has already decided the enumeration is affordable.
pub(crate) fn price(
    params: &BinomialParams,
    factors: &EffectiveFactors,
    warnings: Vec<EngineWarning>,
) -> Result<GeometricPrice, DegeneracyError> {
    let sums = enumerate_paths(params, factors)?;

    Ok(GeometricPrice {
        price: params.discount() * sums.payoff,
        expected_geometric: sums.geometric,
        n_paths: params.n_paths(),
        warnings,
    })
}
