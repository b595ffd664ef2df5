//! Engine orchestration.
//!
//! [`BinomialEngine`] holds the enumeration policy and coordinates a
//! pricing call: ceiling check, effective-factor computation (fatal on
//! arbitrage), then the path reduction. The engine itself is stateless
//! between calls; two engines with different configurations can run
//! concurrently without interfering.

use impact_core::{BinomialParams, EffectiveFactors};

use crate::bounds::{self, BoundsResult};
use crate::config::{EngineConfig, SamplingConfig};
use crate::error::EngineError;
use crate::geometric::{self, GeometricPrice};
use crate::warnings::EngineWarning;

/// Exhaustive binomial pricing engine.
///
/// # Examples
///
/// ```rust
/// use impact_core::BinomialParams;
/// use impact_pricing::{BinomialEngine, EngineConfig};
///
/// let params = BinomialParams::builder()
///     .spot(100.0)
///     .strike(100.0)
///     .rate(1.05)
///     .up(1.2)
///     .down(0.8)
///     .n_steps(3)
///     .build()
///     .unwrap();
///
/// let engine = BinomialEngine::new(EngineConfig::default());
/// let result = engine.price_geometric(&params).unwrap();
/// assert!(result.price > 0.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct BinomialEngine {
    config: EngineConfig,
}

impl BinomialEngine {
    /// Creates an engine with the given enumeration policy.
    #[inline]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Creates an engine with the default policy (warn above 2^20 paths,
    /// refuse above 2^30, non-strict).
    #[inline]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Returns the engine configuration.
    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Checks the step count against the configured ceilings.
    ///
    /// Above `max_steps` the engine refuses outright. Above `warn_steps`
    /// it either refuses (strict mode) or returns the warning to attach
    /// to the result; the exact path count rides along either way.
    fn check_path_budget(
        &self,
        params: &BinomialParams,
    ) -> Result<Vec<EngineWarning>, EngineError> {
        let n_steps = params.n_steps();

        if n_steps > self.config.max_steps() {
            return Err(EngineError::PathExplosion {
                n_steps,
                n_paths: params.n_paths(),
                limit: self.config.max_steps(),
            });
        }

        if n_steps > self.config.warn_steps() {
            let n_paths = params.n_paths();
            if self.config.strict() {
                return Err(EngineError::PathExplosion {
                    n_steps,
                    n_paths,
                    limit: self.config.warn_steps(),
                });
            }
            return Ok(vec![EngineWarning::PathExplosion { n_steps, n_paths }]);
        }

        Ok(Vec::new())
    }

    /// Prices the geometric Asian option exactly by full enumeration.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Arbitrage`] if the effective factors admit
    ///   arbitrage (checked before any path work)
    /// - [`EngineError::PathExplosion`] above the hard ceiling, or above
    ///   the warning ceiling in strict mode
    /// - [`EngineError::Degeneracy`] on internal invariant violation
    pub fn price_geometric(&self, params: &BinomialParams) -> Result<GeometricPrice, EngineError> {
        let warnings = self.check_path_budget(params)?;
        let factors = EffectiveFactors::from_params(params)?;
        Ok(geometric::price(params, &factors, warnings)?)
    }

    /// Computes arithmetic Asian bounds.
    ///
    /// The lower bound and `E^Q[G_n]` come from the same enumeration as
    /// [`price_geometric`](Self::price_geometric), so the lower bound is
    /// numerically identical to the geometric price — not merely close.
    /// Pass a [`SamplingConfig`] to also compute the tightened
    /// path-specific upper bound.
    ///
    /// # Errors
    ///
    /// Same as [`price_geometric`](Self::price_geometric).
    pub fn arithmetic_bounds(
        &self,
        params: &BinomialParams,
        sampling: Option<&SamplingConfig>,
    ) -> Result<BoundsResult, EngineError> {
        let warnings = self.check_path_budget(params)?;
        let factors = EffectiveFactors::from_params(params)?;
        Ok(bounds::compute(params, &factors, sampling, warnings)?)
    }
}

/// Prices a geometric Asian option with the default engine policy.
///
/// Flat convenience wrapper over [`BinomialEngine::price_geometric`]
/// returning just the price.
///
/// # Errors
///
/// Same as [`BinomialEngine::price_geometric`].
pub fn price_geometric_asian(params: &BinomialParams) -> Result<f64, EngineError> {
    Ok(BinomialEngine::with_defaults()
        .price_geometric(params)?
        .price)
}

/// Computes arithmetic Asian bounds with the default engine policy.
///
/// # Errors
///
/// Same as [`BinomialEngine::arithmetic_bounds`].
pub fn arithmetic_asian_bounds(
    params: &BinomialParams,
    sampling: Option<&SamplingConfig>,
) -> Result<BoundsResult, EngineError> {
    BinomialEngine::with_defaults().arithmetic_bounds(params, sampling)
}
