//! Effective up/down factors under price impact.
//!
//! The hedger's own trading widens the binomial factors asymmetrically:
//!
//! - `u_tilde = u * exp(lambda * v_u)`
//! - `d_tilde = d * exp(-lambda * v_d)`
//! - `p = (r - d_tilde) / (u_tilde - d_tilde)`
//!
//! `p` is a valid probability exactly when `d_tilde < r < u_tilde`
//! (strictly); anything else admits arbitrage and is rejected before any
//! pricing work starts.

use crate::error::FactorError;
use crate::params::BinomialParams;

/// Price-impact-adjusted factors and the risk-neutral probability.
///
/// Derived, never stored: computed once per pricing call from
/// [`BinomialParams`] and cheap enough to recompute at will. The same
/// inputs always produce bit-identical output.
///
/// # Examples
///
/// ```rust
/// use impact_core::EffectiveFactors;
///
/// // lambda = 0 collapses to plain CRR.
/// let f = EffectiveFactors::compute(1.05, 1.2, 0.8, 0.0, 0.0, 0.0).unwrap();
/// assert_eq!(f.up, 1.2);
/// assert_eq!(f.down, 0.8);
/// assert!((f.prob_up - 0.625).abs() < 1e-15);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectiveFactors {
    /// Effective up factor `u_tilde`.
    pub up: f64,
    /// Effective down factor `d_tilde`.
    pub down: f64,
    /// Risk-neutral probability of an up move, strictly inside (0, 1).
    pub prob_up: f64,
}

impl EffectiveFactors {
    /// Computes the effective factors from raw inputs.
    ///
    /// Inputs are assumed individually valid (positive factors,
    /// non-negative impact terms); only the joint no-arbitrage condition
    /// is checked here. Full input validation lives in the
    /// [`BinomialParams`] builder.
    ///
    /// # Errors
    ///
    /// [`FactorError`] naming the violated side of
    /// `d_tilde < rate < u_tilde`.
    pub fn compute(
        rate: f64,
        up: f64,
        down: f64,
        lambda: f64,
        volume_up: f64,
        volume_down: f64,
    ) -> Result<Self, FactorError> {
        let up_eff = up * (lambda * volume_up).exp();
        let down_eff = down * (-lambda * volume_down).exp();

        if rate <= down_eff {
            return Err(FactorError::RateNotAboveDown {
                rate,
                down: down_eff,
            });
        }
        if rate >= up_eff {
            return Err(FactorError::RateNotBelowUp { rate, up: up_eff });
        }

        Ok(Self {
            up: up_eff,
            down: down_eff,
            prob_up: (rate - down_eff) / (up_eff - down_eff),
        })
    }

    /// Computes the effective factors for a full parameter set.
    ///
    /// # Errors
    ///
    /// Same as [`EffectiveFactors::compute`].
    #[inline]
    pub fn from_params(params: &BinomialParams) -> Result<Self, FactorError> {
        Self::compute(
            params.rate(),
            params.up(),
            params.down(),
            params.lambda(),
            params.volume_up(),
            params.volume_down(),
        )
    }

    /// Risk-neutral probability of a down move.
    #[inline]
    pub fn prob_down(&self) -> f64 {
        1.0 - self.prob_up
    }
}

/// Pre-flight no-arbitrage check without computing a price.
///
/// Boolean wrapper over [`EffectiveFactors::compute`] for callers that
/// want to validate a parameterisation before invoking the engine.
#[inline]
pub fn check_no_arbitrage(
    rate: f64,
    up: f64,
    down: f64,
    lambda: f64,
    volume_up: f64,
    volume_down: f64,
) -> bool {
    EffectiveFactors::compute(rate, up, down, lambda, volume_up, volume_down).is_ok()
}
