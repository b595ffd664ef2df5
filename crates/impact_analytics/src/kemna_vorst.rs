//! Kemna-Vorst (1990) closed form for the continuously averaged
//! geometric Asian option.
//!
//! The geometric average of a lognormal process is itself lognormal, so
//! the Asian price is a Black-Scholes formula on adjusted coefficients:
//! volatility `sigma / sqrt(3)` and cost-of-carry `(r - sigma^2 / 6) / 2`.
//! This is the continuous-time limit of the exact discrete price the
//! binomial engine enumerates.

use impact_core::OptionType;

use crate::distributions::norm_cdf;
use crate::error::AnalyticError;

/// Kemna-Vorst continuous geometric Asian model.
///
/// # Examples
///
/// ```rust
/// use impact_analytics::{BlackScholes, KemnaVorst};
/// use impact_core::OptionType;
///
/// let asian = KemnaVorst::new(100.0, 0.05, 0.2).unwrap();
/// let vanilla = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
///
/// // Averaging damps volatility: the Asian call is worth less.
/// let asian_call = asian.price(OptionType::Call, 100.0, 1.0);
/// assert!(asian_call < vanilla.price(OptionType::Call, 100.0, 1.0));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct KemnaVorst {
    spot: f64,
    rate: f64,
    volatility: f64,
}

impl KemnaVorst {
    /// Creates the model.
    ///
    /// # Errors
    ///
    /// Same validation as [`BlackScholes::new`](crate::BlackScholes::new).
    pub fn new(spot: f64, rate: f64, volatility: f64) -> Result<Self, AnalyticError> {
        if !(spot > 0.0) {
            return Err(AnalyticError::InvalidSpot { spot });
        }
        if !(volatility > 0.0) {
            return Err(AnalyticError::InvalidVolatility { volatility });
        }
        Ok(Self {
            spot,
            rate,
            volatility,
        })
    }

    /// Adjusted volatility of the average, `sigma / sqrt(3)`.
    #[inline]
    pub fn adjusted_volatility(&self) -> f64 {
        self.volatility / 3.0_f64.sqrt()
    }

    /// Adjusted cost of carry, `(r - sigma^2 / 6) / 2`.
    #[inline]
    pub fn adjusted_carry(&self) -> f64 {
        0.5 * (self.rate - self.volatility * self.volatility / 6.0)
    }

    /// Prices the continuously averaged geometric Asian option; at
    /// `expiry <= 0` the average collapses to the spot.
    pub fn price(&self, option_type: OptionType, strike: f64, expiry: f64) -> f64 {
        if expiry <= 0.0 {
            return option_type.intrinsic(self.spot, strike);
        }

        let sigma_g = self.adjusted_volatility();
        let carry = self.adjusted_carry();

        let vol_sqrt_t = sigma_g * expiry.sqrt();
        let d1 = ((self.spot / strike).ln() + (carry + 0.5 * sigma_g * sigma_g) * expiry)
            / vol_sqrt_t;
        let d2 = d1 - vol_sqrt_t;

        let discounted_spot = self.spot * ((carry - self.rate) * expiry).exp();
        let discounted_strike = strike * (-self.rate * expiry).exp();

        match option_type {
            OptionType::Call => discounted_spot * norm_cdf(d1) - discounted_strike * norm_cdf(d2),
            OptionType::Put => {
                discounted_strike * norm_cdf(-d2) - discounted_spot * norm_cdf(-d1)
            }
        }
    }
}
