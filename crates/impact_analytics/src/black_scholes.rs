//! Black-Scholes closed form for European vanilla options.
//!
//! The vanilla benchmark against the path-dependent prices: with the same
//! market inputs an Asian option is worth less than its vanilla
//! counterpart because averaging damps the terminal distribution.

use impact_core::OptionType;

use crate::distributions::norm_cdf;
use crate::error::AnalyticError;

/// Black-Scholes model on a continuously compounded net rate.
///
/// # Examples
///
/// ```rust
/// use impact_analytics::BlackScholes;
/// use impact_core::OptionType;
///
/// let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
/// let call = bs.price(OptionType::Call, 100.0, 1.0);
/// let put = bs.price(OptionType::Put, 100.0, 1.0);
///
/// // Put-call parity: C - P = S - K e^{-rT}
/// let parity = call - put - (100.0 - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BlackScholes {
    spot: f64,
    rate: f64,
    volatility: f64,
}

impl BlackScholes {
    /// Creates the model.
    ///
    /// # Errors
    ///
    /// [`AnalyticError::InvalidSpot`] if `spot <= 0`,
    /// [`AnalyticError::InvalidVolatility`] if `volatility <= 0`.
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

    /// Spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Continuously compounded net rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    fn d1(&self, strike: f64, expiry: f64) -> f64 {
        let vol_sqrt_t = self.volatility * expiry.sqrt();
        let drift = (self.rate + 0.5 * self.volatility * self.volatility) * expiry;
        ((self.spot / strike).ln() + drift) / vol_sqrt_t
    }

    /// Prices a European option; at `expiry <= 0` returns the intrinsic
    /// value on the spot.
    pub fn price(&self, option_type: OptionType, strike: f64, expiry: f64) -> f64 {
        if expiry <= 0.0 {
            return option_type.intrinsic(self.spot, strike);
        }

        let d1 = self.d1(strike, expiry);
        let d2 = d1 - self.volatility * expiry.sqrt();
        let discounted_strike = strike * (-self.rate * expiry).exp();

        match option_type {
            OptionType::Call => self.spot * norm_cdf(d1) - discounted_strike * norm_cdf(d2),
            OptionType::Put => discounted_strike * norm_cdf(-d2) - self.spot * norm_cdf(-d1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn standard() -> BlackScholes {
        BlackScholes::new(100.0, 0.05, 0.2).unwrap()
    }

    #[test]
    fn atm_reference_values() {
        let bs = standard();
        assert_relative_eq!(bs.price(OptionType::Call, 100.0, 1.0), 10.450584, epsilon = 1e-4);
        assert_relative_eq!(bs.price(OptionType::Put, 100.0, 1.0), 5.573526, epsilon = 1e-4);
    }

    #[test]
    fn put_call_parity() {
        let bs = standard();
        for strike in [80.0, 100.0, 120.0] {
            let call = bs.price(OptionType::Call, strike, 1.0);
            let put = bs.price(OptionType::Put, strike, 1.0);
            let forward = 100.0 - strike * (-0.05_f64).exp();
            assert_relative_eq!(call - put, forward, epsilon = 1e-4);
        }
    }

    #[test]
    fn expired_option_pays_intrinsic() {
        let bs = standard();
        assert_eq!(bs.price(OptionType::Call, 90.0, 0.0), 10.0);
        assert_eq!(bs.price(OptionType::Put, 90.0, 0.0), 0.0);
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(matches!(
            BlackScholes::new(-1.0, 0.05, 0.2),
            Err(AnalyticError::InvalidSpot { .. })
        ));
        assert!(matches!(
            BlackScholes::new(100.0, 0.05, 0.0),
            Err(AnalyticError::InvalidVolatility { .. })
        ));
    }
}
