//! Model parameters and the option payoff.
//!
//! [`BinomialParams`] is the sole input to every pricing call. It is
//! constructed through [`BinomialParamsBuilder`], which performs all
//! fail-fast validation at `build()` time; once built the struct is
//! immutable.

use crate::error::ParameterError;

/// Option type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    /// Call: pays `max(0, average - strike)`.
    #[default]
    Call,
    /// Put: pays `max(0, strike - average)`.
    Put,
}

impl OptionType {
    /// Intrinsic payoff of the option against an average price.
    ///
    /// A single shared clamp for both option types; the pricing loops never
    /// branch on call/put anywhere else.
    #[inline]
    pub fn intrinsic(self, average: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (average - strike).max(0.0),
            OptionType::Put => (strike - average).max(0.0),
        }
    }
}

/// Validated parameters of the price-impact binomial model.
///
/// Covers the standard Cox-Ross-Rubinstein inputs plus the price-impact
/// extension: a hedger trading volume `v_u` (`v_d`) on an up (down) move
/// widens the factors to `u_tilde = u * exp(lambda * v_u)` and
/// `d_tilde = d * exp(-lambda * v_d)`.
///
/// `rate` is a gross per-step rate (1.05 = 5%).
///
/// # Examples
///
/// ```rust
/// use impact_core::{BinomialParams, OptionType};
///
/// let params = BinomialParams::builder()
///     .spot(100.0)
///     .strike(100.0)
///     .rate(1.05)
///     .up(1.2)
///     .down(0.8)
///     .lambda(0.1)
///     .volume_up(1.0)
///     .volume_down(1.0)
///     .n_steps(3)
///     .option_type(OptionType::Call)
///     .build()
///     .expect("valid parameters");
///
/// assert_eq!(params.n_steps(), 3);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinomialParams {
    spot: f64,
    strike: f64,
    rate: f64,
    up: f64,
    down: f64,
    lambda: f64,
    volume_up: f64,
    volume_down: f64,
    n_steps: u32,
    option_type: OptionType,
}

impl BinomialParams {
    /// Largest supported step count. Paths are `u64` bit patterns, so
    /// the path count `2^n` must fit in a `u64` index range.
    pub const MAX_STEPS: u32 = 62;

    /// Creates a new parameter builder.
    #[inline]
    pub fn builder() -> BinomialParamsBuilder {
        BinomialParamsBuilder::default()
    }

    /// Initial stock price `S_0`.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Strike price `K`.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Gross per-step risk-free rate `r`.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Base up factor `u`.
    #[inline]
    pub fn up(&self) -> f64 {
        self.up
    }

    /// Base down factor `d`.
    #[inline]
    pub fn down(&self) -> f64 {
        self.down
    }

    /// Price-impact coefficient `lambda`.
    #[inline]
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Hedging volume traded on an up move.
    #[inline]
    pub fn volume_up(&self) -> f64 {
        self.volume_up
    }

    /// Hedging volume traded on a down move.
    #[inline]
    pub fn volume_down(&self) -> f64 {
        self.volume_down
    }

    /// Number of binomial steps `n`.
    #[inline]
    pub fn n_steps(&self) -> u32 {
        self.n_steps
    }

    /// Call or put.
    #[inline]
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Total number of up/down paths, `2^n`.
    #[inline]
    pub fn n_paths(&self) -> u64 {
        1u64 << self.n_steps
    }

    /// Discount factor over the whole horizon, `r^-n`.
    #[inline]
    pub fn discount(&self) -> f64 {
        self.rate.powi(-(self.n_steps as i32))
    }

    /// Returns a copy with a different strike (other fields unchanged).
    ///
    /// Handy for strike sweeps; the replacement value is re-validated.
    pub fn with_strike(&self, strike: f64) -> Result<Self, ParameterError> {
        let mut params = self.clone();
        params.strike = strike;
        params.validate()?;
        Ok(params)
    }

    fn validate(&self) -> Result<(), ParameterError> {
        let positive = [
            ("spot", self.spot),
            ("strike", self.strike),
            ("rate", self.rate),
            ("up", self.up),
            ("down", self.down),
        ];
        for (name, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ParameterError::NonPositive { name, value });
            }
        }

        let non_negative = [
            ("lambda", self.lambda),
            ("volume_up", self.volume_up),
            ("volume_down", self.volume_down),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(ParameterError::Negative { name, value });
            }
        }

        if self.up <= self.down {
            return Err(ParameterError::FactorOrdering {
                up: self.up,
                down: self.down,
            });
        }

        if self.n_steps == 0 {
            return Err(ParameterError::ZeroSteps);
        }
        if self.n_steps > Self::MAX_STEPS {
            return Err(ParameterError::TooManySteps {
                n_steps: self.n_steps,
                limit: Self::MAX_STEPS,
            });
        }

        Ok(())
    }
}

/// Builder for [`BinomialParams`].
///
/// `spot`, `strike`, `rate`, `up`, `down` and `n_steps` are required;
/// `lambda` and the hedging volumes default to zero (plain CRR) and
/// `option_type` defaults to [`OptionType::Call`].
#[derive(Clone, Debug, Default)]
pub struct BinomialParamsBuilder {
    spot: Option<f64>,
    strike: Option<f64>,
    rate: Option<f64>,
    up: Option<f64>,
    down: Option<f64>,
    lambda: f64,
    volume_up: f64,
    volume_down: f64,
    n_steps: Option<u32>,
    option_type: OptionType,
}

impl BinomialParamsBuilder {
    /// Sets the initial stock price.
    #[inline]
    pub fn spot(mut self, spot: f64) -> Self {
        self.spot = Some(spot);
        self
    }

    /// Sets the strike price.
    #[inline]
    pub fn strike(mut self, strike: f64) -> Self {
        self.strike = Some(strike);
        self
    }

    /// Sets the gross per-step rate (1.05 = 5%).
    #[inline]
    pub fn rate(mut self, rate: f64) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Sets the base up factor.
    #[inline]
    pub fn up(mut self, up: f64) -> Self {
        self.up = Some(up);
        self
    }

    /// Sets the base down factor.
    #[inline]
    pub fn down(mut self, down: f64) -> Self {
        self.down = Some(down);
        self
    }

    /// Sets the price-impact coefficient.
    #[inline]
    pub fn lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    /// Sets the hedging volume on an up move.
    #[inline]
    pub fn volume_up(mut self, volume_up: f64) -> Self {
        self.volume_up = volume_up;
        self
    }

    /// Sets the hedging volume on a down move.
    #[inline]
    pub fn volume_down(mut self, volume_down: f64) -> Self {
        self.volume_down = volume_down;
        self
    }

    /// Sets the number of binomial steps.
    #[inline]
    pub fn n_steps(mut self, n_steps: u32) -> Self {
        self.n_steps = Some(n_steps);
        self
    }

    /// Sets call or put.
    #[inline]
    pub fn option_type(mut self, option_type: OptionType) -> Self {
        self.option_type = option_type;
        self
    }

    /// Builds and validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError`] if a required field is missing or any
    /// value fails validation. Nothing is ever silently clamped.
    pub fn build(self) -> Result<BinomialParams, ParameterError> {
        let required = |name| ParameterError::Missing { name };

        let params = BinomialParams {
            spot: self.spot.ok_or(required("spot"))?,
            strike: self.strike.ok_or(required("strike"))?,
            rate: self.rate.ok_or(required("rate"))?,
            up: self.up.ok_or(required("up"))?,
            down: self.down.ok_or(required("down"))?,
            lambda: self.lambda,
            volume_up: self.volume_up,
            volume_down: self.volume_down,
            n_steps: self.n_steps.ok_or(required("n_steps"))?,
            option_type: self.option_type,
        };

        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn base_builder() -> BinomialParamsBuilder {
        BinomialParams::builder()
            .spot(100.0)
            .strike(100.0)
            .rate(1.05)
            .up(1.2)
            .down(0.8)
            .n_steps(3)
    }

    #[test]
    fn intrinsic_call_and_put() {
        assert_relative_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
        assert_relative_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
        assert_relative_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
        assert_relative_eq!(OptionType::Put.intrinsic(110.0, 100.0), 0.0);
    }

    #[test]
    fn builder_accepts_valid_params() {
        let params = base_builder()
            .lambda(0.1)
            .volume_up(1.0)
            .volume_down(1.0)
            .build()
            .unwrap();

        assert_eq!(params.spot(), 100.0);
        assert_eq!(params.n_steps(), 3);
        assert_eq!(params.n_paths(), 8);
        assert_eq!(params.option_type(), OptionType::Call);
    }

    #[test]
    fn builder_defaults_to_plain_crr_call() {
        let params = base_builder().build().unwrap();
        assert_eq!(params.lambda(), 0.0);
        assert_eq!(params.volume_up(), 0.0);
        assert_eq!(params.volume_down(), 0.0);
        assert_eq!(params.option_type(), OptionType::Call);
    }

    #[test]
    fn builder_rejects_non_positive_inputs() {
        let result = base_builder().spot(-1.0).build();
        assert!(matches!(
            result,
            Err(ParameterError::NonPositive { name: "spot", .. })
        ));

        let result = base_builder().rate(0.0).build();
        assert!(matches!(
            result,
            Err(ParameterError::NonPositive { name: "rate", .. })
        ));

        let result = base_builder().strike(f64::NAN).build();
        assert!(matches!(
            result,
            Err(ParameterError::NonPositive { name: "strike", .. })
        ));
    }

    #[test]
    fn builder_rejects_negative_impact_inputs() {
        let result = base_builder().lambda(-0.1).build();
        assert!(matches!(
            result,
            Err(ParameterError::Negative { name: "lambda", .. })
        ));

        let result = base_builder().volume_down(-1.0).build();
        assert!(matches!(
            result,
            Err(ParameterError::Negative {
                name: "volume_down",
                ..
            })
        ));
    }

    #[test]
    fn builder_rejects_inverted_factors() {
        let result = base_builder().up(0.8).down(1.2).build();
        assert!(matches!(result, Err(ParameterError::FactorOrdering { .. })));

        // Equal factors are also rejected.
        let result = base_builder().up(1.0).down(1.0).build();
        assert!(matches!(result, Err(ParameterError::FactorOrdering { .. })));
    }

    #[test]
    fn builder_rejects_zero_steps() {
        let result = base_builder().n_steps(0).build();
        assert!(matches!(result, Err(ParameterError::ZeroSteps)));
    }

    #[test]
    fn builder_rejects_unindexable_step_counts() {
        // 2^63 and beyond cannot be held in a u64 index range, so the
        // builder refuses before n_paths() could ever overflow the shift.
        for n_steps in [63u32, 64, 1_000] {
            let result = base_builder().n_steps(n_steps).build();
            assert!(matches!(
                result,
                Err(ParameterError::TooManySteps { limit: 62, .. })
            ));
        }

        // The maximum itself is accepted and still counts paths exactly.
        let params = base_builder()
            .n_steps(BinomialParams::MAX_STEPS)
            .build()
            .unwrap();
        assert_eq!(params.n_paths(), 1u64 << 62);
    }

    #[test]
    fn builder_rejects_missing_fields() {
        let result = BinomialParams::builder().spot(100.0).build();
        assert!(matches!(result, Err(ParameterError::Missing { .. })));
    }

    #[test]
    fn discount_is_inverse_gross_rate_power() {
        let params = base_builder().build().unwrap();
        assert_relative_eq!(params.discount(), 1.05f64.powi(-3), epsilon = 1e-15);
    }

    #[test]
    fn with_strike_revalidates() {
        let params = base_builder().build().unwrap();
        let shifted = params.with_strike(120.0).unwrap();
        assert_eq!(shifted.strike(), 120.0);
        assert_eq!(shifted.spot(), params.spot());

        assert!(params.with_strike(-5.0).is_err());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn intrinsic_is_non_negative_and_complementary(
                average in 0.01f64..1e6,
                strike in 0.01f64..1e6,
            ) {
                let call = OptionType::Call.intrinsic(average, strike);
                let put = OptionType::Put.intrinsic(average, strike);

                prop_assert!(call >= 0.0);
                prop_assert!(put >= 0.0);
                // At most one side is in the money.
                prop_assert!(call == 0.0 || put == 0.0);
                // Parity of the intrinsic values.
                prop_assert!((call - put - (average - strike)).abs() < 1e-9);
            }

            #[test]
            fn builder_never_accepts_inverted_factors(
                up in 0.1f64..2.0,
                down in 0.1f64..2.0,
            ) {
                let result = base_builder().up(up).down(down).build();
                if up > down {
                    prop_assert!(result.is_ok());
                } else {
                    prop_assert!(
                        matches!(result, Err(ParameterError::FactorOrdering { .. })),
                        "expected FactorOrdering error, got {:?}",
                        result
                    );
                }
            }

            #[test]
            fn n_paths_doubles_per_step(n_steps in 1u32..=30) {
                let params = base_builder().n_steps(n_steps).build().unwrap();
                prop_assert_eq!(params.n_paths(), 1u64 << n_steps);
                prop_assert!(params.discount() > 0.0);
            }
        }
    }
}
