//! Property-based tests for the binomial engine.
//!
//! Strategies generate arbitrage-free parameter sets by construction:
//! the gross rate is placed strictly between the effective factors.
//! Step counts stay small so each case enumerates at most 2^8 paths.

use impact_core::{BinomialParams, EffectiveFactors, OptionType};
use impact_pricing::{BinomialEngine, SamplingConfig};
use proptest::prelude::*;

/// Arbitrage-free classical parameters (no impact): `d < r < u` holds by
/// construction because `r` interpolates strictly between the factors.
fn crr_params() -> impl Strategy<Value = BinomialParams> {
    (
        50.0f64..200.0,   // spot
        50.0f64..200.0,   // strike
        1.05f64..1.6,     // up
        0.5f64..0.95,     // down
        0.05f64..0.95,    // rate interpolant
        1u32..=8,         // n_steps
        prop_oneof![Just(OptionType::Call), Just(OptionType::Put)],
    )
        .prop_map(|(spot, strike, up, down, t, n_steps, option_type)| {
            let rate = down + t * (up - down);
            BinomialParams::builder()
                .spot(spot)
                .strike(strike)
                .rate(rate)
                .up(up)
                .down(down)
                .n_steps(n_steps)
                .option_type(option_type)
                .build()
                .unwrap()
        })
}

proptest! {
    #[test]
    fn geometric_price_is_finite_and_non_negative(params in crr_params()) {
        let result = BinomialEngine::with_defaults()
            .price_geometric(&params)
            .unwrap();

        prop_assert!(result.price.is_finite());
        prop_assert!(result.price >= 0.0);
        prop_assert!(result.expected_geometric > 0.0);
        prop_assert_eq!(result.n_paths, 1u64 << params.n_steps());
    }

    #[test]
    fn bounds_are_ordered(params in crr_params()) {
        // Exhaustive refinement: every path considered, so the chain
        // lower <= path-specific <= global holds without sampling noise.
        let sampling = SamplingConfig::builder()
            .fraction(1.0)
            .max_samples(1 << 8)
            .min_reliable(1)
            .seed(7)
            .build()
            .unwrap();

        let bounds = BinomialEngine::with_defaults()
            .arithmetic_bounds(&params, Some(&sampling))
            .unwrap();
        let ps = bounds.upper_bound_path_specific.unwrap();

        prop_assert!(bounds.lower_bound >= 0.0);
        prop_assert!(bounds.lower_bound <= ps + 1e-9 * ps.abs().max(1.0));
        prop_assert!(ps <= bounds.upper_bound_global + 1e-9 * bounds.upper_bound_global);
        prop_assert!(bounds.rho_star >= 1.0);
    }

    #[test]
    fn lower_bound_is_the_geometric_price(params in crr_params()) {
        let engine = BinomialEngine::with_defaults();
        let price = engine.price_geometric(&params).unwrap();
        let bounds = engine.arithmetic_bounds(&params, None).unwrap();

        // Identical sums, identical result.
        prop_assert_eq!(bounds.lower_bound, price.price);
        prop_assert_eq!(bounds.expected_geometric, price.expected_geometric);
    }

    #[test]
    fn price_is_monotone_in_strike(params in crr_params()) {
        let engine = BinomialEngine::with_defaults();

        let base = engine.price_geometric(&params).unwrap().price;
        let bumped_params = params.with_strike(params.strike() + 10.0).unwrap();
        let bumped = engine.price_geometric(&bumped_params).unwrap().price;

        match params.option_type() {
            OptionType::Call => prop_assert!(bumped <= base + 1e-9),
            OptionType::Put => prop_assert!(bumped + 1e-9 >= base),
        }
    }

    #[test]
    fn price_is_monotone_in_spot(params in crr_params()) {
        let engine = BinomialEngine::with_defaults();
        let base = engine.price_geometric(&params).unwrap().price;

        // Every average scales linearly with the spot, so bumping it can
        // only raise call payoffs and lower put payoffs.
        let bumped_params = BinomialParams::builder()
            .spot(params.spot() + 10.0)
            .strike(params.strike())
            .rate(params.rate())
            .up(params.up())
            .down(params.down())
            .n_steps(params.n_steps())
            .option_type(params.option_type())
            .build()
            .unwrap();
        let bumped = engine.price_geometric(&bumped_params).unwrap().price;

        match params.option_type() {
            OptionType::Call => prop_assert!(bumped + 1e-9 >= base),
            OptionType::Put => prop_assert!(bumped <= base + 1e-9),
        }
    }

    #[test]
    fn zero_impact_reduces_to_raw_factors(
        up in 1.05f64..1.6,
        down in 0.5f64..0.95,
        t in 0.05f64..0.95,
    ) {
        let rate = down + t * (up - down);
        let factors = EffectiveFactors::compute(rate, up, down, 0.0, 0.0, 0.0).unwrap();

        prop_assert_eq!(factors.up, up);
        prop_assert_eq!(factors.down, down);
        prop_assert!(factors.prob_up > 0.0 && factors.prob_up < 1.0);
    }

    #[test]
    fn probability_stays_in_the_open_unit_interval(params in crr_params()) {
        let factors = EffectiveFactors::from_params(&params).unwrap();
        prop_assert!(factors.prob_up > 0.0);
        prop_assert!(factors.prob_up < 1.0);
        prop_assert!((factors.prob_up + factors.prob_down() - 1.0).abs() < 1e-12);
    }
}
