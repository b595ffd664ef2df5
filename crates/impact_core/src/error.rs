//! Error types for parameter validation and factor computation.
//!
//! Three concerns, three types:
//!
//! - [`ParameterError`]: an input failed fail-fast validation; nothing was
//!   computed.
//! - [`FactorError`]: the effective factors admit arbitrage; pricing on
//!   such a parameterisation would be economically meaningless.
//! - [`DegeneracyError`]: an internal invariant was violated despite valid
//!   inputs. This indicates a bug, not a user error, and is surfaced as a
//!   distinct type so callers never confuse the two.
//!
//! Every message embeds the offending numeric value so failures are
//! actionable without inspecting internals.

use thiserror::Error;

/// Invalid model parameter, rejected before any computation begins.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    /// A parameter that must be strictly positive was zero or negative.
    #[error("parameter '{name}' must be positive, got {value}")]
    NonPositive {
        /// Parameter name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A parameter that must be non-negative was negative.
    #[error("parameter '{name}' must be non-negative, got {value}")]
    Negative {
        /// Parameter name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The base up factor does not exceed the base down factor.
    #[error("up factor must exceed down factor: u={up} <= d={down}")]
    FactorOrdering {
        /// Base up factor.
        up: f64,
        /// Base down factor.
        down: f64,
    },

    /// The step count was zero.
    #[error("number of steps must be at least 1")]
    ZeroSteps,

    /// The step count exceeds what the `u64` path representation can
    /// index.
    #[error("n_steps={n_steps} exceeds the supported maximum of {limit}")]
    TooManySteps {
        /// Requested step count.
        n_steps: u32,
        /// Supported maximum.
        limit: u32,
    },

    /// A required builder field was never set.
    #[error("parameter '{name}' must be specified")]
    Missing {
        /// Parameter name.
        name: &'static str,
    },
}

/// No-arbitrage violation: the gross rate falls outside the open interval
/// spanned by the effective down and up factors.
///
/// One variant per failing side of the inequality, so the message states
/// exactly which bound was crossed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FactorError {
    /// `rate <= d_tilde`: the risk-neutral probability would be <= 0.
    #[error("no-arbitrage violated: r={rate} <= d_tilde={down}")]
    RateNotAboveDown {
        /// Gross per-step rate.
        rate: f64,
        /// Effective down factor `d_tilde`.
        down: f64,
    },

    /// `rate >= u_tilde`: the risk-neutral probability would be >= 1.
    #[error("no-arbitrage violated: r={rate} >= u_tilde={up}")]
    RateNotBelowUp {
        /// Gross per-step rate.
        rate: f64,
        /// Effective up factor `u_tilde`.
        up: f64,
    },
}

/// Internal numerical degeneracy: a quantity that is positive and finite
/// by construction came out otherwise.
///
/// Should be unreachable through the public API; treated as an
/// unrecoverable internal error rather than a user-facing condition.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("numerical degeneracy in {context}: got {value}")]
pub struct DegeneracyError {
    /// Where the degenerate value was observed.
    pub context: &'static str,
    /// The degenerate value.
    pub value: f64,
}
