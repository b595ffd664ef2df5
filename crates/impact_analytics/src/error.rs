//! Error types for the analytical layer.

use impact_core::{DegeneracyError, FactorError};
use impact_pricing::EngineError;
use thiserror::Error;

/// Errors from the closed forms and the Monte-Carlo estimator.
#[derive(Debug, Error)]
pub enum AnalyticError {
    /// Spot price must be strictly positive.
    #[error("spot must be positive, got {spot}")]
    InvalidSpot {
        /// Offending spot value.
        spot: f64,
    },

    /// Volatility must be strictly positive.
    #[error("volatility must be positive, got {volatility}")]
    InvalidVolatility {
        /// Offending volatility value.
        volatility: f64,
    },

    /// Expiry must be non-negative.
    #[error("expiry must be non-negative, got {expiry}")]
    InvalidExpiry {
        /// Offending expiry value.
        expiry: f64,
    },

    /// The Monte-Carlo estimator needs at least two paths for a sample
    /// variance.
    #[error("Monte Carlo requires at least 2 paths, got {0}")]
    TooFewPaths(u64),

    /// No seed was supplied for the simulation RNG.
    #[error("simulation requires an explicit seed for reproducibility")]
    MissingSeed,

    /// The model admits arbitrage.
    #[error(transparent)]
    Arbitrage(#[from] FactorError),

    /// Internal invariant violation while streaming a simulated path.
    #[error(transparent)]
    Degeneracy(#[from] DegeneracyError),

    /// The exact engine failed while computing the control expectation.
    #[error(transparent)]
    Engine(#[from] EngineError),
}
