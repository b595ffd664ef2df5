//! Engine error type.
//!
//! Fatal conditions only; non-fatal conditions travel as
//! [`EngineWarning`](crate::warnings::EngineWarning) values on the result
//! structs. There is no retry logic anywhere: every computation is a pure
//! function of its inputs, so the only recovery is different parameters.

use impact_core::{DegeneracyError, FactorError};
use thiserror::Error;

/// Fatal pricing failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The parameterisation admits arbitrage; the expectation would be
    /// meaningless. Raised before any path is enumerated.
    #[error(transparent)]
    Arbitrage(#[from] FactorError),

    /// The requested step count implies more paths than the configured
    /// ceiling allows (hard ceiling, or the warning ceiling in strict
    /// mode). Carries the exact path count so the caller can decide on a
    /// smaller `n`.
    #[error("path enumeration refused: n_steps={n_steps} implies {n_paths} paths (ceiling: 2^{limit})")]
    PathExplosion {
        /// Requested number of steps.
        n_steps: u32,
        /// Exact number of paths, `2^n_steps`.
        n_paths: u64,
        /// The step ceiling that was exceeded.
        limit: u32,
    },

    /// Internal invariant violation (non-positive or non-finite
    /// intermediate value). A bug, not a user-facing condition.
    #[error(transparent)]
    Degeneracy(#[from] DegeneracyError),
}
