//! Non-fatal engine warnings.
//!
//! Warnings ride on the result structs rather than a logging side channel,
//! so concurrent callers with different policies never interfere and
//! nothing is lost when results are passed around. Computation always
//! completes when a warning is attached.

use std::fmt;

/// Informational condition attached to a pricing result.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineWarning {
    /// The step count exceeded the comfortable enumeration ceiling.
    /// Carries the exact path count so the caller can judge the cost.
    PathExplosion {
        /// Requested number of steps.
        n_steps: u32,
        /// Exact number of paths, `2^n_steps`.
        n_paths: u64,
    },

    /// The path-specific bound was estimated from fewer samples than the
    /// configured reliability threshold; the bound may be statistically
    /// fragile.
    SampleSize {
        /// Number of paths actually sampled.
        n_sampled: u64,
        /// Configured reliability threshold.
        minimum: u64,
    },
}

impl fmt::Display for EngineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathExplosion { n_steps, n_paths } => {
                write!(
                    f,
                    "n_steps={} enumerates {} paths; expect long runtimes",
                    n_steps, n_paths
                )
            }
            Self::SampleSize { n_sampled, minimum } => {
                write!(
                    f,
                    "path-specific bound used only {} sampled paths (reliability threshold: {})",
                    n_sampled, minimum
                )
            }
        }
    }
}
