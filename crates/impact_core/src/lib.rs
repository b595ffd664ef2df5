//! # Impact Core (Layer 1: value types)
//!
//! Foundation crate for the impact-asian pricing workspace. It owns the
//! value types shared by every pricing call:
//!
//! - [`BinomialParams`]: validated, immutable model parameters
//! - [`EffectiveFactors`]: price-impact-adjusted up/down factors and the
//!   risk-neutral probability, with the no-arbitrage check
//! - [`PathStats`]: streaming statistics over one price trajectory
//! - error types for parameter, arbitrage and internal-degeneracy failures
//!
//! Everything in this crate is a pure value computation: no I/O, no global
//! state, no caching. Recomputing [`EffectiveFactors`] from the same inputs
//! is bit-identical every time.
//!
//! ## Rate convention
//!
//! `rate` is always a **gross** per-step rate: 1.05 means 5% per step,
//! never 0.05. The no-arbitrage condition is `d_tilde < rate < u_tilde`,
//! strictly.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod factors;
pub mod params;
pub mod stats;

pub use error::{DegeneracyError, FactorError, ParameterError};
pub use factors::{check_no_arbitrage, EffectiveFactors};
pub use params::{BinomialParams, BinomialParamsBuilder, OptionType};
pub use stats::PathStats;
