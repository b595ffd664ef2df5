//! # Impact Pricing (Layer 2: the binomial engine)
//!
//! Exact, path-dependent pricing of Asian options under the price-impact
//! binomial model. The engine enumerates all `2^n` up/down paths: the
//! geometric Asian price is therefore an *exact* discrete-model
//! expectation, not a simulation estimate, and the arithmetic Asian price
//! (which has no closed form) is bracketed by provable bounds.
//!
//! ## Core operations
//!
//! - [`BinomialEngine::price_geometric`]: exact discounted expectation of
//!   the geometric-average payoff over all paths
//! - [`BinomialEngine::arithmetic_bounds`]: AM-GM lower bound (equal to
//!   the geometric price), the closed-form global upper bound, and the
//!   tightened path-specific upper bound from sampled per-path spreads
//!
//! ## Cost model
//!
//! Enumeration is O(2^n * n) time and O(n) auxiliary space per worker;
//! paths are streamed, never materialised. The per-path work is
//! embarrassingly parallel and runs on rayon with per-worker partial sums.
//! [`EngineConfig`] bounds `n` before any work starts: beyond
//! `warn_steps` a [`EngineWarning::PathExplosion`] is attached to the
//! result (fatal in strict mode), beyond `max_steps` the engine refuses
//! outright.
//!
//! ## Example
//!
//! ```rust
//! use impact_core::{BinomialParams, OptionType};
//! use impact_pricing::BinomialEngine;
//!
//! let params = BinomialParams::builder()
//!     .spot(100.0)
//!     .strike(100.0)
//!     .rate(1.05)
//!     .up(1.2)
//!     .down(0.8)
//!     .lambda(0.1)
//!     .volume_up(1.0)
//!     .volume_down(1.0)
//!     .n_steps(3)
//!     .option_type(OptionType::Call)
//!     .build()
//!     .unwrap();
//!
//! let engine = BinomialEngine::with_defaults();
//! let result = engine.price_geometric(&params).unwrap();
//! assert!((result.price - 12.3519).abs() < 1e-4);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod bounds;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometric;
pub mod paths;
pub mod rng;
pub mod warnings;

pub use bounds::BoundsResult;
pub use config::{ConfigError, EngineConfig, SamplingConfig};
pub use engine::{arithmetic_asian_bounds, price_geometric_asian, BinomialEngine};
pub use error::EngineError;
pub use geometric::GeometricPrice;
pub use rng::SampleRng;
pub use warnings::EngineWarning;
