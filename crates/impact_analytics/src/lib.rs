//! Continuous-time comparators for the discrete impact engine.
//!
//! Layer 3 of the workspace: closed forms and a Monte-Carlo estimator
//! that sit alongside the exact enumerating engine in `impact_pricing`.
//!
//! - [`BlackScholes`]: European vanilla benchmark.
//! - [`KemnaVorst`]: continuous geometric Asian closed form, the limit
//!   the discrete exact price converges to under a CRR discretisation.
//! - [`arithmetic_asian_mc`]: control-variate Monte Carlo for the
//!   *arithmetic* Asian price, anchored on the engine's exact geometric
//!   expectation.
//!
//! # Examples
//!
//! ```rust
//! use impact_analytics::{BlackScholes, KemnaVorst};
//! use impact_core::OptionType;
//!
//! let vanilla = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
//! let asian = KemnaVorst::new(100.0, 0.05, 0.2).unwrap();
//!
//! let strike = 100.0;
//! let expiry = 1.0;
//! assert!(
//!     asian.price(OptionType::Call, strike, expiry)
//!         < vanilla.price(OptionType::Call, strike, expiry)
//! );
//! ```

#![deny(missing_docs)]

pub mod black_scholes;
pub mod control_variate;
pub mod distributions;
pub mod error;
pub mod kemna_vorst;

pub use black_scholes::BlackScholes;
pub use control_variate::{arithmetic_asian_mc, ControlVariateResult, McConfig};
pub use error::AnalyticError;
pub use kemna_vorst::KemnaVorst;
