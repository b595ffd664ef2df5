//! Engine and sampling configuration.
//!
//! Configuration is an explicit value passed into the engine, never a
//! module-level global: concurrent callers with different policies cannot
//! interfere with each other. Both types are immutable once built and are
//! constructed through builders that validate at `build()` time.

use thiserror::Error;

/// Default step count beyond which a
/// [`PathExplosion`](crate::warnings::EngineWarning::PathExplosion)
/// warning is attached (2^20 ~ 1M paths).
pub const DEFAULT_WARN_STEPS: u32 = 20;

/// Default hard ceiling on the step count (2^30 ~ 1.1B paths).
pub const DEFAULT_MAX_STEPS: u32 = 30;

/// Largest step count the `u64` path representation supports; the same
/// ceiling [`BinomialParams`](impact_core::BinomialParams) enforces at
/// construction.
pub const MAX_SUPPORTED_STEPS: u32 = impact_core::BinomialParams::MAX_STEPS;

/// Default fraction of the path set sampled for the path-specific bound.
pub const DEFAULT_SAMPLE_FRACTION: f64 = 0.1;

/// Default absolute cap on the sampled path count.
pub const DEFAULT_MAX_SAMPLES: u64 = 100_000;

/// Default sample count below which a
/// [`SampleSize`](crate::warnings::EngineWarning::SampleSize) warning is
/// attached.
pub const DEFAULT_MIN_RELIABLE_SAMPLES: u64 = 1_000;

/// Invalid engine or sampling configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The warning ceiling exceeds the hard ceiling.
    #[error("warn_steps={warn_steps} exceeds max_steps={max_steps}")]
    WarnAboveMax {
        /// Warning ceiling.
        warn_steps: u32,
        /// Hard ceiling.
        max_steps: u32,
    },

    /// The hard ceiling exceeds what the path representation supports.
    #[error("max_steps={max_steps} exceeds the supported maximum of {limit}")]
    MaxTooLarge {
        /// Requested hard ceiling.
        max_steps: u32,
        /// Supported maximum.
        limit: u32,
    },

    /// The sample fraction is outside (0, 1].
    #[error("sample fraction must lie in (0, 1], got {0}")]
    InvalidFraction(f64),

    /// The absolute sample cap is zero.
    #[error("max_samples must be at least 1")]
    ZeroSamples,

    /// No seed was supplied for the sampling RNG.
    #[error("sampling requires an explicit seed for reproducibility")]
    MissingSeed,
}

/// Enumeration policy for the binomial engine.
///
/// # Examples
///
/// ```rust
/// use impact_pricing::EngineConfig;
///
/// let config = EngineConfig::builder()
///     .warn_steps(18)
///     .strict(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.warn_steps(), 18);
/// assert!(config.strict());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    warn_steps: u32,
    max_steps: u32,
    strict: bool,
}

impl EngineConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Step count beyond which a warning is attached.
    #[inline]
    pub fn warn_steps(&self) -> u32 {
        self.warn_steps
    }

    /// Step count beyond which the engine refuses to run.
    #[inline]
    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    /// When true, the warning ceiling is treated as fatal.
    #[inline]
    pub fn strict(&self) -> bool {
        self.strict
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_steps > MAX_SUPPORTED_STEPS {
            return Err(ConfigError::MaxTooLarge {
                max_steps: self.max_steps,
                limit: MAX_SUPPORTED_STEPS,
            });
        }
        if self.warn_steps > self.max_steps {
            return Err(ConfigError::WarnAboveMax {
                warn_steps: self.warn_steps,
                max_steps: self.max_steps,
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            warn_steps: DEFAULT_WARN_STEPS,
            max_steps: DEFAULT_MAX_STEPS,
            strict: false,
        }
    }
}

/// Builder for [`EngineConfig`].
#[derive(Clone, Debug, Default)]
pub struct EngineConfigBuilder {
    warn_steps: Option<u32>,
    max_steps: Option<u32>,
    strict: bool,
}

impl EngineConfigBuilder {
    /// Sets the warning ceiling on the step count.
    #[inline]
    pub fn warn_steps(mut self, warn_steps: u32) -> Self {
        self.warn_steps = Some(warn_steps);
        self
    }

    /// Sets the hard ceiling on the step count.
    #[inline]
    pub fn max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Treats the warning ceiling as fatal.
    #[inline]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if the ceilings are inconsistent or unsupported.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        let config = EngineConfig {
            warn_steps: self.warn_steps.unwrap_or(DEFAULT_WARN_STEPS),
            max_steps: self.max_steps.unwrap_or(DEFAULT_MAX_STEPS),
            strict: self.strict,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Sampling policy for the path-specific upper bound.
///
/// The seed is mandatory: results must be exactly reproducible given the
/// same seed and parameters, with no ambient RNG state.
///
/// # Examples
///
/// ```rust
/// use impact_pricing::SamplingConfig;
///
/// let sampling = SamplingConfig::builder()
///     .fraction(0.05)
///     .max_samples(50_000)
///     .seed(42)
///     .build()
///     .unwrap();
/// assert_eq!(sampling.seed(), 42);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SamplingConfig {
    fraction: f64,
    max_samples: u64,
    min_reliable: u64,
    seed: u64,
}

impl SamplingConfig {
    /// Creates a new sampling builder.
    #[inline]
    pub fn builder() -> SamplingConfigBuilder {
        SamplingConfigBuilder::default()
    }

    /// Convenience constructor with default policy and the given seed.
    #[inline]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            fraction: DEFAULT_SAMPLE_FRACTION,
            max_samples: DEFAULT_MAX_SAMPLES,
            min_reliable: DEFAULT_MIN_RELIABLE_SAMPLES,
            seed,
        }
    }

    /// Fraction of the path set to sample, in (0, 1].
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Absolute cap on the sampled path count.
    #[inline]
    pub fn max_samples(&self) -> u64 {
        self.max_samples
    }

    /// Sample count below which a reliability warning is attached.
    #[inline]
    pub fn min_reliable(&self) -> u64 {
        self.min_reliable
    }

    /// Base RNG seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of paths to draw out of `n_paths`.
    ///
    /// At least 1, at most `max_samples`; never more than the full path
    /// set. Exhaustive enumeration is used instead of sampling whenever
    /// the whole path set fits under the cap, so this is only consulted
    /// when `n_paths > max_samples`.
    pub fn sample_count(&self, n_paths: u64) -> u64 {
        let by_fraction = (self.fraction * n_paths as f64).floor() as u64;
        by_fraction.clamp(1, self.max_samples.min(n_paths))
    }
}

/// Builder for [`SamplingConfig`].
#[derive(Clone, Debug, Default)]
pub struct SamplingConfigBuilder {
    fraction: Option<f64>,
    max_samples: Option<u64>,
    min_reliable: Option<u64>,
    seed: Option<u64>,
}

impl SamplingConfigBuilder {
    /// Sets the sampled fraction of the path set.
    #[inline]
    pub fn fraction(mut self, fraction: f64) -> Self {
        self.fraction = Some(fraction);
        self
    }

    /// Sets the absolute cap on the sampled path count.
    #[inline]
    pub fn max_samples(mut self, max_samples: u64) -> Self {
        self.max_samples = Some(max_samples);
        self
    }

    /// Sets the reliability threshold for the sample-size warning.
    #[inline]
    pub fn min_reliable(mut self, min_reliable: u64) -> Self {
        self.min_reliable = Some(min_reliable);
        self
    }

    /// Sets the base RNG seed (required).
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the sampling configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if the fraction is outside (0, 1], the cap is
    /// zero, or no seed was supplied.
    pub fn build(self) -> Result<SamplingConfig, ConfigError> {
        let fraction = self.fraction.unwrap_or(DEFAULT_SAMPLE_FRACTION);
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(ConfigError::InvalidFraction(fraction));
        }

        let max_samples = self.max_samples.unwrap_or(DEFAULT_MAX_SAMPLES);
        if max_samples == 0 {
            return Err(ConfigError::ZeroSamples);
        }

        Ok(SamplingConfig {
            fraction,
            max_samples,
            min_reliable: self.min_reliable.unwrap_or(DEFAULT_MIN_RELIABLE_SAMPLES),
            seed: self.seed.ok_or(ConfigError::MissingSeed)?,
        })
    }
}
