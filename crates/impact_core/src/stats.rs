//! Streaming statistics over one price trajectory.
//!
//! A trajectory of `n + 1` prices is reduced on the fly: running sum for
//! the arithmetic mean, running log-sum for the geometric mean, running
//! max/min for the per-path spread. Nothing is stored, so evaluating one
//! path costs O(1) auxiliary space regardless of `n`.
//!
//! The geometric mean is `exp(mean(ln S_i))` rather than the raw product
//! root: the product of `n` prices overflows long before the log-sum does.

use crate::error::DegeneracyError;

/// Streaming accumulator over the prices of a single path.
#[derive(Clone, Copy, Debug)]
pub struct PathStats {
    sum: f64,
    log_sum: f64,
    max: f64,
    min: f64,
    count: u32,
}

impl PathStats {
    /// Creates an empty accumulator.
    #[inline]
    pub fn new() -> Self {
        Self {
            sum: 0.0,
            log_sum: 0.0,
            max: f64::NEG_INFINITY,
            min: f64::INFINITY,
            count: 0,
        }
    }

    /// Folds one price into the running statistics.
    ///
    /// # Errors
    ///
    /// [`DegeneracyError`] if the price is non-positive or non-finite.
    /// Upstream invariants make this unreachable (effective factors are
    /// exponentials, hence positive), so a failure here means an internal
    /// invariant was broken, not a bad user input.
    #[inline]
    pub fn observe(&mut self, price: f64) -> Result<(), DegeneracyError> {
        if !(price > 0.0) || !price.is_finite() {
            return Err(DegeneracyError {
                context: "path price",
                value: price,
            });
        }

        self.sum += price;
        self.log_sum += price.ln();
        self.max = self.max.max(price);
        self.min = self.min.min(price);
        self.count += 1;
        Ok(())
    }

    /// Number of prices observed so far.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Arithmetic mean of the observed prices.
    #[inline]
    pub fn arithmetic_average(&self) -> f64 {
        self.sum / self.count as f64
    }

    /// Geometric mean of the observed prices, `exp(mean(ln S_i))`.
    #[inline]
    pub fn geometric_average(&self) -> f64 {
        (self.log_sum / self.count as f64).exp()
    }

    /// Largest price observed on the path.
    #[inline]
    pub fn maximum(&self) -> f64 {
        self.max
    }

    /// Smallest price observed on the path.
    #[inline]
    pub fn minimum(&self) -> f64 {
        self.min
    }
}

impl Default for PathStats {
    fn default() -> Self {
        Self::new()
    }
}
