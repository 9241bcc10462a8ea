//! Vacancy estimation for parking spots.
//!
//! There is no occupancy data behind the dataset yet, so the default
//! estimator is a uniform random placeholder. Callers depend only on
//! [`EmptinessEstimator`], so a real model can replace it without touching
//! the normalizer or the service.

use rand::Rng;

use crate::types::RawRecord;

/// Estimates how likely a spot is to be vacant, in `[0, 1)`.
pub trait EmptinessEstimator: Send + Sync {
    fn estimate(&self, record: &RawRecord) -> f64;
}

/// Placeholder: uniform in `[0.3, 0.9)`, ignoring the record.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPlaceholder;

impl RandomPlaceholder {
    pub const LOW: f64 = 0.3;
    pub const HIGH: f64 = 0.9;
}

impl EmptinessEstimator for RandomPlaceholder {
    fn estimate(&self, _record: &RawRecord) -> f64 {
        rand::rng().random_range(Self::LOW..Self::HIGH)
    }
}

/// Always returns the same value. Gives reproducible output.
#[derive(Debug, Clone, Copy)]
pub struct ConstantEstimator(f64);

impl ConstantEstimator {
    /// Largest value an estimate may take; the range is half-open.
    pub const MAX: f64 = 1.0 - f64::EPSILON;

    /// Clamps `value` into `[0, 1)`. NaN becomes 0.
    #[must_use]
    pub const fn new(value: f64) -> Self {
        let value = if value.is_nan() || value < 0.0 {
            0.0
        } else if value > Self::MAX {
            Self::MAX
        } else {
            value
        };
        Self(value)
    }
}

impl EmptinessEstimator for ConstantEstimator {
    fn estimate(&self, _record: &RawRecord) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_placeholder_stays_in_range() {
        let record = RawRecord::default();
        for _ in 0..1_000 {
            let p = RandomPlaceholder.estimate(&record);
            assert!(
                (RandomPlaceholder::LOW..RandomPlaceholder::HIGH).contains(&p),
                "estimate {p} out of range"
            );
        }
    }

    #[test]
    fn constant_estimator_returns_its_value() {
        let estimate = ConstantEstimator::new(0.42).estimate(&RawRecord::default());
        assert!((estimate - 0.42).abs() < f64::EPSILON);
    }

    #[test]
    fn constant_estimator_clamps_into_unit_range() {
        let record = RawRecord::default();
        assert!(ConstantEstimator::new(-0.5).estimate(&record).abs() < f64::EPSILON);
        assert!(ConstantEstimator::new(f64::NAN).estimate(&record).abs() < f64::EPSILON);
        for value in [1.0, 7.5, f64::INFINITY] {
            let estimate = ConstantEstimator::new(value).estimate(&record);
            assert!((0.0..1.0).contains(&estimate), "{value} gave {estimate}");
        }
    }
}
