//! Logistic threshold controller
//!
//! After a collection the observed trash ratio is compared with the
//! generation's target. Too much trash means the generation waited too long,
//! so the threshold moves toward `min_threshold`; too little means it is
//! collected too eagerly, so the threshold moves toward `max_threshold`. The
//! step size is a logistic function of the distance from the target: small
//! misses barely move the threshold, large misses move it most of the way to
//! the bound.

use crate::traits::ThresholdPolicy;
use crate::{GcError, GcResult, Generation};

/// Logistic interpolation between the current threshold and a bound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdController {
    /// Scale applied to the ratio error before the sigmoid
    pub steepness: f64,
    /// Scaled error at which the weight reaches 0.5
    pub midpoint: f64,
}

impl Default for ThresholdController {
    fn default() -> Self {
        Self {
            steepness: 10.0,
            midpoint: 5.0,
        }
    }
}

impl ThresholdController {
    /// Create a controller with the default curve
    pub fn new() -> Self {
        Self::default()
    }

    /// Sigmoid weight in (0, 1) for a non-negative ratio error
    pub fn weight(&self, error: f64) -> f64 {
        let exponent = -(error * self.steepness - self.midpoint);
        1.0 / (1.0 + exponent.exp())
    }

    /// New threshold for `generation` given the size and trash of the collection
    ///
    /// The result is rounded up and kept within the generation's bounds. An
    /// observed ratio exactly equal to the target leaves the threshold as is.
    ///
    /// # Errors
    ///
    /// Returns [`GcError::DegenerateRatio`] if `generation_size` is zero and
    /// [`GcError::InvalidConfig`] if the generation's bounds are inverted.
    pub fn adapt(
        &self,
        index: usize,
        generation: &Generation,
        generation_size: u64,
        collected: u64,
    ) -> GcResult<u64> {
        if generation_size == 0 {
            return Err(GcError::degenerate_ratio(index));
        }
        if generation.min_threshold > generation.max_threshold {
            return Err(GcError::invalid_config(format!(
                "generation {index}: min_threshold {} exceeds max_threshold {}",
                generation.min_threshold, generation.max_threshold
            )));
        }

        let threshold = generation.threshold as f64;
        let target = generation.target;
        let ratio = collected as f64 / generation_size as f64;

        let next = if ratio > target {
            let bound = generation.min_threshold as f64;
            threshold + (bound - threshold) * self.weight(ratio - target)
        } else if ratio < target {
            let bound = generation.max_threshold as f64;
            threshold + (bound - threshold) * self.weight(target - ratio)
        } else {
            threshold
        };

        Ok((next.ceil() as u64).clamp(generation.min_threshold, generation.max_threshold))
    }
}

impl ThresholdPolicy for ThresholdController {
    fn adapt(
        &self,
        index: usize,
        generation: &Generation,
        generation_size: u64,
        collected: u64,
    ) -> GcResult<u64> {
        ThresholdController::adapt(self, index, generation, generation_size, collected)
    }

    fn name(&self) -> &str {
        "logistic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GenerationConfig;

    fn young() -> Generation {
        Generation::new(&GenerationConfig::new(700, 0.2, 700, 5000))
    }

    #[test]
    fn test_weight_shape() {
        let controller = ThresholdController::new();
        assert!((controller.weight(0.5) - 0.5).abs() < 1e-12);
        assert!(controller.weight(0.0) < 0.01);
        assert!(controller.weight(1.0) > 0.99);
        assert!(controller.weight(0.1) < controller.weight(0.2));
    }

    #[test]
    fn test_low_trash_grows_threshold() {
        // ratio 14/700 = 0.02, error 0.18, weight ~0.0392
        let controller = ThresholdController::new();
        assert_eq!(controller.adapt(0, &young(), 700, 14).unwrap(), 869);
    }

    #[test]
    fn test_high_trash_shrinks_threshold() {
        let controller = ThresholdController::new();
        let mut generation = young();
        generation.threshold = 3000;

        let next = controller.adapt(0, &generation, 100, 90).unwrap();
        assert!(next < 3000);
        assert!(next >= 700);
    }

    #[test]
    fn test_ratio_at_target_is_noop() {
        let controller = ThresholdController::new();
        let mut generation = young();
        generation.threshold = 1234;

        // 1/5 == 0.2 exactly in binary floating point
        assert_eq!(controller.adapt(0, &generation, 5, 1).unwrap(), 1234);
    }

    #[test]
    fn test_zero_size_is_degenerate() {
        let controller = ThresholdController::new();
        let err = controller.adapt(3, &young(), 0, 0).unwrap_err();
        assert!(matches!(err, GcError::DegenerateRatio { generation: 3 }));
    }

    #[test]
    fn test_result_stays_within_bounds() {
        let controller = ThresholdController::new();
        let generation = Generation::new(&GenerationConfig::new(10, 0.4, 10, 200));

        for collected in 0..=100 {
            let next = controller.adapt(1, &generation, 100, collected).unwrap();
            assert!((10..=200).contains(&next), "collected={collected} next={next}");
        }
    }

    #[test]
    fn test_threshold_at_bound_stays_there() {
        let controller = ThresholdController::new();
        let mut generation = young();
        generation.threshold = 5000;
        assert_eq!(controller.adapt(0, &generation, 700, 0).unwrap(), 5000);

        generation.threshold = 700;
        assert_eq!(controller.adapt(0, &generation, 700, 700).unwrap(), 700);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let controller = ThresholdController::new();
        let generation = Generation::new(&GenerationConfig::new(15, 0.5, 20, 10));

        let err = controller.adapt(0, &generation, 100, 10).unwrap_err();
        assert!(matches!(err, GcError::InvalidConfig(_)));
    }

    #[test]
    fn test_policy_name() {
        assert_eq!(ThresholdPolicy::name(&ThresholdController::new()), "logistic");
    }
}
