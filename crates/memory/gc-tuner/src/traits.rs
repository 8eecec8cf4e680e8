//! Threshold policy traits

use crate::{GcResult, Generation};

/// Threshold adaptation policy
///
/// Maps a generation's tuning parameters and the outcome of a collection to
/// the threshold it should use next.
pub trait ThresholdPolicy {
    /// Compute the next threshold for `generation`
    ///
    /// `generation_size` is the number of objects the collection examined and
    /// `collected` the number found to be trash.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GcError::DegenerateRatio`] if `generation_size` is zero.
    fn adapt(
        &self,
        index: usize,
        generation: &Generation,
        generation_size: u64,
        collected: u64,
    ) -> GcResult<u64>;

    /// Get policy name
    fn name(&self) -> &str;
}

/// Policy that never moves a threshold
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedThreshold;

impl ThresholdPolicy for FixedThreshold {
    fn adapt(
        &self,
        _index: usize,
        generation: &Generation,
        _generation_size: u64,
        _collected: u64,
    ) -> GcResult<u64> {
        Ok(generation.threshold)
    }

    fn name(&self) -> &str {
        "fixed"
    }
}
