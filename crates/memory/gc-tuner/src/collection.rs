//! Collection step: aggregate, promote, account for long-lived trash, adapt
//!
//! Collecting generation `g` also collects every younger generation. Their
//! counters are summed, reset, and the survivors promoted into generation
//! `g + 1` (or back into `g` itself when `g` is the oldest, i.e. a full
//! collection). The threshold of `g` is then adapted from the combined churn.
//!
//! Liveness is modelled conservatively: a fixed fraction of promoted objects is
//! recorded as trash on the receiving generation, standing in for objects kept
//! alive only by references from older generations. The selection policy does
//! not take that retained trash into account.

use serde::{Deserialize, Serialize};

use crate::traits::ThresholdPolicy;
use crate::{GcError, GcResult, GenerationSet};

/// Result of a single collection step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollectionOutcome {
    /// Generation that was collected
    pub generation: usize,
    /// Generation that received the survivors
    pub promoted_into: usize,
    /// Whether the oldest generation was collected
    pub full: bool,
    /// Size summed over generations `0..=generation`
    pub total_size: u64,
    /// Trash summed over generations `0..=generation`
    pub total_trash: u64,
    /// Trash recorded on the receiving generation afterwards
    pub retained_trash: u64,
    /// Threshold of the collected generation before adaptation
    pub old_threshold: u64,
    /// Threshold of the collected generation after adaptation
    pub new_threshold: u64,
    /// False when adaptation was skipped for an empty collection
    pub adapted: bool,
}

/// Collect generation `index` and adapt its threshold with `policy`
///
/// A [`GcError::DegenerateRatio`] from the policy is absorbed: the threshold
/// is left unchanged and the outcome reports `adapted == false`.
///
/// # Errors
///
/// Returns [`GcError::GenerationOutOfRange`] if `index` is not in the set, or
/// any other error the policy reports.
pub fn collect<P>(
    set: &mut GenerationSet,
    index: usize,
    long_lived_ratio: f64,
    policy: &P,
) -> GcResult<CollectionOutcome>
where
    P: ThresholdPolicy + ?Sized,
{
    let len = set.len();
    if index >= len {
        return Err(GcError::out_of_range(index, len));
    }
    let promoted_into = (index + 1).min(set.oldest());
    let full = promoted_into == index;

    let mut total_size = 0u64;
    let mut total_trash = 0u64;
    for younger in 0..=index {
        let generation = set
            .get_mut(younger)
            .ok_or_else(|| GcError::out_of_range(younger, len))?;
        total_size += generation.size;
        total_trash += generation.trash;
        generation.reset();
    }

    let older = set
        .get_mut(promoted_into)
        .ok_or_else(|| GcError::out_of_range(promoted_into, len))?;
    older.size += total_size;
    older.count += 1;
    older.trash = if full {
        0
    } else {
        (total_size as f64 * long_lived_ratio).floor() as u64
    };
    let retained_trash = older.trash;

    let collected = set
        .get_mut(index)
        .ok_or_else(|| GcError::out_of_range(index, len))?;
    let old_threshold = collected.threshold;
    let (new_threshold, adapted) = match policy.adapt(index, collected, total_size, total_trash) {
        Ok(threshold) => (threshold, true),
        Err(GcError::DegenerateRatio { .. }) => {
            log::warn!("generation {index} collected nothing, keeping threshold {old_threshold}");
            (old_threshold, false)
        }
        Err(err) => return Err(err),
    };
    collected.threshold = new_threshold;

    log::debug!(
        "collected gen{index} into gen{promoted_into}: size={total_size} trash={total_trash} \
         threshold {old_threshold} -> {new_threshold}"
    );

    Ok(CollectionOutcome {
        generation: index,
        promoted_into,
        full,
        total_size,
        total_trash,
        retained_trash,
        old_threshold,
        new_threshold,
        adapted,
    })
}
