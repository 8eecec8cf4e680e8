//! Generation records and the ordered generation set
//!
//! Generations are indexed from 0 (youngest) upwards. Only generation 0 is
//! ever allocated into; older generations receive objects by promotion.

use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::{GcError, GcResult};

/// One tier of the generational model
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// Allocation count that triggers a collection
    pub threshold: u64,
    /// Desired trash-to-size ratio after collection
    pub target: f64,
    /// Lower bound for `threshold`
    pub min_threshold: u64,
    /// Upper bound for `threshold`
    pub max_threshold: u64,
    /// Allocations (or, for older generations, promotions) since the last reset
    pub count: u64,
    /// Live objects attributed to this generation
    pub size: u64,
    /// Objects known to be reclaimable
    pub trash: u64,
}

impl Generation {
    /// Create a generation with zeroed counters
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            threshold: config.threshold,
            target: config.target,
            min_threshold: config.min_threshold,
            max_threshold: config.max_threshold,
            count: 0,
            size: 0,
            trash: 0,
        }
    }

    /// Whether the allocation count has passed the threshold
    pub fn is_overdue(&self) -> bool {
        self.count > self.threshold
    }

    /// Zero the counters, keeping threshold and tuning parameters
    pub fn reset(&mut self) {
        self.count = 0;
        self.size = 0;
        self.trash = 0;
    }

    /// Capture the mutable part of the record
    pub fn snapshot(&self) -> GenerationSnapshot {
        GenerationSnapshot {
            count: self.count,
            size: self.size,
            trash: self.trash,
            threshold: self.threshold,
        }
    }
}

/// Point-in-time view of a generation's counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSnapshot {
    /// Allocation count
    pub count: u64,
    /// Live objects
    pub size: u64,
    /// Reclaimable objects
    pub trash: u64,
    /// Collection threshold
    pub threshold: u64,
}

/// Ordered generations, youngest first
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSet {
    generations: Vec<Generation>,
}

impl GenerationSet {
    /// Build a set from per-generation configuration
    ///
    /// # Errors
    ///
    /// Returns [`GcError::InvalidConfig`] if the list is empty or any
    /// generation has inconsistent bounds, target or initial threshold.
    pub fn new(configs: &[GenerationConfig]) -> GcResult<Self> {
        if configs.is_empty() {
            return Err(GcError::invalid_config("at least one generation is required"));
        }
        for (index, config) in configs.iter().enumerate() {
            config.validate(index)?;
        }
        Ok(Self {
            generations: configs.iter().map(Generation::new).collect(),
        })
    }

    /// Number of generations
    pub fn len(&self) -> usize {
        self.generations.len()
    }

    /// Always false for a constructed set
    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    /// Index of the oldest generation
    pub fn oldest(&self) -> usize {
        self.generations.len() - 1
    }

    /// Generation at `index`
    pub fn get(&self, index: usize) -> Option<&Generation> {
        self.generations.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Generation> {
        self.generations.get_mut(index)
    }

    /// Iterate youngest to oldest
    pub fn iter(&self) -> std::slice::Iter<'_, Generation> {
        self.generations.iter()
    }

    /// Add `n` new objects to generation 0, `ceil(n * trash_fraction)` of them trash
    ///
    /// `trash_fraction` is clamped to `[0, 1]`.
    pub fn allocate(&mut self, n: u64, trash_fraction: f64) {
        let trash = (n as f64 * trash_fraction.clamp(0.0, 1.0)).ceil() as u64;
        let young = &mut self.generations[0];
        young.count += n;
        young.size += n;
        young.trash += trash;
        log::trace!(
            "allocated {n} objects ({trash} trash), gen0 count={}",
            young.count
        );
    }

    /// Oldest generation whose count exceeds its threshold, if any
    pub fn overdue_generation(&self) -> Option<usize> {
        self.generations.iter().rposition(Generation::is_overdue)
    }

    /// Generation to collect next
    ///
    /// Scans from oldest to youngest and picks the first overdue generation,
    /// since collecting it also resets every younger one. Falls back to the
    /// youngest generation when nothing is overdue.
    pub fn select_collection_target(&self) -> usize {
        self.overdue_generation().unwrap_or(0)
    }

    /// Sum of `size` over all generations
    pub fn total_size(&self) -> u64 {
        self.generations.iter().map(|g| g.size).sum()
    }

    /// Sum of `trash` over all generations
    pub fn total_trash(&self) -> u64 {
        self.generations.iter().map(|g| g.trash).sum()
    }

    /// Snapshot every generation, youngest first
    pub fn snapshot(&self) -> Vec<GenerationSnapshot> {
        self.generations.iter().map(Generation::snapshot).collect()
    }
}

impl<'a> IntoIterator for &'a GenerationSet {
    type Item = &'a Generation;
    type IntoIter = std::slice::Iter<'a, Generation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
