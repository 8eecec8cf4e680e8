//! Simulation statistics

use serde::{Deserialize, Serialize};

use crate::collection::CollectionOutcome;

/// Per-generation counters accumulated over a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Times this generation was the collection target
    pub collections: u64,
    /// Lowest threshold observed after adaptation
    pub min_threshold_seen: u64,
    /// Highest threshold observed after adaptation
    pub max_threshold_seen: u64,
    /// Last threshold assigned
    pub last_threshold: u64,
}

/// Simulation statistics
///
/// Tracks what the driving loop did across all steps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Steps executed
    pub iterations: u64,

    /// Collection steps performed
    pub collections: u64,

    /// Collections of the oldest generation
    pub full_collections: u64,

    /// Steps where nothing was overdue and the idle policy skipped collection
    pub skipped: u64,

    /// Objects allocated into generation 0
    pub total_allocated: u64,

    /// Objects promoted into an older generation (or back into the oldest)
    pub total_promoted: u64,

    /// Trash examined by collections
    pub total_trash_collected: u64,

    /// Collections whose threshold adaptation was skipped
    pub degenerate_adaptations: u64,

    /// Per-generation breakdown, youngest first
    pub generations: Vec<GenerationStats>,
}

impl SimulationStats {
    /// Create statistics for `generations` tiers
    pub fn new(generations: usize) -> Self {
        Self {
            generations: vec![GenerationStats::default(); generations],
            ..Self::default()
        }
    }

    /// Record a driver step and the objects it allocated
    pub fn record_step(&mut self, allocated: u64) {
        self.iterations += 1;
        self.total_allocated += allocated;
    }

    /// Record a collection step
    pub fn record_collection(&mut self, outcome: &CollectionOutcome) {
        self.collections += 1;
        if outcome.full {
            self.full_collections += 1;
        }
        if !outcome.adapted {
            self.degenerate_adaptations += 1;
        }
        self.total_promoted += outcome.total_size;
        self.total_trash_collected += outcome.total_trash;

        if let Some(generation) = self.generations.get_mut(outcome.generation) {
            if generation.collections == 0 {
                generation.min_threshold_seen = outcome.new_threshold;
                generation.max_threshold_seen = outcome.new_threshold;
            } else {
                generation.min_threshold_seen =
                    generation.min_threshold_seen.min(outcome.new_threshold);
                generation.max_threshold_seen =
                    generation.max_threshold_seen.max(outcome.new_threshold);
            }
            generation.collections += 1;
            generation.last_threshold = outcome.new_threshold;
        }
    }

    /// Record a skipped step
    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Share of collections that targeted generation `index` (0.0 - 1.0)
    pub fn collection_share(&self, index: usize) -> f64 {
        if self.collections == 0 {
            return 0.0;
        }
        self.generations
            .get(index)
            .map_or(0.0, |g| g.collections as f64 / self.collections as f64)
    }

    /// Fraction of examined objects that were trash (0.0 - 1.0)
    pub fn trash_ratio(&self) -> f64 {
        if self.total_promoted == 0 {
            return 0.0;
        }
        self.total_trash_collected as f64 / self.total_promoted as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(generation: usize, full: bool, new_threshold: u64) -> CollectionOutcome {
        CollectionOutcome {
            generation,
            promoted_into: generation + usize::from(!full),
            full,
            total_size: 100,
            total_trash: 10,
            retained_trash: 1,
            old_threshold: 50,
            new_threshold,
            adapted: true,
        }
    }

    #[test]
    fn test_stats_default() {
        let stats = SimulationStats::new(3);
        assert_eq!(stats.collections, 0);
        assert_eq!(stats.generations.len(), 3);
        assert_eq!(stats.collection_share(0), 0.0);
        assert_eq!(stats.trash_ratio(), 0.0);
    }

    #[test]
    fn test_record_collection() {
        let mut stats = SimulationStats::new(3);
        stats.record_collection(&outcome(0, false, 80));
        stats.record_collection(&outcome(0, false, 60));
        stats.record_collection(&outcome(2, true, 20));

        assert_eq!(stats.collections, 3);
        assert_eq!(stats.full_collections, 1);
        assert_eq!(stats.total_promoted, 300);
        assert_eq!(stats.generations[0].collections, 2);
        assert_eq!(stats.generations[0].min_threshold_seen, 60);
        assert_eq!(stats.generations[0].max_threshold_seen, 80);
        assert_eq!(stats.generations[0].last_threshold, 60);
        assert!((stats.collection_share(2) - 1.0 / 3.0).abs() < 1e-12);
        assert!((stats.trash_ratio() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_and_skip() {
        let mut stats = SimulationStats::new(1);
        let mut empty = outcome(0, true, 50);
        empty.adapted = false;
        stats.record_collection(&empty);
        stats.record_skip();
        stats.record_step(42);

        assert_eq!(stats.degenerate_adaptations, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.total_allocated, 42);
        assert_eq!(stats.iterations, 1);
    }
}
