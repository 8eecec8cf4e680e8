//! Simulation driver
//!
//! Each step allocates one threshold's worth of objects into generation 0 and
//! then runs a collection step on whichever generation is due.

use crate::collection::{self, CollectionOutcome};
use crate::config::{IdlePolicy, SimulationConfig};
use crate::controller::ThresholdController;
use crate::history::{CollectionEvent, CollectionHistory};
use crate::stats::SimulationStats;
use crate::traits::ThresholdPolicy;
use crate::{GcResult, GenerationSet};

/// Owns the generation set and runs the allocate/collect loop
#[derive(Debug)]
pub struct Simulator<P = ThresholdController> {
    /// 配置
    config: SimulationConfig,
    /// 各代状态
    generations: GenerationSet,
    /// 阈值策略
    policy: P,
    /// 统计信息
    stats: SimulationStats,
    /// 回收历史
    history: CollectionHistory,
    /// 已执行的步数
    iteration: u64,
}

impl Simulator<ThresholdController> {
    /// Create a simulator using the logistic controller
    ///
    /// # Errors
    ///
    /// Returns [`crate::GcError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: SimulationConfig) -> GcResult<Self> {
        Self::with_policy(config, ThresholdController::default())
    }
}

impl<P: ThresholdPolicy> Simulator<P> {
    /// Create a simulator with a custom threshold policy
    ///
    /// # Errors
    ///
    /// Returns [`crate::GcError::InvalidConfig`] if the configuration is invalid.
    pub fn with_policy(config: SimulationConfig, policy: P) -> GcResult<Self> {
        config.validate()?;
        let generations = GenerationSet::new(&config.generations)?;
        let stats = SimulationStats::new(generations.len());
        let history = CollectionHistory::new(config.history_capacity);

        Ok(Self {
            config,
            generations,
            policy,
            stats,
            history,
            iteration: 0,
        })
    }

    /// Allocate a threshold's worth of objects, then collect if due
    ///
    /// Returns the collection event, or `None` if the idle policy skipped it.
    pub fn step(&mut self) -> GcResult<Option<CollectionEvent>> {
        self.iteration += 1;

        let objects = self
            .generations
            .get(0)
            .map_or(0, |young| young.threshold);
        self.generations.allocate(objects, self.config.trash_ratio);
        self.stats.record_step(objects);

        self.collect_pending()
    }

    /// Run a collection step without allocating first
    pub fn collect_pending(&mut self) -> GcResult<Option<CollectionEvent>> {
        let target = match self.config.idle_policy {
            IdlePolicy::CollectYoungest => self.generations.select_collection_target(),
            IdlePolicy::Skip => match self.generations.overdue_generation() {
                Some(index) => index,
                None => {
                    log::trace!("step {}: nothing overdue, skipping", self.iteration);
                    self.stats.record_skip();
                    return Ok(None);
                }
            },
        };

        let before = self.generations.snapshot();
        let outcome = self.collect(target)?;
        let event = CollectionEvent {
            iteration: self.iteration,
            outcome,
            before,
            after: self.generations.snapshot(),
        };
        self.history.push(event.clone());

        Ok(Some(event))
    }

    /// Collect a specific generation
    ///
    /// # Errors
    ///
    /// Returns [`crate::GcError::GenerationOutOfRange`] for an unknown index.
    pub fn collect(&mut self, index: usize) -> GcResult<CollectionOutcome> {
        let outcome = collection::collect(
            &mut self.generations,
            index,
            self.config.long_lived_ratio,
            &self.policy,
        )?;
        self.stats.record_collection(&outcome);
        Ok(outcome)
    }

    /// Run the configured number of iterations
    pub fn run<F>(&mut self, observer: F) -> GcResult<()>
    where
        F: FnMut(&CollectionEvent),
    {
        self.run_for(self.config.iterations, observer)
    }

    /// Run `iterations` steps, handing each collection event to `observer`
    pub fn run_for<F>(&mut self, iterations: u64, mut observer: F) -> GcResult<()>
    where
        F: FnMut(&CollectionEvent),
    {
        log::info!(
            "simulating {iterations} iterations over {} generations ({} policy)",
            self.generations.len(),
            self.policy.name()
        );

        for _ in 0..iterations {
            if let Some(event) = self.step()? {
                observer(&event);
            }
        }

        log::info!(
            "finished after {} iterations: {} collections, {} full",
            self.iteration,
            self.stats.collections,
            self.stats.full_collections
        );
        Ok(())
    }

    /// Generation state
    pub fn generations(&self) -> &GenerationSet {
        &self.generations
    }

    /// Accumulated statistics
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// Recent collection events
    pub fn history(&self) -> &CollectionHistory {
        &self.history
    }

    /// Steps executed so far
    pub fn iteration(&self) -> u64 {
        self.iteration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedThreshold, GcError};

    #[test]
    fn test_simulator_creation() {
        let simulator = Simulator::new(SimulationConfig::default()).unwrap();
        assert_eq!(simulator.iteration(), 0);
        assert_eq!(simulator.generations().len(), 3);
        assert!(simulator.history().is_empty());
        assert!(format!("{simulator:?}").starts_with("Simulator"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SimulationConfig::default();
        config.generations[1].min_threshold = 500;
        assert!(matches!(Simulator::new(config), Err(GcError::InvalidConfig(_))));
    }

    #[test]
    fn test_first_step() {
        let mut simulator = Simulator::new(SimulationConfig::default()).unwrap();
        let event = simulator.step().unwrap().unwrap();

        assert_eq!(event.iteration, 1);
        assert_eq!(event.generation(), 0);
        assert_eq!(event.before[0].count, 700);
        assert_eq!(event.before[0].trash, 14);
        assert_eq!(event.after[0].threshold, 869);
        assert_eq!(event.after[1].size, 700);
        assert_eq!(simulator.stats().total_allocated, 700);
        assert_eq!(simulator.history().len(), 1);
    }

    #[test]
    fn test_skip_policy() {
        let config = SimulationConfig {
            idle_policy: IdlePolicy::Skip,
            ..SimulationConfig::default()
        };
        let mut simulator = Simulator::with_policy(config, FixedThreshold).unwrap();

        // 700 allocations do not exceed a threshold of 700
        assert!(simulator.step().unwrap().is_none());
        assert_eq!(simulator.stats().skipped, 1);

        let event = simulator.step().unwrap().unwrap();
        assert_eq!(event.outcome.total_size, 1400);
    }

    #[test]
    fn test_collect_youngest_picks_oldest_overdue() {
        let mut simulator = Simulator::new(SimulationConfig::default()).unwrap();
        for _ in 0..11 {
            assert_eq!(simulator.step().unwrap().unwrap().generation(), 0);
        }

        // generation 1 passes its threshold of 10 promotions on step 12
        let event = simulator.step().unwrap().unwrap();
        assert_eq!(event.generation(), 1);
        assert_eq!(event.before[1].count, 11);
    }

    #[test]
    fn test_run_invokes_observer() {
        let config = SimulationConfig {
            iterations: 25,
            history_capacity: 8,
            ..SimulationConfig::default()
        };
        let mut simulator = Simulator::new(config).unwrap();
        let mut seen = Vec::new();
        simulator.run(|event| seen.push(event.generation())).unwrap();

        assert_eq!(seen.len(), 25);
        assert_eq!(simulator.iteration(), 25);
        assert_eq!(simulator.stats().collections, 25);
        assert_eq!(simulator.history().len(), 8);
        assert!(seen.contains(&1));
    }

    #[test]
    fn test_collect_out_of_range() {
        let mut simulator = Simulator::new(SimulationConfig::default()).unwrap();
        assert!(matches!(
            simulator.collect(7),
            Err(GcError::GenerationOutOfRange { index: 7, .. })
        ));
    }
}
