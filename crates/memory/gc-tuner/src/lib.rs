//! # GC Threshold Tuning Crate
//!
//! A numeric model of a multi-generation collector's collection thresholds.
//! There are no objects here, only aggregate counters: each generation tracks
//! how many allocations it has seen, how many objects it holds and how many of
//! those are trash. After every collection the collected generation's
//! threshold is recomputed so that its trash ratio drifts toward a target.
//!
//! ## Architecture
//!
//! ```text
//!   Simulator (driving loop)
//!        │ allocate / select / collect
//!        ▼
//!   GenerationSet ──► collection::collect ──► ThresholdPolicy
//!                                              (ThresholdController)
//! ```
//!
//! ## Usage
//!
//! ```
//! use gc_tuner::{SimulationConfig, Simulator};
//!
//! let config = SimulationConfig {
//!     iterations: 100,
//!     ..SimulationConfig::default()
//! };
//! let mut simulator = Simulator::new(config).unwrap();
//! simulator.run(|event| println!("collect {}", event.generation())).unwrap();
//!
//! assert_eq!(simulator.stats().collections, 100);
//! ```

#![warn(missing_docs)]
#![warn(unused_imports)]

pub mod collection;
pub mod config;
pub mod controller;
pub mod error;
pub mod generation;
pub mod history;
pub mod report;
pub mod simulator;
pub mod stats;
pub mod traits;

// Re-export common types
pub use error::{GcError, GcResult};
pub use stats::{GenerationStats, SimulationStats};
pub use traits::{FixedThreshold, ThresholdPolicy};

// Re-export configuration types
pub use config::{GenerationConfig, IdlePolicy, SimulationConfig};

// Re-export core model types
pub use collection::{CollectionOutcome, collect};
pub use controller::ThresholdController;
pub use generation::{Generation, GenerationSet, GenerationSnapshot};

// Re-export driver and reporting types
pub use history::{CollectionEvent, CollectionHistory};
pub use report::{ReportFormat, Reporter};
pub use simulator::Simulator;
