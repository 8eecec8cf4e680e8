//! # Simulate Command
//!
//! Runs the allocate/collect loop and prints one report per collection

use std::io::Write;

use anyhow::Context;
use gc_tuner::{ReportFormat, Reporter, SimulationConfig, SimulationStats, Simulator};

/// Simulation command
pub struct SimulateCommand {
    /// Effective configuration
    config: SimulationConfig,
    /// Output format
    format: ReportFormat,
    /// Print every Nth collection (default: 1)
    every: u64,
    /// Suppress per-collection output
    summary_only: bool,
}

impl SimulateCommand {
    /// Create new simulate command
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            format: ReportFormat::Text,
            every: 1,
            summary_only: false,
        }
    }

    /// Set output format
    pub fn format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    /// Set sampling interval
    pub fn every(mut self, every: u64) -> Self {
        self.every = every;
        self
    }

    /// Only print the final summary
    pub fn summary_only(mut self, summary_only: bool) -> Self {
        self.summary_only = summary_only;
        self
    }

    /// Run the simulation, writing reports to `out`
    pub fn run<W: Write>(self, out: W) -> anyhow::Result<SimulationStats> {
        let mut simulator =
            Simulator::new(self.config).context("invalid simulation configuration")?;
        let mut reporter = Reporter::new(out, self.format).with_sampling(self.every);

        let mut write_error = None;
        let summary_only = self.summary_only;
        simulator.run(|event| {
            if summary_only || write_error.is_some() {
                return;
            }
            if let Err(e) = reporter.event(event) {
                write_error = Some(e);
            }
        })?;
        if let Some(e) = write_error {
            return Err(e).context("failed to write collection report");
        }

        reporter
            .summary(simulator.stats(), simulator.generations(), simulator.history())
            .context("failed to write summary")?;

        Ok(simulator.stats().clone())
    }
}
