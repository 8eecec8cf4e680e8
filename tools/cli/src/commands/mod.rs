//! CLI commands

pub mod simulate;

pub use simulate::SimulateCommand;
