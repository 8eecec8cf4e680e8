//! Console and JSON rendering of collection events

use std::fmt::Write as _;
use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::history::{CollectionEvent, CollectionHistory};
use crate::stats::SimulationStats;
use crate::{GcError, GcResult, GenerationSet};

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown report format '{other}' (expected text or json)")),
        }
    }
}

/// Format an integer with `,` between thousands groups
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Render an event as the collected index followed by one line per generation
///
/// Counters are shown as they were before the collection.
pub fn render_event_text(event: &CollectionEvent) -> String {
    let mut out = format!("collect {}\n", event.generation());
    for (index, generation) in event.before.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {index} count={} size={} trash={} threshold={}",
            generation.count,
            group_thousands(generation.size),
            generation.trash,
            generation.threshold
        );
    }
    out
}

/// Render an event as a single-line JSON object
pub fn render_event_json(event: &CollectionEvent) -> GcResult<String> {
    Ok(serde_json::to_string(event)?)
}

/// Render the end-of-run summary
///
/// Each generation line ends with its share of the retained history and the
/// mean trash ratio observed there next to its target, which shows whether
/// the threshold has settled.
pub fn render_summary(
    stats: &SimulationStats,
    generations: &GenerationSet,
    history: &CollectionHistory,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "iterations={} collections={} full={} skipped={} degenerate={}",
        stats.iterations,
        stats.collections,
        stats.full_collections,
        stats.skipped,
        stats.degenerate_adaptations
    );
    let _ = writeln!(
        out,
        "allocated={} promoted={} trash_ratio={:.4}",
        group_thousands(stats.total_allocated),
        group_thousands(stats.total_promoted),
        stats.trash_ratio()
    );
    for (index, generation) in generations.iter().enumerate() {
        let seen = stats.generations.get(index).cloned().unwrap_or_default();
        let observed = history
            .avg_trash_ratio(index)
            .map_or_else(|| "-".to_string(), |ratio| format!("{ratio:.4}"));
        let _ = writeln!(
            out,
            "  {index} collections={} share={:.4} threshold={} range=[{}, {}] size={} \
             recent_share={:.4} trash_ratio={observed} target={}",
            seen.collections,
            stats.collection_share(index),
            generation.threshold,
            seen.min_threshold_seen,
            seen.max_threshold_seen,
            group_thousands(generation.size),
            history.generation_frequency(index),
            generation.target
        );
    }
    out
}

/// Writes collection events to a sink, optionally sampling every Nth one
pub struct Reporter<W: Write> {
    out: W,
    format: ReportFormat,
    every: u64,
    seen: u64,
}

impl<W: Write> Reporter<W> {
    /// Create a reporter printing every event
    pub fn new(out: W, format: ReportFormat) -> Self {
        Self {
            out,
            format,
            every: 1,
            seen: 0,
        }
    }

    /// Only print every `every`-th event (values below 1 count as 1)
    pub fn with_sampling(mut self, every: u64) -> Self {
        self.every = every.max(1);
        self
    }

    /// Write an event if it falls on the sampling interval
    pub fn event(&mut self, event: &CollectionEvent) -> GcResult<()> {
        self.seen += 1;
        if (self.seen - 1) % self.every != 0 {
            return Ok(());
        }
        match self.format {
            ReportFormat::Text => self.out.write_all(render_event_text(event).as_bytes())?,
            ReportFormat::Json => writeln!(self.out, "{}", render_event_json(event)?)?,
        }
        Ok(())
    }

    /// Write the end-of-run summary
    pub fn summary(
        &mut self,
        stats: &SimulationStats,
        generations: &GenerationSet,
        history: &CollectionHistory,
    ) -> GcResult<()> {
        match self.format {
            ReportFormat::Text => {
                self.out
                    .write_all(render_summary(stats, generations, history).as_bytes())?;
            }
            ReportFormat::Json => {
                let json = serde_json::to_string(stats).map_err(GcError::from)?;
                writeln!(self.out, "{json}")?;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Recover the sink
    pub fn into_inner(self) -> W {
        self.out
    }
}
