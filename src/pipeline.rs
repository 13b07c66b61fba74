use crate::aggregate::{aggregate, aggregate_rows, CampTables};
use crate::config::AggregateConfig;
use crate::table_io::load_records;
use crate::util::init_tracing_once;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use time::{Duration, UtcOffset};

use crate::record::Record;

/// Builder-style front door over `aggregate`: chain options, then run on records,
/// untyped rows, or an NDJSON file.
#[derive(Clone, Debug, Default)]
pub struct CampStats {
    pub(crate) opts: AggregateConfig,
}

impl CampStats {
    pub fn new() -> Self {
        Self { opts: AggregateConfig::default() }
    }

    pub fn from_config(opts: AggregateConfig) -> Self {
        Self { opts }
    }

    // -------- Builder methods --------
    pub fn probability_column(mut self, name: impl Into<String>) -> Self { self.opts = self.opts.with_probability_column(name); self }
    pub fn timestamp_column(mut self, name: impl Into<String>) -> Self { self.opts = self.opts.with_timestamp_column(name); self }
    pub fn author_column(mut self, name: impl Into<String>) -> Self { self.opts = self.opts.with_author_column(name); self }
    pub fn worker_count(mut self, n: usize) -> Self { self.opts = self.opts.with_worker_count(n); self }
    pub fn parallel_threshold(mut self, windows: usize) -> Self { self.opts = self.opts.with_parallel_threshold(windows); self }
    pub fn window_granularity(mut self, g: Duration) -> Self { self.opts = self.opts.with_window_granularity(g); self }
    pub fn window_offset(mut self, offset: UtcOffset) -> Self { self.opts = self.opts.with_window_offset(offset); self }
    pub fn probability_threshold(mut self, t: f64) -> Self { self.opts = self.opts.with_probability_threshold(t); self }
    pub fn user_ratio_threshold(mut self, r: f64) -> Self { self.opts = self.opts.with_user_ratio_threshold(r); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }

    pub fn config(&self) -> &AggregateConfig {
        &self.opts
    }

    // -------- Operations --------

    pub fn run(&self, records: &[Record]) -> Result<CampTables> {
        init_tracing_once();
        Ok(aggregate(records, &self.opts)?)
    }

    pub fn run_rows(&self, rows: &[Value]) -> Result<CampTables> {
        init_tracing_once();
        Ok(aggregate_rows(rows, &self.opts)?)
    }

    /// Load an NDJSON (or `.zst`) input file, then aggregate it.
    pub fn run_file(&self, input: &Path) -> Result<CampTables> {
        init_tracing_once();
        self.opts.validate()?;
        let records = load_records(input, &self.opts)?;
        aggregate(&records, &self.opts).with_context(|| format!("aggregating {}", input.display()))
    }
}
