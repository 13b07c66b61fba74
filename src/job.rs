//! Job files: one JSON document naming the input, both outputs, and optional overrides
//! for every `AggregateConfig` option. Anything left out takes the config default.

use crate::aggregate::{aggregate, render_summary};
use crate::config::AggregateConfig;
use crate::table_io::{load_records, write_table, write_table_tsv};
use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use time::macros::format_description;
use time::{Duration, UtcOffset};

/// Serialized form of the two output tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Ndjson,
    Tsv,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct JobSpec {
    pub input: PathBuf,
    pub tweet_counts_out: PathBuf,
    pub user_counts_out: PathBuf,
    #[serde(default)]
    pub output_format: OutputFormat,

    #[serde(default)]
    pub probability_column: Option<String>,
    #[serde(default)]
    pub timestamp_column: Option<String>,
    #[serde(default)]
    pub author_column: Option<String>,
    #[serde(default)]
    pub worker_count: Option<usize>,
    #[serde(default)]
    pub window_granularity: Option<String>, // "1d", "6h", "D", ...
    #[serde(default)]
    pub window_offset: Option<String>,      // "UTC", "-05:00", ...
    #[serde(default)]
    pub probability_threshold: Option<f64>,
    #[serde(default)]
    pub user_ratio_threshold: Option<f64>,
    #[serde(default)]
    pub progress: Option<bool>,
}

impl JobSpec {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("read job file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parse job file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Resolve overrides onto the defaults. Range checks are left to `AggregateConfig::validate`.
    /// Jobs show progress bars unless the file says otherwise.
    pub fn to_config(&self) -> Result<AggregateConfig> {
        let mut c = AggregateConfig::default().with_progress(true);
        if let Some(col) = &self.probability_column { c = c.with_probability_column(col.clone()); }
        if let Some(col) = &self.timestamp_column { c = c.with_timestamp_column(col.clone()); }
        if let Some(col) = &self.author_column { c = c.with_author_column(col.clone()); }
        if let Some(n) = self.worker_count { c = c.with_worker_count(n); }
        if let Some(g) = &self.window_granularity { c = c.with_window_granularity(parse_granularity(g)?); }
        if let Some(o) = &self.window_offset { c = c.with_window_offset(parse_offset(o)?); }
        if let Some(t) = self.probability_threshold { c = c.with_probability_threshold(t); }
        if let Some(r) = self.user_ratio_threshold { c = c.with_user_ratio_threshold(r); }
        if let Some(p) = self.progress { c = c.with_progress(p); }
        Ok(c)
    }
}

const GRANULARITY_PATTERN: &str = r"^\s*(\d+)?\s*([A-Za-z]+)\s*$";

/// Parse a window length: an optional count followed by a unit.
/// Units: `w`/`week`, `d`/`day`/`D`, `h`/`hour`/`H`, `m`/`min`/`T`, `s`/`sec`/`S`.
pub fn parse_granularity(s: &str) -> Result<Duration> {
    let re = Regex::new(GRANULARITY_PATTERN)?;
    let caps = re
        .captures(s)
        .ok_or_else(|| anyhow!("invalid window granularity {:?} (expected e.g. \"1d\", \"6h\")", s))?;
    let count: i32 = match caps.get(1) {
        Some(m) => m.as_str().parse().with_context(|| format!("invalid count in {:?}", s))?,
        None => 1,
    };
    if count <= 0 {
        bail!("window granularity must be positive, got {:?}", s);
    }
    let unit = match caps.get(2).map(|m| m.as_str()).unwrap_or("") {
        "w" | "W" | "week" | "weeks" => Duration::WEEK,
        "d" | "D" | "day" | "days" => Duration::DAY,
        "h" | "H" | "hour" | "hours" => Duration::HOUR,
        "m" | "T" | "min" | "mins" | "minute" | "minutes" => Duration::MINUTE,
        "s" | "S" | "sec" | "secs" | "second" | "seconds" => Duration::SECOND,
        other => bail!("unknown window unit {:?} in {:?}", other, s),
    };
    unit.checked_mul(count)
        .ok_or_else(|| anyhow!("window granularity {:?} is too large", s))
}

/// Parse `UTC`, `Z`, or a `±HH:MM` offset.
pub fn parse_offset(s: &str) -> Result<UtcOffset> {
    let t = s.trim();
    if t.eq_ignore_ascii_case("utc") || t == "Z" {
        return Ok(UtcOffset::UTC);
    }
    UtcOffset::parse(t, format_description!("[offset_hour sign:mandatory]:[offset_minute]"))
        .with_context(|| format!("invalid window offset {:?} (expected \"UTC\" or \"±HH:MM\")", s))
}

/// Load, aggregate, write both tables. Returns the rendered summary of both tables.
pub fn run_job(job: &JobSpec) -> Result<String> {
    let config = job.to_config()?;
    config.validate()?;

    tracing::info!("loading {}", job.input.display());
    let records = load_records(&job.input, &config)?;
    let (tweets, users) = aggregate(&records, &config)?;

    match job.output_format {
        OutputFormat::Ndjson => {
            write_table(&job.tweet_counts_out, &tweets)?;
            write_table(&job.user_counts_out, &users)?;
        }
        OutputFormat::Tsv => {
            write_table_tsv(&job.tweet_counts_out, &tweets)?;
            write_table_tsv(&job.user_counts_out, &users)?;
        }
    }
    Ok(render_summary(&tweets, &users))
}
