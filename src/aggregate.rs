//! Aggregation core: the per-window reducer trait, ordered result tables, and the
//! `aggregate` entry point tying filter, windowing and execution together.

use crate::concurrency::Executor;
use crate::config::AggregateConfig;
use crate::counting::{TweetCountRow, TweetCounter};
use crate::error::AggregateResult;
use crate::filters::filter_records;
use crate::ingest::records_from_values;
use crate::record::{FilteredRecord, Record};
use crate::users::{UserCountRow, UserCounter};
use crate::window::{partition_windows, WindowKey};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Write as _;
use std::time::Instant;
use time::Date;

/// A pure per-window reducer. Implementations must not keep state between windows:
/// the same window may be reduced on any worker, in any order.
pub trait WindowAggregator: Sync {
    type Row: WindowRow + Send;

    /// Label used for progress and logs.
    fn label(&self) -> &'static str;

    fn aggregate(&self, key: WindowKey, records: &[FilteredRecord<'_>]) -> Self::Row;
}

/// A result row keyed by its window.
pub trait WindowRow {
    fn window(&self) -> WindowKey;
    /// Column names of the numeric fields, in `values()` order.
    fn header() -> &'static [&'static str];
    fn values(&self) -> Vec<u64>;
}

/// Rows ordered ascending by window start, one per non-empty window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultTable<R> {
    rows: Vec<R>,
}

impl<R> Default for ResultTable<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<R: WindowRow> ResultTable<R> {
    /// Merge step: order partial results by window start. Applied to every run,
    /// whatever order the rows were produced in.
    pub fn merge(mut rows: Vec<R>) -> Self {
        rows.sort_by_key(|r| r.window());
        Self { rows }
    }

    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
    pub fn rows(&self) -> &[R] { &self.rows }
    pub fn iter(&self) -> std::slice::Iter<'_, R> { self.rows.iter() }
    pub fn into_rows(self) -> Vec<R> { self.rows }

    pub fn get(&self, key: &WindowKey) -> Option<&R> {
        self.rows
            .binary_search_by(|r| r.window().cmp(key))
            .ok()
            .map(|i| &self.rows[i])
    }

    /// First row whose window starts on `date` (in the window offset).
    pub fn get_date(&self, date: Date) -> Option<&R> {
        self.rows.iter().find(|r| r.window().date() == date)
    }

    /// Plain-text rendering: a header line, then one line per window.
    pub fn to_text(&self) -> String {
        let header = R::header();
        let mut out = String::new();
        let _ = write!(out, "{:<20}", "window");
        for h in header {
            let _ = write!(out, " {:>20}", h);
        }
        out.push('\n');
        for r in &self.rows {
            let _ = write!(out, "{:<20}", r.window().to_string());
            for v in r.values() {
                let _ = write!(out, " {:>20}", v);
            }
            out.push('\n');
        }
        out
    }
}

impl<'t, R> IntoIterator for &'t ResultTable<R> {
    type Item = &'t R;
    type IntoIter = std::slice::Iter<'t, R>;
    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Both output tables of one run.
pub type CampTables = (ResultTable<TweetCountRow>, ResultTable<UserCountRow>);

/// Run the full aggregation over typed records: filter, window, then both reducers.
/// Configuration is validated before any record is touched.
pub fn aggregate(records: &[Record], config: &AggregateConfig) -> AggregateResult<CampTables> {
    config.validate()?;
    tracing::info!(
        "threshold: {}  r_threshold: {}  granularity: {}",
        config.probability_threshold,
        config.user_ratio_threshold,
        config.window_granularity
    );

    let t0 = Instant::now();
    let filtered = filter_records(records, config.probability_threshold);
    let kept = filtered.len();
    let windows = partition_windows(filtered, config.window_granularity, config.window_offset)?;
    if windows.is_empty() {
        tracing::info!("no records survived filtering ({} in); returning empty tables", records.len());
        return Ok((ResultTable::default(), ResultTable::default()));
    }

    let exec = Executor::for_config(config, windows.len())?;
    tracing::info!(
        "computing stats over {} windows ({} of {} records kept, {} workers)",
        windows.len(),
        kept,
        records.len(),
        exec.workers()
    );

    let tweets = exec.run(&windows, &TweetCounter, config.progress);
    let users = exec.run(&windows, &UserCounter::new(config.user_ratio_threshold), config.progress);

    tracing::info!("finished in {:.3}s", t0.elapsed().as_secs_f64());
    Ok((tweets, users))
}

/// Same as `aggregate`, starting from untyped rows that go through the schema boundary first.
pub fn aggregate_rows(rows: &[Value], config: &AggregateConfig) -> AggregateResult<CampTables> {
    config.validate()?;
    let records = records_from_values(rows, config)?;
    aggregate(&records, config)
}

/// Combined report: both tables under their headings.
pub fn render_summary(tweets: &ResultTable<TweetCountRow>, users: &ResultTable<UserCountRow>) -> String {
    format!(
        "\nNumber of tweets per window in each camp:\n{}\nNumber of users per window in each camp:\n{}",
        tweets.to_text(),
        users.to_text()
    )
}
