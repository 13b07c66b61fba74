use crate::error::{AggregateError, AggregateResult};
use time::{Duration, UtcOffset};

/// Run parameters with sensible defaults and builder chaining.
/// Built once per run and passed down to every stage.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregateConfig {
    pub probability_column: String,
    pub timestamp_column: String,
    pub author_column: String,
    pub worker_count: usize,         // 1 forces the sequential strategy
    pub parallel_threshold: usize,   // fewer windows than this also run sequentially
    pub window_granularity: Duration,
    pub window_offset: UtcOffset,    // wall-clock used to place window boundaries
    pub probability_threshold: f64,
    pub user_ratio_threshold: f64,
    pub progress: bool,              // show a count bar per aggregation run
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            probability_column: "p_1".to_string(),
            timestamp_column: "timestamp".to_string(),
            author_column: "author_id".to_string(),
            worker_count: 6,
            parallel_threshold: 2,
            window_granularity: Duration::DAY,
            window_offset: UtcOffset::UTC,
            probability_threshold: 0.5,
            user_ratio_threshold: 0.5,
            progress: false,
        }
    }
}

impl AggregateConfig {
    pub fn with_probability_column(mut self, name: impl Into<String>) -> Self {
        self.probability_column = name.into();
        self
    }
    pub fn with_timestamp_column(mut self, name: impl Into<String>) -> Self {
        self.timestamp_column = name.into();
        self
    }
    pub fn with_author_column(mut self, name: impl Into<String>) -> Self {
        self.author_column = name.into();
        self
    }
    pub fn with_worker_count(mut self, n: usize) -> Self {
        self.worker_count = n;
        self
    }
    pub fn with_parallel_threshold(mut self, windows: usize) -> Self {
        self.parallel_threshold = windows;
        self
    }
    pub fn with_window_granularity(mut self, granularity: Duration) -> Self {
        self.window_granularity = granularity;
        self
    }
    pub fn with_window_offset(mut self, offset: UtcOffset) -> Self {
        self.window_offset = offset;
        self
    }
    pub fn with_probability_threshold(mut self, t: f64) -> Self {
        self.probability_threshold = t;
        self
    }
    pub fn with_user_ratio_threshold(mut self, r: f64) -> Self {
        self.user_ratio_threshold = r;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }

    /// Reject option values outside their domain. Called before any record is touched.
    pub fn validate(&self) -> AggregateResult<()> {
        check_unit_interval("probability_threshold", self.probability_threshold)?;
        check_unit_interval("user_ratio_threshold", self.user_ratio_threshold)?;
        if self.worker_count < 1 {
            return Err(AggregateError::config("worker_count", "must be at least 1"));
        }
        if self.parallel_threshold < 1 {
            return Err(AggregateError::config("parallel_threshold", "must be at least 1"));
        }
        if !self.window_granularity.is_positive() {
            return Err(AggregateError::config(
                "window_granularity",
                format!("must be a positive duration, got {}", self.window_granularity),
            ));
        }
        for (option, name) in [
            ("probability_column", &self.probability_column),
            ("timestamp_column", &self.timestamp_column),
            ("author_column", &self.author_column),
        ] {
            if name.trim().is_empty() {
                return Err(AggregateError::config(option, "column name must not be empty"));
            }
        }
        Ok(())
    }

    /// True when this run should use the worker pool for `windows` windows.
    pub fn use_pool(&self, windows: usize) -> bool {
        self.worker_count > 1 && windows >= self.parallel_threshold
    }
}

fn check_unit_interval(option: &'static str, v: f64) -> AggregateResult<()> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(AggregateError::config(option, format!("must be within [0, 1], got {v}")))
    }
}
