mod config;
mod error;
mod record;

mod filters;
mod window;
mod counting;
mod users;
mod concurrency;
mod aggregate;
mod ingest;

mod progress;
mod util;
mod ndjson;
mod zstd_jsonl;
mod table_io;
mod job;
mod pipeline;

pub use crate::config::AggregateConfig;
pub use crate::error::{AggregateError, AggregateResult};
pub use crate::record::{FilteredRecord, Record};
pub use crate::pipeline::CampStats;

// Core stages, exposed individually so callers can run or test them in isolation.
pub use crate::filters::{classify, filter_records, FilteredFlags};
pub use crate::window::{partition_windows, window_start, WindowKey, Windows};
pub use crate::counting::{count_tweets, TweetCountRow, TweetCounter};
pub use crate::users::{classify_ratio, count_users, UserClass, UserCountRow, UserCounter};
pub use crate::concurrency::Executor;
pub use crate::aggregate::{aggregate, aggregate_rows, render_summary, CampTables, ResultTable, WindowAggregator, WindowRow};
pub use crate::ingest::{parse_timestamp, record_from_value, records_from_values};

// Expose multiprogress so binaries can stack bars.
pub use crate::progress::set_global_multiprogress;

pub use crate::util::init_tracing_once;

// File boundary and job runner.
pub use crate::table_io::{load_records, load_rows, read_table, write_table, write_table_tsv};
pub use crate::job::{parse_granularity, parse_offset, run_job, JobSpec, OutputFormat};
