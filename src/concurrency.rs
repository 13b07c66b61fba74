//! Execution strategy: run one per-window reducer over every window, either in order
//! on the calling thread or on a fixed-size worker pool. Both paths end in the same
//! merge step, which orders rows by window start.

use crate::aggregate::{ResultTable, WindowAggregator};
use crate::config::AggregateConfig;
use crate::error::{AggregateError, AggregateResult};
use crate::progress::make_count_progress;
use crate::window::Windows;
use rayon::prelude::*;
use std::sync::mpsc;

pub enum Executor {
    Sequential,
    Pool { workers: usize, pool: rayon::ThreadPool },
}

impl Executor {
    /// Sequential when `worker_count == 1` or there are fewer windows than
    /// `parallel_threshold`; otherwise a dedicated pool of `worker_count` threads.
    pub fn for_config(config: &AggregateConfig, windows: usize) -> AggregateResult<Self> {
        if !config.use_pool(windows) {
            tracing::debug!("sequential strategy ({} windows, worker_count {})", windows, config.worker_count);
            return Ok(Executor::Sequential);
        }
        let workers = config.worker_count;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("campstats-worker-{i}"))
            .build()
            .map_err(|e| AggregateError::WorkerPool(e.to_string()))?;
        tracing::debug!("worker pool strategy ({} windows, {} workers)", windows, workers);
        Ok(Executor::Pool { workers, pool })
    }

    pub fn is_parallel(&self) -> bool {
        matches!(self, Executor::Pool { .. })
    }

    /// Apply `agg` to every window and return the merged, ordered table.
    /// Blocks until every window is done. A panicking task aborts the whole run.
    pub fn run<A: WindowAggregator>(&self, windows: &Windows<'_>, agg: &A, progress: bool) -> ResultTable<A::Row> {
        let pb = if progress { Some(make_count_progress(windows.len() as u64, agg.label())) } else { None };

        let rows: Vec<A::Row> = match self {
            Executor::Sequential => windows
                .iter()
                .map(|(key, recs)| {
                    let row = agg.aggregate(*key, recs);
                    if let Some(pb) = &pb { pb.inc(1); }
                    row
                })
                .collect(),
            Executor::Pool { pool, .. } => {
                // Rows arrive in completion order.
                let (tx, rx) = mpsc::channel();
                pool.install(|| {
                    windows.par_iter().for_each_with(tx, |tx, (key, recs)| {
                        let row = agg.aggregate(*key, recs);
                        if let Some(pb) = &pb { pb.inc(1); }
                        let _ = tx.send(row);
                    });
                });
                rx.into_iter().collect()
            }
        };

        if let Some(pb) = pb { pb.finish_with_message(format!("{}: done", agg.label())); }
        ResultTable::merge(rows)
    }

    pub fn workers(&self) -> usize {
        match self {
            Executor::Sequential => 1,
            Executor::Pool { workers, .. } => *workers,
        }
    }
}
