//! File boundary: load input rows from NDJSON / zstd NDJSON, write result tables.

use crate::aggregate::{ResultTable, WindowRow};
use crate::config::AggregateConfig;
use crate::ingest::records_from_values;
use crate::ndjson::{NdjsonReader, NdjsonWriter};
use crate::record::Record;
use crate::zstd_jsonl::open_zst_rows;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

const READ_BUF: usize = 256 * 1024;
const WRITE_BUF: usize = 256 * 1024;

fn is_zst(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).map(|e| e.eq_ignore_ascii_case("zst")).unwrap_or(false)
}

/// Read every non-blank line of an NDJSON file (`.zst` decoded on the fly) as a JSON value.
pub fn load_rows(path: &Path) -> Result<Vec<Value>> {
    let rows = if is_zst(path) {
        open_zst_rows(path, READ_BUF)?.read_all()?
    } else {
        NdjsonReader::open(path, READ_BUF)?.read_all()?
    };
    tracing::info!("loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Load and validate input records using the configured column names.
pub fn load_records(path: &Path, config: &AggregateConfig) -> Result<Vec<Record>> {
    let rows = load_rows(path)?;
    let records = records_from_values(&rows, config).with_context(|| format!("validating {}", path.display()))?;
    Ok(records)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Write one JSON object per row. The file is staged and promoted atomically.
pub fn write_table<R: Serialize>(path: &Path, table: &ResultTable<R>) -> Result<()>
where
    R: WindowRow,
{
    ensure_parent(path)?;
    let mut w = NdjsonWriter::stage_for(path, WRITE_BUF)?;
    for row in table {
        w.write_row(row)?;
    }
    let n = w.finish_atomic(path)?;
    tracing::info!("wrote {} rows to {}", n, path.display());
    Ok(())
}

/// Write a tab-separated table: `window` column plus the row's numeric columns.
pub fn write_table_tsv<R: WindowRow>(path: &Path, table: &ResultTable<R>) -> Result<()> {
    ensure_parent(path)?;
    let mut w = NdjsonWriter::stage_for(path, WRITE_BUF)?;
    let mut header = vec!["window"];
    header.extend_from_slice(R::header());
    w.write_line(&header.join("\t"))?;
    for row in table {
        let mut cols = vec![row.window().to_string()];
        cols.extend(row.values().into_iter().map(|v| v.to_string()));
        w.write_line(&cols.join("\t"))?;
    }
    w.finish_atomic(path)?;
    Ok(())
}

/// Read back a table written by `write_table`.
pub fn read_table<R: DeserializeOwned + WindowRow>(path: &Path) -> Result<ResultTable<R>> {
    let rows = load_rows(path)?
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<R>, _>>()
        .with_context(|| format!("decode rows of {}", path.display()))?;
    Ok(ResultTable::merge(rows))
}
