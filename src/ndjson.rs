//! Row-level NDJSON access used by the table loader and writers.

use crate::util::{create_with_backoff, open_with_backoff, replace_file_atomic_backoff};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Reads JSON rows from any buffered source (plain file or zstd decoder).
/// Blank lines are skipped; line numbers are 1-based and count blank lines too.
pub struct NdjsonReader<R: BufRead> {
    rdr: R,
    source: String,
    line_no: usize,
    buf: String,
}

impl NdjsonReader<BufReader<File>> {
    pub fn open(path: &Path, buf_bytes: usize) -> Result<Self> {
        let f = open_with_backoff(path, 16, 50).with_context(|| format!("open {}", path.display()))?;
        Ok(Self::from_reader(BufReader::with_capacity(buf_bytes.max(8 * 1024), f), path))
    }
}

impl<R: BufRead> NdjsonReader<R> {
    pub fn from_reader(rdr: R, source: &Path) -> Self {
        Self { rdr, source: source.display().to_string(), line_no: 0, buf: String::with_capacity(16 * 1024) }
    }

    /// Next non-blank row as `(line_no, value)`, or `None` at EOF.
    pub fn next_row(&mut self) -> Result<Option<(usize, Value)>> {
        loop {
            self.buf.clear();
            let n = self
                .rdr
                .read_line(&mut self.buf)
                .with_context(|| format!("read {} after line {}", self.source, self.line_no))?;
            if n == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            let line = self.buf.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() {
                continue;
            }
            let v = serde_json::from_str(line)
                .with_context(|| format!("{}: line {} is not valid JSON", self.source, self.line_no))?;
            return Ok(Some((self.line_no, v)));
        }
    }

    /// Drain every remaining row, dropping line numbers.
    pub fn read_all(mut self) -> Result<Vec<Value>> {
        let mut rows = Vec::new();
        while let Some((_, v)) = self.next_row()? {
            rows.push(v);
        }
        Ok(rows)
    }
}

/// Buffered writer over a staging file, promoted atomically on `finish_atomic`.
pub struct NdjsonWriter {
    staging: PathBuf,
    w: BufWriter<File>,
    rows: usize,
}

impl NdjsonWriter {
    /// Stage next to `final_path` as `.<name>.inprogress`.
    pub fn stage_for(final_path: &Path, buf_bytes: usize) -> Result<Self> {
        let name = final_path.file_name().and_then(|s| s.to_str()).unwrap_or("table");
        let staging = final_path.with_file_name(format!(".{name}.inprogress"));
        let f = create_with_backoff(&staging, 16, 50).with_context(|| format!("create {}", staging.display()))?;
        Ok(Self { staging, w: BufWriter::with_capacity(buf_bytes.max(8 * 1024), f), rows: 0 })
    }

    /// Serialize one row as a single JSON line.
    pub fn write_row<T: Serialize>(&mut self, row: &T) -> Result<()> {
        serde_json::to_writer(&mut self.w, row)?;
        self.w.write_all(b"\n")?;
        self.rows += 1;
        Ok(())
    }

    /// Raw text line (TSV headers and rows).
    pub fn write_line(&mut self, s: &str) -> Result<()> {
        self.w.write_all(s.as_bytes())?;
        self.w.write_all(b"\n")?;
        self.rows += 1;
        Ok(())
    }

    /// Flush, then move the staging file over `final_path`. Returns lines written.
    pub fn finish_atomic(mut self, final_path: &Path) -> Result<usize> {
        self.w.flush().with_context(|| format!("flush {}", self.staging.display()))?;
        drop(self.w);
        replace_file_atomic_backoff(&self.staging, final_path)?;
        Ok(self.rows)
    }
}
