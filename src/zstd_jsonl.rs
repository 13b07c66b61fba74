use crate::ndjson::NdjsonReader;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use zstd::stream::read::Decoder;

use crate::util::open_with_backoff;

/// Row reader over a zstd-compressed NDJSON file.
///
/// We request `window_log_max(31)` up front to avoid "Frame requires too much memory"
/// on very large frames. Decode errors surface from `next_row` and abort the read:
/// a truncated input would silently skew every per-window count after it.
pub fn open_zst_rows(path: &Path, read_buf_bytes: usize) -> Result<NdjsonReader<BufReader<Decoder<'static, BufReader<File>>>>> {
    let file = open_with_backoff(path, 16, 50).with_context(|| format!("open {}", path.display()))?;
    let mut decoder = Decoder::new(file).with_context(|| format!("zstd header of {}", path.display()))?;
    decoder.window_log_max(31)?;
    Ok(NdjsonReader::from_reader(BufReader::with_capacity(read_buf_bytes.max(8 * 1024), decoder), path))
}
