#![allow(dead_code)]

use campstats::{AggregateConfig, Record};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use time::{Date, Month, OffsetDateTime, UtcOffset};

/// UTC instant at `y-m-d h:mi:00`.
pub fn utc(y: i32, m: u8, d: u8, h: u8, mi: u8) -> OffsetDateTime {
    at_offset(y, m, d, h, mi, 0)
}

/// Instant at `y-m-d h:mi:00` wall-clock in a whole-hour offset.
pub fn at_offset(y: i32, m: u8, d: u8, h: u8, mi: u8, offset_hours: i8) -> OffsetDateTime {
    let month = Month::try_from(m).unwrap();
    Date::from_calendar_date(y, month, d)
        .unwrap()
        .with_hms(h, mi, 0)
        .unwrap()
        .assume_offset(UtcOffset::from_hms(offset_hours, 0, 0).unwrap())
}

pub fn date(y: i32, m: u8, d: u8) -> Date {
    Date::from_calendar_date(y, Month::try_from(m).unwrap(), d).unwrap()
}

pub fn rec(ts: OffsetDateTime, author: &str, p: f64) -> Record {
    Record::new(ts, author, p)
}

/// Defaults with progress bars off, so test output stays clean.
pub fn quiet() -> AggregateConfig {
    AggregateConfig::default().with_progress(false)
}

/// Deterministic pseudo-random corpus: `n` posts over `days` days (from 2016-09-01 UTC)
/// by `authors` authors. A small LCG keeps it reproducible without extra dependencies.
pub fn synthetic_corpus(n: usize, days: u32, authors: u32) -> Vec<Record> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) as u32
    };
    let start = utc(2016, 9, 1, 0, 0);
    (0..n)
        .map(|_| {
            let secs = (next() % (days * 86_400)) as i64;
            let author = format!("user{}", next() % authors);
            // probabilities on a 0.01 grid, including exact 0.5 values
            let p = (next() % 101) as f64 / 100.0;
            Record::new(start + time::Duration::seconds(secs), author, p)
        })
        .collect()
}

/// Write plain NDJSON lines.
pub fn write_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    for l in lines {
        writeln!(&mut f, "{}", l).unwrap();
    }
}

/// Write a compressed `.zst` file containing the provided JSONL lines.
pub fn write_zst_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

/// Read a text file line-by-line into strings (skips empty lines).
pub fn read_lines(path: &Path) -> Vec<String> {
    let f = File::open(path).unwrap();
    let r = BufReader::new(f);
    r.lines().map(|l| l.unwrap()).filter(|s| !s.is_empty()).collect()
}
