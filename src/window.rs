//! Windowing stage: bucket filtered records into fixed-duration, half-open windows
//! `[start, start + granularity)`. Boundaries are multiples of the granularity
//! counted from the Unix epoch in the configured offset's wall-clock, so a 1-day
//! granularity with a `-05:00` offset yields EST calendar days. Whole-week
//! granularities count from the first Monday after the epoch instead, so weekly
//! windows are Monday-to-Sunday calendar weeks.

use crate::error::{AggregateError, AggregateResult};
use crate::record::FilteredRecord;
use std::collections::BTreeMap;
use std::fmt;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, Time, UtcOffset};

const NANOS_PER_SEC: i128 = 1_000_000_000;
const NANOS_PER_DAY: i128 = 86_400 * NANOS_PER_SEC;
const NANOS_PER_WEEK: i128 = 7 * NANOS_PER_DAY;
// 1970-01-01 was a Thursday; 1970-01-05 is the first Monday.
const MONDAY_ANCHOR: i128 = 4 * NANOS_PER_DAY;

/// Origin (in local wall-clock nanoseconds since the epoch) that window multiples count from.
fn anchor_for(granularity_nanos: i128) -> i128 {
    if granularity_nanos % NANOS_PER_WEEK == 0 { MONDAY_ANCHOR } else { 0 }
}

/// Identifies a window by its start instant. Ordered chronologically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowKey {
    pub start: OffsetDateTime,
}

impl WindowKey {
    pub fn new(start: OffsetDateTime) -> Self {
        Self { start }
    }

    /// Calendar date of the window start, in the window offset.
    pub fn date(&self) -> Date {
        self.start.date()
    }
}

impl fmt::Display for WindowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = if self.start.time() == Time::MIDNIGHT {
            self.start.format(format_description!("[year]-[month]-[day]"))
        } else {
            self.start.format(format_description!(
                "[year]-[month]-[day] [hour]:[minute]:[second]"
            ))
        };
        match rendered {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "{}", self.start),
        }
    }
}

/// Ordered mapping from window start to the records it owns. Only non-empty windows exist.
pub type Windows<'a> = BTreeMap<WindowKey, Vec<FilteredRecord<'a>>>;

/// Start instant of the window containing `ts`, expressed in `offset`.
pub fn window_start(ts: OffsetDateTime, granularity: Duration, offset: UtcOffset) -> AggregateResult<OffsetDateTime> {
    let g = granularity.whole_nanoseconds();
    if g <= 0 {
        return Err(AggregateError::config("window_granularity", "must be a positive duration"));
    }
    let shift = offset.whole_seconds() as i128 * NANOS_PER_SEC;
    let local = ts.unix_timestamp_nanos() + shift;
    let anchor = anchor_for(g);
    let start_local = (local - anchor).div_euclid(g) * g + anchor;
    let start = OffsetDateTime::from_unix_timestamp_nanos(start_local - shift).map_err(|e| {
        AggregateError::config("window_granularity", format!("window start for {ts} is out of range: {e}"))
    })?;
    Ok(start.to_offset(offset))
}

/// Partition filtered records into windows. Record order inside a window follows input order.
pub fn partition_windows<'a>(
    records: Vec<FilteredRecord<'a>>,
    granularity: Duration,
    offset: UtcOffset,
) -> AggregateResult<Windows<'a>> {
    let mut windows: Windows<'a> = BTreeMap::new();
    for rec in records {
        let key = WindowKey::new(window_start(rec.timestamp(), granularity, offset)?);
        windows.entry(key).or_default().push(rec);
    }
    tracing::debug!("windowing produced {} non-empty windows (granularity {})", windows.len(), granularity);
    Ok(windows)
}

