//! Tweet-count reducer: how many posts of each camp fall in one window.

use crate::aggregate::{WindowAggregator, WindowRow};
use crate::record::FilteredRecord;
use crate::window::WindowKey;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetCountRow {
    #[serde(with = "time::serde::rfc3339")]
    pub window_start: OffsetDateTime,
    pub n_camp1: u64,
    pub n_camp0: u64,
}

impl WindowRow for TweetCountRow {
    fn window(&self) -> WindowKey {
        WindowKey::new(self.window_start)
    }
    fn header() -> &'static [&'static str] {
        &["n_camp1", "n_camp0"]
    }
    fn values(&self) -> Vec<u64> {
        vec![self.n_camp1, self.n_camp0]
    }
}

/// `(n_camp1, n_camp0)` over one window's records.
pub fn count_tweets(records: &[FilteredRecord<'_>]) -> (u64, u64) {
    records.iter().fold((0u64, 0u64), |(c1, c0), r| {
        (c1 + r.is_camp1 as u64, c0 + r.is_camp0 as u64)
    })
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TweetCounter;

impl WindowAggregator for TweetCounter {
    type Row = TweetCountRow;

    fn label(&self) -> &'static str {
        "Tweet counts"
    }

    fn aggregate(&self, key: WindowKey, records: &[FilteredRecord<'_>]) -> TweetCountRow {
        let (n_camp1, n_camp0) = count_tweets(records);
        TweetCountRow { window_start: key.start, n_camp1, n_camp0 }
    }
}
