//! User-count reducer: classify each author of a window by the share of their
//! posts that are camp-1, then count authors per class.
//!
//! The ratio denominator is the author's post-filter record count in the window;
//! ambiguous posts were already dropped by the filter stage and do not count.

use crate::aggregate::{WindowAggregator, WindowRow};
use crate::record::FilteredRecord;
use crate::window::WindowKey;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCountRow {
    #[serde(with = "time::serde::rfc3339")]
    pub window_start: OffsetDateTime,
    pub n_camp1_users: u64,
    pub n_camp0_users: u64,
    pub n_undetermined_users: u64,
}

impl UserCountRow {
    pub fn distinct_users(&self) -> u64 {
        self.n_camp1_users + self.n_camp0_users + self.n_undetermined_users
    }
}

impl WindowRow for UserCountRow {
    fn window(&self) -> WindowKey {
        WindowKey::new(self.window_start)
    }
    fn header() -> &'static [&'static str] {
        &["n_camp1_users", "n_camp0_users", "n_undetermined_users"]
    }
    fn values(&self) -> Vec<u64> {
        vec![self.n_camp1_users, self.n_camp0_users, self.n_undetermined_users]
    }
}

/// Class of one author within one window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserClass {
    Camp1,
    Camp0,
    Undetermined,
}

/// Strict comparisons on both sides: a ratio sitting exactly on a boundary is undetermined.
/// Camp-1 is checked first, which only matters for `r < 0.5`.
#[inline]
pub fn classify_ratio(ratio: f64, r_threshold: f64) -> UserClass {
    if ratio > r_threshold {
        UserClass::Camp1
    } else if ratio < 1.0 - r_threshold {
        UserClass::Camp0
    } else {
        UserClass::Undetermined
    }
}

#[derive(Default, Clone, Copy)]
struct AuthorTally {
    camp1: u64,
    total: u64,
}

impl AuthorTally {
    fn ratio(&self) -> f64 {
        self.camp1 as f64 / self.total as f64
    }
}

/// `(n_camp1_users, n_camp0_users, n_undetermined_users)` over one window.
pub fn count_users(records: &[FilteredRecord<'_>], r_threshold: f64) -> (u64, u64, u64) {
    let mut per_author: AHashMap<&str, AuthorTally> = AHashMap::with_capacity(records.len());
    for r in records {
        let t = per_author.entry(r.author_id()).or_default();
        t.total += 1;
        if r.is_camp1 {
            t.camp1 += 1;
        }
    }

    let (mut camp1, mut camp0, mut undetermined) = (0u64, 0u64, 0u64);
    for tally in per_author.values() {
        match classify_ratio(tally.ratio(), r_threshold) {
            UserClass::Camp1 => camp1 += 1,
            UserClass::Camp0 => camp0 += 1,
            UserClass::Undetermined => undetermined += 1,
        }
    }
    (camp1, camp0, undetermined)
}

#[derive(Clone, Copy, Debug)]
pub struct UserCounter {
    pub r_threshold: f64,
}

impl UserCounter {
    pub fn new(r_threshold: f64) -> Self {
        Self { r_threshold }
    }
}

impl WindowAggregator for UserCounter {
    type Row = UserCountRow;

    fn label(&self) -> &'static str {
        "User counts"
    }

    fn aggregate(&self, key: WindowKey, records: &[FilteredRecord<'_>]) -> UserCountRow {
        let (n_camp1_users, n_camp0_users, n_undetermined_users) = count_users(records, self.r_threshold);
        UserCountRow { window_start: key.start, n_camp1_users, n_camp0_users, n_undetermined_users }
    }
}
