//! Filter stage: tag each record as camp-1 or camp-0, or drop it when its
//! probability sits inside the ambiguous band `[1 - t, t]`.

use crate::record::{FilteredRecord, Record};

/// Classify a single probability. `None` means the record is discarded.
/// Camp-1 wins when both predicates hold (only possible for `t < 0.5`).
#[inline]
pub fn classify(p: f64, threshold: f64) -> Option<FilteredFlags> {
    if p > threshold {
        Some(FilteredFlags { is_camp1: true, is_camp0: false })
    } else if p < 1.0 - threshold {
        Some(FilteredFlags { is_camp1: false, is_camp0: true })
    } else {
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilteredFlags {
    pub is_camp1: bool,
    pub is_camp0: bool,
}

/// Apply the filter stage to the whole record set, preserving input order.
pub fn filter_records(records: &[Record], threshold: f64) -> Vec<FilteredRecord<'_>> {
    let mut out_of_range = 0usize;
    let kept: Vec<FilteredRecord<'_>> = records
        .iter()
        .filter_map(|record| {
            let p = record.camp_probability;
            if !(0.0..=1.0).contains(&p) {
                out_of_range += 1;
            }
            classify(p, threshold).map(|f| FilteredRecord {
                record,
                is_camp1: f.is_camp1,
                is_camp0: f.is_camp0,
            })
        })
        .collect();

    if out_of_range > 0 {
        tracing::warn!("{} records carry a camp probability outside [0, 1]; classified as-is", out_of_range);
    }
    tracing::debug!("filter stage kept {} of {} records (threshold {})", kept.len(), records.len(), threshold);
    kept
}
