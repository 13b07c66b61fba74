#[path = "common/mod.rs"]
mod common;

use campstats::{
    aggregate, aggregate_rows, classify, classify_ratio, count_users, filter_records, record_from_value,
    AggregateConfig, AggregateError, CampStats, UserClass,
};
use common::*;
use serde_json::json;
use time::Duration;

/// Defaults match the documented option table and validate cleanly.
#[test]
fn defaults_match_documented_values() {
    let c = AggregateConfig::default();
    assert_eq!(c.probability_column, "p_1");
    assert_eq!(c.worker_count, 6);
    assert_eq!(c.window_granularity, Duration::DAY);
    assert_eq!(c.probability_threshold, 0.5);
    assert_eq!(c.user_ratio_threshold, 0.5);
    assert!(!c.progress);
    assert!(c.validate().is_ok());
}

/// Out-of-domain options fail fast with a `Configuration` error naming the option,
/// before any record is looked at.
#[test]
fn rejects_out_of_domain_options() {
    let cases = [
        (quiet().with_probability_threshold(1.5), "probability_threshold"),
        (quiet().with_probability_threshold(-0.1), "probability_threshold"),
        (quiet().with_user_ratio_threshold(f64::NAN), "user_ratio_threshold"),
        (quiet().with_worker_count(0), "worker_count"),
        (quiet().with_parallel_threshold(0), "parallel_threshold"),
        (quiet().with_window_granularity(Duration::ZERO), "window_granularity"),
        (quiet().with_window_granularity(Duration::hours(-1)), "window_granularity"),
        (quiet().with_probability_column(" "), "probability_column"),
    ];
    let records = vec![rec(utc(2016, 11, 1, 0, 0), "a", 0.9)];
    for (cfg, expected) in cases {
        match aggregate(&records, &cfg) {
            Err(AggregateError::Configuration { option, .. }) => assert_eq!(option, expected),
            other => panic!("expected configuration error for {}, got {:?}", expected, other),
        }
    }
}

/// Configuration is checked before the input rows, even when the rows are bad too.
#[test]
fn configuration_errors_win_over_schema_errors() {
    let rows = vec![json!({"nope": 1})];
    let err = aggregate_rows(&rows, &quiet().with_worker_count(0)).unwrap_err();
    assert!(matches!(err, AggregateError::Configuration { option: "worker_count", .. }));
}

/// Rows are validated at the boundary: missing fields, nulls, wrong types and
/// non-object rows are all `InputSchema` errors carrying the row index and field.
#[test]
fn schema_errors_name_row_and_field() {
    let cfg = quiet();
    let good = json!({"timestamp": "2016-11-01T10:00:00-05:00", "author_id": "a", "p_1": 0.7});
    assert!(record_from_value(0, &good, &cfg).is_ok());

    let rows = vec![good.clone(), json!({"timestamp": "2016-11-01T10:00:00Z", "author_id": "b"})];
    assert_eq!(
        aggregate_rows(&rows, &cfg).unwrap_err(),
        AggregateError::InputSchema { row: 1, field: "p_1".into(), message: "is missing".into() }
    );

    let null_author = json!({"timestamp": "2016-11-01T10:00:00Z", "author_id": null, "p_1": 0.7});
    assert!(matches!(
        record_from_value(3, &null_author, &cfg),
        Err(AggregateError::InputSchema { row: 3, ref field, .. }) if field == "author_id"
    ));

    let text_p = json!({"timestamp": "2016-11-01T10:00:00Z", "author_id": "a", "p_1": "high"});
    assert!(matches!(record_from_value(0, &text_p, &cfg), Err(AggregateError::InputSchema { ref field, .. }) if field == "p_1"));

    let bad_ts = json!({"timestamp": "yesterday", "author_id": "a", "p_1": 0.7});
    assert!(matches!(record_from_value(0, &bad_ts, &cfg), Err(AggregateError::InputSchema { ref field, .. }) if field == "timestamp"));

    let bool_author = json!({"timestamp": 1478000000, "author_id": true, "p_1": 0.7});
    assert!(record_from_value(0, &bool_author, &cfg).is_err());

    assert!(matches!(record_from_value(5, &json!([1, 2]), &cfg), Err(AggregateError::InputSchema { row: 5, .. })));
}

/// Custom column names, integer Unix timestamps and numeric author ids are accepted.
/// Outcome: the renamed probability column drives the filter, numeric ids group correctly.
#[test]
fn custom_columns_and_numeric_fields() {
    let rows = vec![
        json!({"datetime_EST": "2016-11-01T09:00:00-05:00", "user_id": 42, "p_clinton": 0.9, "p_1": 0.0}),
        json!({"datetime_EST": "2016-11-01T11:00:00-05:00", "user_id": 42, "p_clinton": 0.8, "p_1": 0.0}),
        json!({"datetime_EST": 1477994400, "user_id": "7", "p_clinton": 0.2, "p_1": 1.0}),
    ];
    let (tweets, users) = CampStats::new()
        .progress(false)
        .timestamp_column("datetime_EST")
        .author_column("user_id")
        .probability_column("p_clinton")
        .run_rows(&rows)
        .unwrap();

    assert_eq!(tweets.len(), 1);
    assert_eq!((tweets.rows()[0].n_camp1, tweets.rows()[0].n_camp0), (2, 1));
    assert_eq!(users.rows()[0].distinct_users(), 2);
    assert_eq!(users.rows()[0].n_camp1_users, 1);
}

/// Filter edge cases: the ambiguous band is closed, out-of-range values propagate
/// as-is, NaN is dropped, and the flags never overlap even for `t < 0.5`.
#[test]
fn filter_stage_edge_cases() {
    assert!(classify(0.5, 0.5).is_none());
    assert!(classify(0.8, 0.8).is_none());
    assert!(classify(0.81, 0.8).unwrap().is_camp1);
    assert!(classify(0.19, 0.8).unwrap().is_camp0);
    assert!(classify(1.3, 0.5).unwrap().is_camp1);
    assert!(classify(-0.2, 0.5).unwrap().is_camp0);
    assert!(classify(f64::NAN, 0.5).is_none());

    let low_t = classify(0.45, 0.3).unwrap();
    assert!(low_t.is_camp1 && !low_t.is_camp0);

    let records: Vec<_> = (0..=100)
        .map(|i| rec(utc(2016, 11, 1, 0, 0), "a", i as f64 / 100.0))
        .collect();
    for t in [0.0, 0.2, 0.5, 0.9, 1.0] {
        assert!(filter_records(&records, t).iter().all(|r| !(r.is_camp1 && r.is_camp0)));
    }
    // t = 1 keeps nothing inside [0, 1]; t = 0 keeps everything.
    assert!(filter_records(&records, 1.0).is_empty());
    assert_eq!(filter_records(&records, 0.0).len(), 101);
}

/// Author classification uses strict comparisons on both boundaries.
#[test]
fn user_classification_boundaries() {
    assert_eq!(classify_ratio(0.5, 0.5), UserClass::Undetermined);
    assert_eq!(classify_ratio(0.51, 0.5), UserClass::Camp1);
    assert_eq!(classify_ratio(0.49, 0.5), UserClass::Camp0);
    assert_eq!(classify_ratio(0.75, 0.75), UserClass::Undetermined);
    assert_eq!(classify_ratio(0.25, 0.75), UserClass::Undetermined);
    assert_eq!(classify_ratio(1.0, 0.75), UserClass::Camp1);
    assert_eq!(classify_ratio(0.0, 0.75), UserClass::Camp0);
    // A single-post author always has ratio 0 or 1.
    assert_eq!(classify_ratio(1.0, 1.0), UserClass::Undetermined);
    assert_eq!(classify_ratio(0.0, 1.0), UserClass::Undetermined);

    let records = vec![
        rec(utc(2016, 11, 1, 1, 0), "x", 0.9),
        rec(utc(2016, 11, 1, 2, 0), "x", 0.9),
        rec(utc(2016, 11, 1, 3, 0), "x", 0.1),
        rec(utc(2016, 11, 1, 4, 0), "y", 0.1),
        rec(utc(2016, 11, 1, 5, 0), "z", 0.9),
        rec(utc(2016, 11, 1, 6, 0), "z", 0.1),
    ];
    let filtered = filter_records(&records, 0.5);
    assert_eq!(count_users(&filtered, 0.5), (1, 1, 1));
    assert_eq!(count_users(&filtered, 0.7), (0, 1, 2));
}
