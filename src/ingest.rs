//! Schema boundary: turn loosely-typed tabular rows (JSON objects) into `Record`s.
//! Rows are validated once here; nothing past this point looks at raw fields.

use crate::config::AggregateConfig;
use crate::error::{AggregateError, AggregateResult};
use crate::record::Record;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Accepts RFC 3339 strings (offset kept) or integer Unix seconds (UTC).
pub fn parse_timestamp(v: &Value) -> Result<OffsetDateTime, String> {
    match v {
        Value::String(s) => OffsetDateTime::parse(s.trim(), &Rfc3339).map_err(|e| format!("is not an RFC 3339 timestamp ({e})")),
        Value::Number(n) => {
            let secs = n.as_i64().ok_or_else(|| "must be whole Unix seconds".to_string())?;
            OffsetDateTime::from_unix_timestamp(secs).map_err(|e| format!("is out of range ({e})"))
        }
        _ => Err("must be an RFC 3339 string or Unix seconds".to_string()),
    }
}

/// Author ids are opaque; numeric ids are kept in their decimal form.
fn parse_author(v: &Value) -> Result<String, String> {
    match v {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err("must be a string or integer id".to_string()),
    }
}

fn parse_probability(v: &Value) -> Result<f64, String> {
    v.as_f64().ok_or_else(|| "must be a number".to_string())
}

fn field<'v>(row: usize, obj: &'v serde_json::Map<String, Value>, name: &str) -> AggregateResult<&'v Value> {
    match obj.get(name) {
        Some(Value::Null) | None => Err(AggregateError::schema(row, name, "is missing")),
        Some(v) => Ok(v),
    }
}

/// Validate one row against the configured column names.
pub fn record_from_value(row: usize, v: &Value, cfg: &AggregateConfig) -> AggregateResult<Record> {
    let obj = v
        .as_object()
        .ok_or_else(|| AggregateError::schema(row, "<row>", "is not a JSON object"))?;

    let ts_col = cfg.timestamp_column.as_str();
    let author_col = cfg.author_column.as_str();
    let p_col = cfg.probability_column.as_str();

    let timestamp = parse_timestamp(field(row, obj, ts_col)?).map_err(|m| AggregateError::schema(row, ts_col, m))?;
    let author_id = parse_author(field(row, obj, author_col)?).map_err(|m| AggregateError::schema(row, author_col, m))?;
    let camp_probability = parse_probability(field(row, obj, p_col)?).map_err(|m| AggregateError::schema(row, p_col, m))?;

    Ok(Record { timestamp, author_id, camp_probability })
}

/// Validate every row; the first non-conforming row aborts ingestion.
pub fn records_from_values(rows: &[Value], cfg: &AggregateConfig) -> AggregateResult<Vec<Record>> {
    rows.iter()
        .enumerate()
        .map(|(i, v)| record_from_value(i, v, cfg))
        .collect()
}
