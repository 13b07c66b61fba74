//! Error taxonomy for the aggregation core.
//! Everything here is detected before per-window work begins.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AggregateError {
    #[error("invalid configuration for `{option}`: {message}")]
    Configuration { option: &'static str, message: String },

    #[error("input row {row}: field `{field}` {message}")]
    InputSchema { row: usize, field: String, message: String },

    #[error("worker pool could not be started: {0}")]
    WorkerPool(String),
}

impl AggregateError {
    pub fn config(option: &'static str, message: impl Into<String>) -> Self {
        AggregateError::Configuration { option, message: message.into() }
    }

    pub fn schema(row: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        AggregateError::InputSchema { row, field: field.into(), message: message.into() }
    }
}

pub type AggregateResult<T> = Result<T, AggregateError>;
