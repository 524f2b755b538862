//! Error types for the Firehose transformation.

use crate::config::ConfigError;
use ses_redact::{JsonErrorSummary, TransformError};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for envelope-level operations.
pub type Result<T> = std::result::Result<T, FirehoseError>;

/// Errors that prevent a whole batch from being read or written.
///
/// Per-record problems never show up here; see [`RecordError`].
#[derive(Error, Debug)]
pub enum FirehoseError {
    /// The input is not a Firehose transformation event.
    #[error("invalid firehose event: {0}")]
    Envelope(JsonErrorSummary),

    /// The response could not be serialized.
    #[error("failed to encode firehose response: {0}")]
    Response(#[source] serde_json::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Why a single record could not be transformed.
#[derive(Error, Debug)]
pub enum RecordFailure {
    /// The record's `data` field is not valid base64.
    #[error("invalid base64 record data: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

impl RecordFailure {
    /// Short machine-readable kind for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RecordFailure::Encoding(_) => "encoding",
            RecordFailure::Transform(e) => e.kind(),
        }
    }
}

/// A failed record, tagged with its identifier.
#[derive(Error, Debug)]
#[error("record {record_id}: {source}")]
pub struct RecordError {
    pub record_id: String,
    #[source]
    pub source: RecordFailure,
}

impl RecordError {
    pub fn new(record_id: impl Into<String>, source: impl Into<RecordFailure>) -> Self {
        Self {
            record_id: record_id.into(),
            source: source.into(),
        }
    }
}
