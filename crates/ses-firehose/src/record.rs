//! Firehose data-transformation envelope.
//!
//! Kinesis Data Firehose invokes a transformation with a batch of records
//! whose `data` is base64 encoded, and expects one response record per
//! input record, in the same order, carrying a result status.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A batch of records delivered by Firehose.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirehoseEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invocation_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_stream_arn: Option<String>,

    /// Set when the delivery stream reads from a Kinesis data stream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_kinesis_stream_arn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default)]
    pub records: Vec<FirehoseEventRecord>,
}

impl FirehoseEvent {
    /// Build a batch from already-constructed records.
    pub fn from_records(records: Vec<FirehoseEventRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }
}

/// One input record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirehoseEventRecord {
    /// Opaque identifier, echoed back verbatim.
    pub record_id: String,

    /// Milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approximate_arrival_timestamp: Option<i64>,

    /// Base64-encoded payload.
    pub data: String,
}

impl FirehoseEventRecord {
    /// Create a record from raw payload bytes.
    pub fn new(record_id: impl Into<String>, payload: &[u8]) -> Self {
        Self {
            record_id: record_id.into(),
            approximate_arrival_timestamp: None,
            data: STANDARD.encode(payload),
        }
    }

    /// Decode the raw payload bytes.
    pub fn payload(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.data)
    }

    /// Arrival time, when Firehose supplied one.
    pub fn arrival_time(&self) -> Option<DateTime<Utc>> {
        self.approximate_arrival_timestamp
            .and_then(DateTime::from_timestamp_millis)
    }
}

/// Per-record outcome reported back to Firehose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransformResult {
    /// Transformed successfully; `data` holds the new payload.
    Ok,
    /// Could not be transformed; Firehose routes it to the error output.
    ProcessingFailed,
}

impl std::fmt::Display for TransformResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformResult::Ok => write!(f, "Ok"),
            TransformResult::ProcessingFailed => write!(f, "ProcessingFailed"),
        }
    }
}

/// One output record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirehoseResponseRecord {
    pub record_id: String,

    pub result: TransformResult,

    /// Base64-encoded payload; present only when `result` is `Ok`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl FirehoseResponseRecord {
    /// Successful response carrying the transformed payload.
    pub fn ok(record_id: impl Into<String>, payload: &[u8]) -> Self {
        Self {
            record_id: record_id.into(),
            result: TransformResult::Ok,
            data: Some(STANDARD.encode(payload)),
        }
    }

    /// Failed response with no payload.
    pub fn failed(record_id: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            result: TransformResult::ProcessingFailed,
            data: None,
        }
    }

    /// Whether this record was transformed.
    pub fn is_ok(&self) -> bool {
        self.result == TransformResult::Ok
    }

    /// Decode the returned payload, if any.
    pub fn payload(&self) -> Option<Result<Vec<u8>, base64::DecodeError>> {
        self.data.as_ref().map(|data| STANDARD.decode(data))
    }
}

/// The full batch response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirehoseResponse {
    pub records: Vec<FirehoseResponseRecord>,
}

impl FirehoseResponse {
    /// Count the outcomes in this response.
    pub fn summary(&self) -> BatchSummary {
        let ok = self.records.iter().filter(|r| r.is_ok()).count();
        BatchSummary {
            total: self.records.len(),
            ok,
            failed: self.records.len() - ok,
        }
    }
}

/// Outcome counts for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub ok: usize,
    pub failed: usize,
}

impl BatchSummary {
    /// True when every record was transformed.
    pub fn all_ok(&self) -> bool {
        self.failed == 0
    }
}
