//! Kinesis Data Firehose transformation that redacts SES event records.
//!
//! Each record of a Firehose batch carries one base64-encoded SES event
//! notification. [`process_batch`] decodes every record, masks recipient
//! addresses and subjects with [`ses_redact`], and builds the response
//! Firehose expects. A record that cannot be processed is reported as
//! `ProcessingFailed` and never aborts the rest of the batch.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod record;

pub use dispatch::{process_batch, process_record};
pub use error::{FirehoseError, RecordError, RecordFailure, Result};
pub use record::{
    BatchSummary, FirehoseEvent, FirehoseEventRecord, FirehoseResponse, FirehoseResponseRecord,
    TransformResult,
};
