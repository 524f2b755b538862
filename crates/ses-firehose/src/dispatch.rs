//! Record and batch processing.
//!
//! [`process_record`] turns one input record into a response record or a
//! [`RecordError`]; [`process_batch`] runs it over a whole batch and
//! converts every error into a `ProcessingFailed` response, so the batch
//! itself always succeeds.

use crate::error::RecordError;
use crate::logging::{event_names, generate_run_id};
use crate::record::{FirehoseEvent, FirehoseEventRecord, FirehoseResponse, FirehoseResponseRecord};
use ses_redact::redact_payload;
use tracing::{debug, info, info_span, warn};

/// Redact one record.
///
/// On success the response carries the same record id, status `Ok`, and
/// the redacted payload. Any failure is returned with the record id so the
/// caller can log it.
pub fn process_record(record: &FirehoseEventRecord) -> Result<FirehoseResponseRecord, RecordError> {
    let payload = record
        .payload()
        .map_err(|e| RecordError::new(&record.record_id, e))?;

    let redacted = redact_payload(&payload).map_err(|e| RecordError::new(&record.record_id, e))?;

    debug!(
        event = event_names::RECORD_REDACTED,
        record_id = %record.record_id,
        shapes = ?redacted.shapes,
        arrival = ?record.arrival_time(),
        "record redacted"
    );

    Ok(FirehoseResponseRecord::ok(&record.record_id, &redacted.data))
}

/// Redact every record of a batch, in order.
///
/// The response always has one record per input record, with matching
/// ids. Records that fail are reported as `ProcessingFailed` without data.
pub fn process_batch(event: &FirehoseEvent) -> FirehoseResponse {
    let run_id = generate_run_id();
    let span = info_span!(
        "batch",
        run_id = %run_id,
        invocation_id = event.invocation_id.as_deref().unwrap_or("-")
    );
    let _enter = span.enter();

    info!(
        event = event_names::BATCH_STARTED,
        records = event.records.len(),
        "processing batch"
    );

    let records = event
        .records
        .iter()
        .map(|record| match process_record(record) {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    event = event_names::RECORD_FAILED,
                    record_id = %err.record_id,
                    kind = err.source.kind(),
                    error = %err.source,
                    "record failed"
                );
                FirehoseResponseRecord::failed(&record.record_id)
            }
        })
        .collect();

    let response = FirehoseResponse { records };
    let summary = response.summary();
    info!(
        event = event_names::BATCH_COMPLETED,
        total = summary.total,
        ok = summary.ok,
        failed = summary.failed,
        "batch complete"
    );

    response
}
