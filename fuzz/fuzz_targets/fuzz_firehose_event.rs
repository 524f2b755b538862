//! Fuzz target for Firehose event handling.
//!
//! Any event that parses yields exactly one response record per input
//! record, with matching ids.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ses_firehose::{process_batch, FirehoseEvent};

fuzz_target!(|data: &[u8]| {
    if let Ok(event) = serde_json::from_slice::<FirehoseEvent>(data) {
        let response = process_batch(&event);
        assert_eq!(response.records.len(), event.records.len());
        for (input, output) in event.records.iter().zip(&response.records) {
            assert_eq!(input.record_id, output.record_id);
        }
    }
});
