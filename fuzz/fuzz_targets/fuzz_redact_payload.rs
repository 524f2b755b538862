//! Fuzz target for payload redaction.
//!
//! Arbitrary bytes must either fail to decode or produce valid JSON.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ses_redact::redact_payload;

fuzz_target!(|data: &[u8]| {
    if let Ok(redacted) = redact_payload(data) {
        assert!(serde_json::from_slice::<serde_json::Value>(&redacted.data).is_ok());
    }
});
