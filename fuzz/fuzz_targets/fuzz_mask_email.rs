//! Fuzz target for email masking.
//!
//! Masking must never panic. A value without addresses comes back as-is;
//! otherwise there is one masked group per address and none of the
//! addresses found survive in the output.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ses_redact::{find_email_addresses, mask_email};

fuzz_target!(|data: &str| {
    let masked = mask_email(data);
    let found = find_email_addresses(data);
    if found.is_empty() {
        assert_eq!(masked, data);
    } else {
        assert_eq!(masked.split(',').count(), found.len());
        for address in &found {
            assert!(!masked.contains(address));
        }
    }
});
