//! PII redaction for Amazon SES event notifications.
//!
//! SES publishes delivery, bounce, complaint and delay notifications that
//! embed recipient addresses and subject lines. This crate rewrites those
//! fields in an untyped JSON document so the event can be stored or
//! forwarded without exposing the original values.
//!
//! # Key Features
//!
//! - **Address masking**: every address embedded in a value is reduced to
//!   its first character, `@`, and the first and last characters of the
//!   domain (`bob12@example.com` becomes `b****@e*********m`).
//! - **Subject removal**: subjects are replaced with [`OMITTED_SUBJECT`].
//! - **Tolerant traversal**: missing or oddly typed fields are left alone;
//!   only undecodable payloads fail.
//!
//! # Example
//!
//! ```
//! use ses_redact::redact_payload;
//!
//! let payload = br#"{"delivery":{"recipients":["bob12@example.com"]}}"#;
//! let redacted = redact_payload(payload).unwrap();
//! assert_eq!(
//!     redacted.data,
//!     br#"{"delivery":{"recipients":["b****@e*********m"]}}"#.to_vec()
//! );
//! ```

pub mod document;
pub mod error;
pub mod mask;
pub mod shape;
pub mod transform;

pub use document::Document;
pub use error::{JsonErrorSummary, Result, TransformError};
pub use mask::{find_email_addresses, mask_domain_part, mask_email, mask_local_part};
pub use shape::{EventShape, OMITTED_SUBJECT};
pub use transform::{redact_document, redact_payload, RedactedPayload};
