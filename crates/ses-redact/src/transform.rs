//! Whole-payload transformation.
//!
//! Decodes one record's raw bytes, runs every applicable shape redactor,
//! and encodes the result. Only decode and encode can fail; everything in
//! between is tolerant of unexpected structure.

use crate::document::Document;
use crate::error::{Result, TransformError};
use crate::shape::EventShape;
use std::borrow::Cow;

/// Escape substituted for unpaired UTF-16 surrogates.
const REPLACEMENT_ESCAPE: &str = "\\ufffd";

/// Output of a successful payload transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactedPayload {
    /// The re-encoded JSON document.
    pub data: Vec<u8>,

    /// Shapes found in the document and redacted, in application order.
    pub shapes: Vec<EventShape>,
}

/// Redact every recognized sub-document of `event` in place.
///
/// Returns the shapes that were present as mappings.
pub fn redact_document(event: &mut Document) -> Vec<EventShape> {
    EventShape::ALL
        .into_iter()
        .filter(|shape| shape.apply(event))
        .collect()
}

/// Decode, redact and re-encode one event payload.
///
/// A payload of `null` is accepted and comes back as `null`; any other
/// non-object JSON value is a decode error.
///
/// Decoding is lenient about text encoding: invalid UTF-8 sequences and
/// unpaired `\uD800`-`\uDFFF` escapes both become U+FFFD.
pub fn redact_payload(data: &[u8]) -> Result<RedactedPayload> {
    let text = String::from_utf8_lossy(data);
    let text = replace_lone_surrogates(&text);
    let mut event: Option<Document> =
        serde_json::from_str(&text).map_err(|e| TransformError::Decode(e.into()))?;

    let shapes = match event.as_mut() {
        Some(doc) => redact_document(doc),
        None => Vec::new(),
    };

    let data = serde_json::to_vec(&event).map_err(|e| TransformError::Encode(e.into()))?;
    Ok(RedactedPayload { data, shapes })
}

/// Rewrite `\uXXXX` escapes that name half of a surrogate pair without its
/// other half. Valid pairs and every other escape are left alone.
fn replace_lone_surrogates(text: &str) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    let mut out = String::new();
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'\\' {
            i += 1;
            continue;
        }
        match unicode_escape(bytes, i) {
            Some(unit) if is_high_surrogate(unit) => {
                if unicode_escape(bytes, i + 6).map_or(false, is_low_surrogate) {
                    i += 12;
                } else {
                    out.push_str(&text[copied..i]);
                    out.push_str(REPLACEMENT_ESCAPE);
                    i += 6;
                    copied = i;
                }
            }
            Some(unit) if is_low_surrogate(unit) => {
                out.push_str(&text[copied..i]);
                out.push_str(REPLACEMENT_ESCAPE);
                i += 6;
                copied = i;
            }
            Some(_) => i += 6,
            // `\\`, `\"` and friends; skip both bytes so an escaped
            // backslash is never read as the start of an escape.
            None => i += 2,
        }
    }

    if copied == 0 {
        Cow::Borrowed(text)
    } else {
        out.push_str(&text[copied..]);
        Cow::Owned(out)
    }
}

/// Code unit of a `\uXXXX` escape starting at `at`.
fn unicode_escape(bytes: &[u8], at: usize) -> Option<u16> {
    let escape = bytes.get(at..at + 6)?;
    if escape[0] != b'\\' || escape[1] != b'u' {
        return None;
    }
    let hex = std::str::from_utf8(&escape[2..]).ok()?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(hex, 16).ok()
}

fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::OMITTED_SUBJECT;
    use serde_json::{json, Value};

    fn redact_json(value: Value) -> (Value, Vec<EventShape>) {
        let bytes = serde_json::to_vec(&value).unwrap();
        let out = redact_payload(&bytes).unwrap();
        (serde_json::from_slice(&out.data).unwrap(), out.shapes)
    }

    #[test]
    fn test_no_known_shapes_passes_through() {
        let input = json!({"eventType": "Open", "open": {"ipAddress": "192.0.2.1"}});
        let (output, shapes) = redact_json(input.clone());
        assert_eq!(output, input);
        assert!(shapes.is_empty());
    }

    #[test]
    fn test_multiple_shapes_in_one_event() {
        let input = json!({
            "eventType": "Bounce",
            "bounce": {
                "bounceType": "Permanent",
                "bouncedRecipients": [{"emailAddress": "bob12@example.com"}]
            },
            "mail": {
                "source": "sender@example.com",
                "destination": ["bob12@example.com"],
                "commonHeaders": {"subject": "Hello", "to": ["bob12@example.com"]}
            }
        });
        let (output, shapes) = redact_json(input);

        assert_eq!(shapes, vec![EventShape::Mail, EventShape::Bounce]);
        assert_eq!(
            output["bounce"]["bouncedRecipients"][0]["emailAddress"],
            json!("b****@e*********m")
        );
        assert_eq!(output["bounce"]["bounceType"], json!("Permanent"));
        assert_eq!(output["mail"]["source"], json!("sender@example.com"));
        assert_eq!(output["mail"]["commonHeaders"]["subject"], json!(OMITTED_SUBJECT));
    }

    #[test]
    fn test_shape_key_with_wrong_type_is_skipped() {
        let input = json!({"mail": "oops", "delivery": null, "bounce": [1, 2]});
        let (output, shapes) = redact_json(input.clone());
        assert_eq!(output, input);
        assert!(shapes.is_empty());
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        let err = redact_payload(b"{not json").unwrap_err();
        assert!(matches!(err, TransformError::Decode(_)));
        assert_eq!(err.kind(), "decode");
    }

    #[test]
    fn test_non_object_json_is_decode_error() {
        for payload in [&b"[1,2,3]"[..], b"\"string\"", b"42", b"true", b""] {
            let err = redact_payload(payload).unwrap_err();
            assert!(matches!(err, TransformError::Decode(_)));
        }
    }

    #[test]
    fn test_null_payload_round_trips() {
        let out = redact_payload(b"null").unwrap();
        assert_eq!(out.data, b"null");
        assert!(out.shapes.is_empty());
    }

    #[test]
    fn test_decode_error_omits_payload() {
        let err = redact_payload(br#""Bob Smith <bob12@example.com>""#).unwrap_err();
        assert!(matches!(err, TransformError::Decode(_)));

        let text = err.to_string();
        assert!(!text.contains("bob12@example.com"), "leaked: {}", text);
        assert!(!text.contains("Bob Smith"), "leaked: {}", text);
    }

    #[test]
    fn test_invalid_utf8_in_string_is_replaced() {
        let out = redact_payload(b"{\"note\":\"caf\xe9\"}").unwrap();
        let value: Value = serde_json::from_slice(&out.data).unwrap();
        assert_eq!(value, json!({"note": "caf\u{fffd}"}));
    }

    #[test]
    fn test_lone_surrogate_is_replaced() {
        let out = redact_payload(br#"{"note":"Hi \ud83d","tail":"\udc00x"}"#).unwrap();
        let value: Value = serde_json::from_slice(&out.data).unwrap();
        assert_eq!(value, json!({"note": "Hi \u{fffd}", "tail": "\u{fffd}x"}));
    }

    #[test]
    fn test_surrogate_pairs_and_escaped_backslashes_kept() {
        let out =
            redact_payload(br#"{"emoji":"\ud83d\ude00","literal":"\\ud83d","a":"\u0041"}"#)
                .unwrap();
        let value: Value = serde_json::from_slice(&out.data).unwrap();
        assert_eq!(
            value,
            json!({"emoji": "\u{1f600}", "literal": "\\ud83d", "a": "A"})
        );
    }

    #[test]
    fn test_high_surrogate_before_other_escape() {
        assert_eq!(
            replace_lone_surrogates(r#""\ud83d\u0041""#),
            r#""\ufffd\u0041""#
        );
        assert!(matches!(
            replace_lone_surrogates(r#""plain \n text""#),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| {
            format!(
                "{{\"deep\":{}{}}}",
                "[".repeat(depth),
                "]".repeat(depth)
            )
        };
        assert!(redact_payload(nested(100).as_bytes()).is_ok());
        let err = redact_payload(nested(200).as_bytes()).unwrap_err();
        assert!(matches!(err, TransformError::Decode(_)));
    }

    #[test]
    fn test_output_is_compact_json() {
        let out = redact_payload(b"{ \"b\" : 1,\n \"a\" : [ ] }").unwrap();
        assert_eq!(String::from_utf8(out.data).unwrap(), r#"{"a":[],"b":1}"#);
    }
}
