//! Sub-document shapes of an SES event and their redactors.
//!
//! An SES event notification carries up to five PII-bearing sub-documents
//! under well-known top-level keys. Each shape knows which of its fields
//! hold email addresses or subject text and rewrites them in place.

use crate::document::{
    array_mut, object_mut, objects_mut, rewrite_str_elements, rewrite_str_field, set_str_field,
    str_field, Document,
};
use crate::mask::mask_email;
use serde::{Deserialize, Serialize};

/// Replacement text for every subject line.
pub const OMITTED_SUBJECT: &str = "**Omitted**";

/// Field holding the address in bounce/complaint/delay recipient entries.
const EMAIL_ADDRESS_FIELD: &str = "emailAddress";

/// A recognized sub-document of an SES event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventShape {
    /// `delivery`: successful delivery with a `recipients` list.
    Delivery,
    /// `mail`: the original message envelope and headers.
    Mail,
    /// `bounce`: `bouncedRecipients` entries.
    Bounce,
    /// `complaint`: `complainedRecipients` entries.
    Complaint,
    /// `deliveryDelay`: `delayedRecipients` entries.
    DeliveryDelay,
}

impl EventShape {
    /// All shapes, in the order they are applied to a document.
    pub const ALL: [EventShape; 5] = [
        EventShape::Delivery,
        EventShape::Mail,
        EventShape::Bounce,
        EventShape::Complaint,
        EventShape::DeliveryDelay,
    ];

    /// Top-level key of this shape in an event document.
    pub fn key(&self) -> &'static str {
        match self {
            EventShape::Delivery => "delivery",
            EventShape::Mail => "mail",
            EventShape::Bounce => "bounce",
            EventShape::Complaint => "complaint",
            EventShape::DeliveryDelay => "deliveryDelay",
        }
    }

    /// Redact this shape's sub-document in place.
    pub fn redact(&self, sub: &mut Document) {
        match self {
            EventShape::Delivery => redact_delivery(sub),
            EventShape::Mail => redact_mail(sub),
            EventShape::Bounce => redact_recipient_entries(sub, "bouncedRecipients"),
            EventShape::Complaint => redact_recipient_entries(sub, "complainedRecipients"),
            EventShape::DeliveryDelay => redact_recipient_entries(sub, "delayedRecipients"),
        }
    }

    /// Locate this shape in `event` and redact it.
    ///
    /// Returns `false` when the key is absent or not a mapping.
    pub fn apply(&self, event: &mut Document) -> bool {
        match object_mut(event, self.key()) {
            Some(sub) => {
                self.redact(sub);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Display for EventShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Mask every string element of the sequence at `key`.
fn mask_address_list(parent: &mut Document, key: &str) {
    if let Some(list) = array_mut(parent, key) {
        rewrite_str_elements(list, mask_email);
    }
}

fn redact_delivery(delivery: &mut Document) {
    mask_address_list(delivery, "recipients");
}

fn redact_mail(mail: &mut Document) {
    mask_address_list(mail, "destination");

    if let Some(common) = object_mut(mail, "commonHeaders") {
        mask_address_list(common, "to");
        // Always written, even when the event had no subject.
        set_str_field(common, "subject", OMITTED_SUBJECT);
    }

    if let Some(headers) = array_mut(mail, "headers") {
        for header in objects_mut(headers) {
            match MailHeader::of(header) {
                Some(MailHeader::To) => rewrite_str_field(header, "value", mask_email),
                Some(MailHeader::Subject) => set_str_field(header, "value", OMITTED_SUBJECT),
                None => {}
            }
        }
    }
}

/// Entries of `mail.headers` that carry PII.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MailHeader {
    To,
    Subject,
}

impl MailHeader {
    fn of(header: &Document) -> Option<Self> {
        match str_field(header, "name")? {
            "To" => Some(MailHeader::To),
            "Subject" => Some(MailHeader::Subject),
            _ => None,
        }
    }
}

fn redact_recipient_entries(parent: &mut Document, list_key: &str) {
    if let Some(entries) = array_mut(parent, list_key) {
        for entry in objects_mut(entries) {
            rewrite_str_field(entry, EMAIL_ADDRESS_FIELD, mask_email);
        }
    }
}
