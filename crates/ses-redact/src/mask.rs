//! Email address masking.
//!
//! Extracts every email-shaped substring from a free-form value (a bare
//! address, a `Display Name <addr>` header, or a comma-separated list) and
//! replaces the whole value with the masked addresses. Values with no
//! recognizable address pass through unchanged.
//!
//! Masking keeps the first character of the local part and the first and
//! last characters of the domain part; everything else becomes `*`:
//!
//! ```
//! use ses_redact::mask_email;
//!
//! assert_eq!(mask_email("bob12@example.com"), "b****@e*********m");
//! assert_eq!(mask_email("no address here"), "no address here");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

/// Character used to replace masked characters.
pub const MASK_CHAR: char = '*';

/// Separator placed between masked addresses found in one value.
pub const ADDRESS_SEPARATOR: &str = ",";

// Local part, `@`, domain labels, literal dot, alphabetic TLD of 2+ letters.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap()
});

/// Return every email address found in `value`, left to right.
///
/// Matches never overlap and never include display names, angle brackets
/// or separators.
pub fn find_email_addresses(value: &str) -> Vec<&str> {
    EMAIL_PATTERN.find_iter(value).map(|m| m.as_str()).collect()
}

/// Mask every email address embedded in `value`.
///
/// Returns the masked addresses joined by `,` in the order they appear.
/// Any text around the addresses is dropped. If no address is found the
/// original value is returned unchanged.
pub fn mask_email(value: &str) -> String {
    let addresses = find_email_addresses(value);
    if addresses.is_empty() {
        return value.to_string();
    }

    addresses
        .into_iter()
        .map(mask_address)
        .collect::<Vec<_>>()
        .join(ADDRESS_SEPARATOR)
}

/// Mask a single `local@domain` address.
fn mask_address(address: &str) -> String {
    match address.split_once('@') {
        Some((local, domain)) => {
            format!("{}@{}", mask_local_part(local), mask_domain_part(domain))
        }
        // Pattern matches always contain exactly one '@'.
        None => address.to_string(),
    }
}

/// Keep the first character and mask the rest.
///
/// A single-character local part is returned unchanged.
pub fn mask_local_part(local: &str) -> String {
    let mut chars = local.chars();
    match chars.next() {
        Some(first) => {
            let mut masked = String::with_capacity(local.len());
            masked.push(first);
            masked.extend(chars.map(|_| MASK_CHAR));
            masked
        }
        None => String::new(),
    }
}

/// Keep the first and last characters and mask everything in between.
///
/// Domains of two characters or fewer are returned unchanged.
pub fn mask_domain_part(domain: &str) -> String {
    let count = domain.chars().count();
    if count <= 2 {
        return domain.to_string();
    }

    domain
        .chars()
        .enumerate()
        .map(|(i, c)| if i == 0 || i == count - 1 { c } else { MASK_CHAR })
        .collect()
}
