//! Property-based tests for email masking.
//!
//! Uses proptest to verify the masking laws hold across many generated
//! addresses and free-form strings.

use proptest::prelude::*;
use ses_redact::{find_email_addresses, mask_email};

/// Build the expected masked form of a well-formed `local@domain`.
fn expected_mask(local: &str, domain: &str) -> String {
    let local_masked = format!("{}{}", &local[..1], "*".repeat(local.len() - 1));
    let domain_masked = if domain.len() > 2 {
        format!(
            "{}{}{}",
            &domain[..1],
            "*".repeat(domain.len() - 2),
            &domain[domain.len() - 1..]
        )
    } else {
        domain.to_string()
    };
    format!("{}@{}", local_masked, domain_masked)
}

fn local_part() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9._%+-]{1,20}"
}

fn domain_part() -> impl Strategy<Value = String> {
    ("[a-zA-Z0-9-]{1,15}", "[a-zA-Z]{2,6}").prop_map(|(label, tld)| format!("{}.{}", label, tld))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Strings without '@' never contain an address and are returned as-is.
    #[test]
    fn no_at_sign_is_identity(s in "[^@]{0,64}") {
        prop_assert_eq!(mask_email(&s), s);
    }

    /// Strings without any address shape are returned as-is.
    #[test]
    fn no_match_is_identity(s in ".{0,64}") {
        prop_assume!(find_email_addresses(&s).is_empty());
        prop_assert_eq!(mask_email(&s), s);
    }

    /// A bare address keeps its first local char and the domain's ends.
    #[test]
    fn single_address_mask_shape(local in local_part(), domain in domain_part()) {
        let address = format!("{}@{}", local, domain);
        prop_assert_eq!(mask_email(&address), expected_mask(&local, &domain));
    }

    /// Display names and brackets are dropped; addresses keep their order.
    #[test]
    fn display_names_dropped_in_order(
        first in ("[a-z]{1,10}", "[a-z]{2,10}\\.[a-z]{2,4}"),
        second in ("[a-z]{1,10}", "[a-z]{2,10}\\.[a-z]{2,4}"),
        name in "[A-Z][a-z]{0,8}( [A-Z][a-z]{0,8})?"
    ) {
        let input = format!("{} <{}@{}>, {}@{}", name, first.0, first.1, second.0, second.1);
        let expected = format!(
            "{},{}",
            expected_mask(&first.0, &first.1),
            expected_mask(&second.0, &second.1)
        );
        prop_assert_eq!(mask_email(&input), expected);
    }

    /// No address found in the input survives in the output, even the
    /// shortest ones.
    #[test]
    fn found_addresses_never_survive(
        prefix in "[ a-zA-Z<]{0,8}",
        local in local_part(),
        domain in domain_part(),
        suffix in "[ >,;]{0,4}"
    ) {
        let input = format!("{}{}@{}{}", prefix, local, domain, suffix);
        let masked = mask_email(&input);
        for address in find_email_addresses(&input) {
            prop_assert!(!masked.contains(address), "{} survived in {}", address, masked);
        }
    }

    /// N addresses produce N comma-separated groups.
    #[test]
    fn group_count_matches_address_count(
        locals in prop::collection::vec("[a-z]{1,8}", 1..6)
    ) {
        let input = locals
            .iter()
            .map(|l| format!("{}@example.com", l))
            .collect::<Vec<_>>()
            .join("; ");
        let masked = mask_email(&input);
        prop_assert_eq!(masked.split(',').count(), locals.len());
        for group in masked.split(',') {
            prop_assert!(group.ends_with("@e*********m"));
        }
    }
}
