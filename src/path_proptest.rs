//! Property-based tests for path manipulation functions.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{is_ancestor_or_self, join_logical, normalize_logical};
    use proptest::prelude::*;

    // ============================================================================
    // normalize_logical property tests
    // ============================================================================

    proptest! {
        /// Property: normalize_logical is idempotent
        #[test]
        fn normalize_logical_is_idempotent(input in "[a-z/\\\\.]{0,24}") {
            if let Ok(once) = normalize_logical(&input) {
                let twice = normalize_logical(&once).unwrap();
                prop_assert_eq!(once, twice);
            }
        }

        /// Property: normalized paths never contain backslashes or empty segments
        #[test]
        fn normalize_logical_output_is_clean(input in "[a-z/\\\\.]{0,24}") {
            if let Ok(normalized) = normalize_logical(&input) {
                prop_assert!(!normalized.contains('\\'));
                prop_assert!(!normalized.contains("//"));
                prop_assert!(normalized == "/" || !normalized.ends_with('/'));
            }
        }

        /// Property: the leading separator is preserved
        #[test]
        fn normalize_logical_keeps_absoluteness(input in "/?[a-z]{1,8}(/[a-z]{1,8}){0,3}") {
            let normalized = normalize_logical(&input).unwrap();
            prop_assert_eq!(normalized.starts_with('/'), input.starts_with('/'));
        }

        /// Property: any path containing a `..` segment is rejected
        #[test]
        fn normalize_logical_rejects_parent_segments(
            head in "[a-z]{1,8}",
            tail in "[a-z]{1,8}",
        ) {
            let input = format!("/{}/../{}", head, tail);
            prop_assert!(normalize_logical(&input).is_err());
        }
    }

    // ============================================================================
    // ancestry property tests
    // ============================================================================

    proptest! {
        /// Property: a joined path always has its base as an ancestor
        #[test]
        fn joined_path_has_base_as_ancestor(
            base in "/[a-z]{1,8}(/[a-z]{1,8}){0,2}",
            child in "[a-z]{1,8}",
        ) {
            let joined = join_logical(&base, &child);
            prop_assert!(is_ancestor_or_self(&base, &joined));
            prop_assert!(!is_ancestor_or_self(&joined, &base));
        }

        /// Property: extending the last segment does not create ancestry
        #[test]
        fn sibling_prefix_is_not_ancestor(
            base in "/[a-z]{1,8}",
            suffix in "[a-z]{1,8}",
        ) {
            let sibling = format!("{}{}", base, suffix);
            prop_assert!(!is_ancestor_or_self(&base, &sibling));
        }
    }
}
