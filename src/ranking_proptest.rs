//! Property-based tests for name slugs and dense ranking.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::store::contributors::slug;
    use crate::sync::ranking::dense_ranks;
    use proptest::prelude::*;

    fn sorted_counts() -> impl Strategy<Value = Vec<u64>> {
        prop::collection::vec(0u64..50, 0..40).prop_map(|mut counts| {
            counts.sort_unstable_by(|a, b| b.cmp(a));
            counts
        })
    }

    // ============================================================================
    // dense_ranks property tests
    // ============================================================================

    proptest! {
        /// Property: the first rank is 1 and ranks never skip a value
        #[test]
        fn dense_ranks_start_at_one_without_gaps(counts in sorted_counts()) {
            let ranks = dense_ranks(counts.iter().copied());
            prop_assert_eq!(ranks.len(), counts.len());
            if let Some(first) = ranks.first() {
                prop_assert_eq!(*first, 1);
            }
            for pair in ranks.windows(2) {
                prop_assert!(pair[1] == pair[0] || pair[1] == pair[0] + 1);
            }
        }

        /// Property: equal counts share a rank, different counts do not
        #[test]
        fn dense_ranks_follow_count_equality(counts in sorted_counts()) {
            let ranks = dense_ranks(counts.iter().copied());
            for i in 1..counts.len() {
                prop_assert_eq!(counts[i] == counts[i - 1], ranks[i] == ranks[i - 1]);
            }
        }

        /// Property: the highest rank equals the number of distinct counts
        #[test]
        fn dense_ranks_max_is_distinct_count(counts in sorted_counts()) {
            let ranks = dense_ranks(counts.iter().copied());
            let mut distinct = counts.clone();
            distinct.dedup();
            prop_assert_eq!(ranks.last().copied().unwrap_or(0), distinct.len() as i64);
        }
    }

    // ============================================================================
    // slug property tests
    // ============================================================================

    proptest! {
        /// Property: slugs are never empty and never start or end with '-'
        #[test]
        fn slug_is_non_empty_and_trimmed(name in ".*") {
            let result = slug(&name);
            prop_assert!(!result.is_empty());
            prop_assert!(!result.starts_with('-'));
            prop_assert!(!result.ends_with('-'));
        }

        /// Property: slugs never contain URL path separators or whitespace
        #[test]
        fn slug_is_url_safe(name in ".*") {
            let result = slug(&name);
            prop_assert!(!result.contains('/'));
            prop_assert!(!result.chars().any(char::is_whitespace));
            prop_assert!(!result.contains("--"));
        }

        /// Property: lowercase ASCII words joined by single spaces map to dashes
        #[test]
        fn slug_of_simple_words(words in prop::collection::vec("[a-z]{1,8}", 1..4)) {
            let name = words.join(" ");
            prop_assert_eq!(slug(&name), words.join("-"));
        }
    }
}
