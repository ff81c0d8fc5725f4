//! Property tests for the input side of the pipeline.

use proptest::prelude::*;
use tcm_query::{InputOutcome, QueryConfig, QueryDebouncer};

proptest! {
    #[test]
    fn short_terms_always_clear(raw in "[ \t]{0,3}[a-zA-Z0-9]?[ \t]{0,3}", min_length in 2usize..6) {
        let mut debouncer = QueryDebouncer::new(QueryConfig { debounce_ms: 150, min_length });
        prop_assert_eq!(debouncer.input(&raw), InputOutcome::Cleared);
        prop_assert!(!debouncer.is_pending());
    }

    #[test]
    fn clear_drops_previously_scheduled_term(long in "[a-z]{4,12}", short in "[a-z]?") {
        let mut debouncer = QueryDebouncer::new(QueryConfig { debounce_ms: 150, min_length: 2 });
        prop_assert_eq!(debouncer.input(&long), InputOutcome::Scheduled);
        prop_assert_eq!(debouncer.input(&short), InputOutcome::Cleared);
        prop_assert!(!debouncer.is_pending());
    }

    #[test]
    fn long_enough_terms_schedule(raw in "[a-z]{2,20}") {
        let mut debouncer = QueryDebouncer::new(QueryConfig::default());
        prop_assert_eq!(debouncer.input(&raw), InputOutcome::Scheduled);
        prop_assert!(debouncer.is_pending());
    }
}
