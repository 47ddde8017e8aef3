use memcore_tokens::TokenCounter;
use proptest::prelude::*;

proptest! {
    #[test]
    fn count_is_always_non_negative(s in ".*") {
        let counter = TokenCounter::default();
        let count = counter.count(s.as_bytes());
        prop_assert!(count < u32::MAX);
    }

    #[test]
    fn cached_equals_uncached(s in ".{0,200}") {
        let counter = TokenCounter::default();
        let uncached = counter.count(s.as_bytes());
        let cached = counter.count_cached(s.as_bytes());
        prop_assert_eq!(uncached, cached);
    }

    #[test]
    fn count_is_deterministic(s in ".{0,200}") {
        let counter = TokenCounter::default();
        let a = counter.count(s.as_bytes());
        let b = counter.count(s.as_bytes());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn subadditivity(a in ".{0,100}", b in ".{0,100}") {
        let counter = TokenCounter::default();
        let combined = format!("{}{}", a, b);
        let count_a = counter.count(a.as_bytes());
        let count_b = counter.count(b.as_bytes());
        let count_combined = counter.count(combined.as_bytes());
        prop_assert!(
            count_combined <= count_a + count_b + 1,
            "subadditivity: {} <= {} + {} + 1",
            count_combined, count_a, count_b
        );
    }

    #[test]
    fn repeated_cached_lookups_stay_stable(s in ".{1,150}") {
        let counter = TokenCounter::default();
        let first = counter.count_cached(s.as_bytes());
        for _ in 0..5 {
            prop_assert_eq!(counter.count_cached(s.as_bytes()), first);
        }
    }
}
