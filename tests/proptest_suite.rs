//! Property-based tests for keystone_errors
//!
//! These tests use proptest to generate random inputs and verify invariants hold.

use keystone_errors::{
    categorize_error, collect, create_error, definitions, generate_correlation_id_at,
    get_max_retry_attempts, get_retry_delay_with_rng, is_in_category, is_retryable,
    is_valid_error_code, partition, should_retry, to_app_error, ErrorCategory, ErrorCode,
    ErrorOptions, RetryDelayOptions,
};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::time::Duration;

fn arb_code() -> impl Strategy<Value = ErrorCode> {
    let codes: Vec<ErrorCode> = definitions::all().collect();
    prop::sample::select(codes)
}

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<f64>().prop_map(Value::from),
        "\\PC{0,20}".prop_map(Value::String),
    ];
    let tree = leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-zA-Z]{1,8}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    });
    let shaped = (any::<i64>(), "\\PC{0,20}", "[A-Za-z]{1,12}")
        .prop_map(|(code, message, name)| json!({ "code": code, "message": message, "name": name }));
    prop_oneof![tree, shaped]
}

// ============================================================================
// CLASSIFICATION PROPERTIES
// ============================================================================

proptest! {
    /// Every integer in a category's range maps to that category
    #[test]
    fn categorize_follows_thousands_digit(offset in 0i64..1000, index in 0usize..9) {
        let category = ErrorCategory::ALL[index];
        let code = i64::from(category.base_code()) + offset;
        prop_assert_eq!(categorize_error(code), category);
        prop_assert!(is_in_category(code, category));
    }

    /// Anything outside [1000, 9999] is RUNTIME
    #[test]
    fn categorize_out_of_range_is_runtime(
        code in prop_oneof![i64::MIN..1000i64, 10_000i64..i64::MAX]
    ) {
        prop_assert_eq!(categorize_error(code), ErrorCategory::Runtime);
    }

    /// Registered codes carry the category of their range
    #[test]
    fn registered_codes_are_consistent(code in arb_code()) {
        prop_assert_eq!(code.category(), categorize_error(code));
        prop_assert!(is_valid_error_code(code));
        prop_assert_eq!(ErrorCode::try_from(i64::from(code)).ok(), Some(code));
        prop_assert_eq!(ErrorCode::from_name(code.name()).ok(), Some(code));
    }
}

// ============================================================================
// RECOVERY PROPERTIES
// ============================================================================

proptest! {
    /// should_retry is is_retryable below the ceiling and false at or above it
    #[test]
    fn should_retry_respects_ceiling(code in any::<i64>(), attempt in 0u32..10) {
        let expected = attempt < 3 && is_retryable(code);
        prop_assert_eq!(should_retry(code, attempt), expected);
    }

    /// Retryable codes always advise at least one attempt
    #[test]
    fn retryable_codes_advise_attempts(code in arb_code()) {
        if is_retryable(code) {
            prop_assert!(get_max_retry_attempts(code) > 0);
        }
    }

    /// Without jitter the delay is min(1000 * 2^n, 30000)
    #[test]
    fn retry_delay_without_jitter(attempt in 0u32..64, seed in any::<u64>()) {
        let options = RetryDelayOptions::default().with_jitter(false);
        let mut rng = fastrand::Rng::with_seed(seed);
        let expected = 1000f64 * 2f64.powi(attempt as i32);
        let expected = Duration::from_millis(expected.min(30_000.0) as u64);
        prop_assert_eq!(get_retry_delay_with_rng(attempt, &options, &mut rng), expected);
    }

    /// With jitter the delay stays within ±10% of the clamped value
    #[test]
    fn retry_delay_jitter_band(attempt in 0u32..16, seed in any::<u64>()) {
        let options = RetryDelayOptions::default();
        let mut rng = fastrand::Rng::with_seed(seed);
        let base = (1000f64 * 2f64.powi(attempt as i32)).min(30_000.0);
        let millis = get_retry_delay_with_rng(attempt, &options, &mut rng).as_millis() as f64;
        prop_assert!(millis >= (base * 0.9).floor(), "{} below band of {}", millis, base);
        prop_assert!(millis <= (base * 1.1).ceil(), "{} above band of {}", millis, base);
    }
}

// ============================================================================
// COMBINATOR PROPERTIES
// ============================================================================

proptest! {
    /// collect returns the first error by index, or every value in order
    #[test]
    fn collect_first_error_wins(items in prop::collection::vec(any::<Result<u8, u8>>(), 0..32)) {
        let expected = items.iter().find_map(|r| r.err());
        match collect(items.clone()) {
            Ok(values) => {
                prop_assert!(expected.is_none());
                prop_assert_eq!(values.len(), items.len());
            }
            Err(error) => prop_assert_eq!(Some(error), expected),
        }
    }

    /// partition keeps every element and its relative order
    #[test]
    fn partition_is_lossless(items in prop::collection::vec(any::<Result<u8, u8>>(), 0..32)) {
        let split = partition(items.clone());
        let oks: Vec<u8> = items.iter().filter_map(|r| r.ok()).collect();
        let errs: Vec<u8> = items.iter().filter_map(|r| r.err()).collect();
        prop_assert_eq!(split.successes, oks);
        prop_assert_eq!(split.failures, errs);
    }
}

// ============================================================================
// CONVERSION PROPERTIES
// ============================================================================

proptest! {
    /// Strings become the message verbatim
    #[test]
    fn string_message_preserved(s in "\\PC*") {
        let err = to_app_error(s.as_str());
        prop_assert_eq!(err.message(), s.as_str());
        prop_assert_eq!(err.code(), definitions::UNKNOWN_ERROR);
    }

    /// Any JSON value converts to an error with a registered code
    #[test]
    fn json_conversion_is_total(value in arb_json()) {
        let err = to_app_error(value);
        prop_assert!(is_valid_error_code(err.code()));
        prop_assert_eq!(err.category(), err.code().category());
        prop_assert!(err.correlation_id().starts_with("err-"));
    }

    /// Correlation ids have three dash-separated parts
    #[test]
    fn correlation_id_shape(timestamp in 0i64..i64::MAX, seed in any::<u64>()) {
        let mut rng = fastrand::Rng::with_seed(seed);
        let id = generate_correlation_id_at(timestamp, &mut rng);
        let parts: Vec<&str> = id.split('-').collect();
        prop_assert_eq!(parts.len(), 3);
        prop_assert_eq!(parts[0], "err");
        prop_assert_eq!(i64::from_str_radix(parts[1], 36).ok(), Some(timestamp));
        prop_assert_eq!(parts[2].len(), 7);
    }
}

// ============================================================================
// LOG RECORD PROPERTIES
// ============================================================================

proptest! {
    /// Text output is valid UTF-8 and bounded for any message
    #[test]
    fn log_line_truncation_is_bounded(s in "\\PC{0,5000}") {
        let err = create_error(definitions::INTERNAL_ERROR, s, ErrorOptions::default());
        let mut buffer = String::new();
        err.to_log_record().write_to(&mut buffer).unwrap();
        prop_assert!(std::str::from_utf8(buffer.as_bytes()).is_ok());
        prop_assert!(buffer.len() < 1024 + 256);
    }

    /// The JSON record parses back to the same record
    #[test]
    fn log_record_json_round_trip(code in arb_code(), message in "\\PC{0,200}") {
        let record = create_error(code, message, ErrorOptions::default()).to_log_record();
        let json = record.to_json().unwrap();
        let back: keystone_errors::ErrorLogRecord = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, record);
    }
}

// ============================================================================
// CONCURRENCY PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Errors built on many threads get distinct correlation ids
    #[test]
    fn concurrent_error_creation(thread_count in 2usize..8, per_thread in 1usize..32) {
        let handles: Vec<_> = (0..thread_count)
            .map(|_| {
                std::thread::spawn(move || {
                    (0..per_thread)
                        .map(|_| {
                            create_error(definitions::LOCK_TIMEOUT, "contended", ErrorOptions::default())
                                .correlation_id()
                                .to_owned()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids = std::collections::HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                prop_assert!(ids.insert(id));
            }
        }
        prop_assert_eq!(ids.len(), thread_count * per_thread);
    }
}
