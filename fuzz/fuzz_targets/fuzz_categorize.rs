#![no_main]

use keystone_errors::{
    categorize_error, get_max_retry_attempts, is_recoverable, is_retryable, should_retry,
    ErrorCategory, ErrorCode,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (i64, u32)| {
    let (raw, attempt) = input;
    let category = categorize_error(raw);

    if !(1000..=9999).contains(&raw) {
        assert_eq!(category, ErrorCategory::Runtime);
    }
    if is_retryable(raw) {
        assert!(is_recoverable(raw));
    }
    if attempt >= 3 {
        assert!(!should_retry(raw, attempt));
    }
    let _ = get_max_retry_attempts(raw);

    if let Ok(code) = ErrorCode::try_from(raw) {
        assert_eq!(code.category(), category);
        assert_eq!(i64::from(code), raw);
    }
});
