#![no_main]

use keystone_errors::{is_valid_error_code, to_app_error};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        if let Ok(text) = std::str::from_utf8(data) {
            assert_eq!(to_app_error(text).message(), text);
        }
        return;
    };

    let err = to_app_error(value);
    assert!(is_valid_error_code(err.code()));
    assert_eq!(err.category(), err.code().category());

    let mut line = String::new();
    err.to_log_record().write_to(&mut line).unwrap();
    let json = err.to_log_record().to_json().unwrap();
    assert!(!json.is_empty());
});
