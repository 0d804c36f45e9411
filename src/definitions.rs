//! The error code registry.
//!
//! # Taxonomy & Governance
//!
//! Every code the system may emit is declared here, one block per category.
//! Each block starts at its category's base code and is numbered contiguously
//! with no gaps. Numeric ranges, contiguity and name/value uniqueness are all
//! checked by the `tests` module at the bottom of this file.
//!
//! The table is **append-only**: add new codes at the end of their block and
//! never renumber or reuse an existing one. Consumers persist these integers.
//!
//! # Recovery Policy by Block
//!
//! The comment above each block restates the category's policy from
//! [`ErrorCategory`]; the table on that type is authoritative.

use crate::{define_error_codes, ErrorCategory, ErrorCode};

/// Range boundaries for each category block, both ends inclusive.
/// Checked for consistency in `tests` module.
pub mod ranges {
    macro_rules! block {
        ($label:literal, $start:ident = $lo:literal, $end:ident = $hi:literal) => {
            #[doc = concat!("First code of the ", $label, " block")]
            pub const $start: u16 = $lo;
            #[doc = concat!("Last code of the ", $label, " block")]
            pub const $end: u16 = $hi;
        };
    }

    block!("VALIDATION", VALIDATION_START = 1000, VALIDATION_END = 1999);
    block!("RUNTIME", RUNTIME_START = 2000, RUNTIME_END = 2999);
    block!("NETWORK", NETWORK_START = 3000, NETWORK_END = 3999);
    block!("FILESYSTEM", FILESYSTEM_START = 4000, FILESYSTEM_END = 4999);
    block!("CONFIGURATION", CONFIGURATION_START = 5000, CONFIGURATION_END = 5999);
    block!("SECURITY", SECURITY_START = 6000, SECURITY_END = 6999);
    block!("TIMEOUT", TIMEOUT_START = 7000, TIMEOUT_END = 7999);
    block!("RESOURCE", RESOURCE_START = 8000, RESOURCE_END = 8999);
    block!("AUTH", AUTH_START = 9000, AUTH_END = 9999);

    /// `(start, end)` for a category.
    pub const fn bounds(category: crate::ErrorCategory) -> (u16, u16) {
        use crate::ErrorCategory::*;
        match category {
            Validation => (VALIDATION_START, VALIDATION_END),
            Runtime => (RUNTIME_START, RUNTIME_END),
            Network => (NETWORK_START, NETWORK_END),
            Filesystem => (FILESYSTEM_START, FILESYSTEM_END),
            Configuration => (CONFIGURATION_START, CONFIGURATION_END),
            Security => (SECURITY_START, SECURITY_END),
            Timeout => (TIMEOUT_START, TIMEOUT_END),
            Resource => (RESOURCE_START, RESOURCE_END),
            Auth => (AUTH_START, AUTH_END),
        }
    }
}

// -----------------------------------------------------------------------------
// VALIDATION (1000-1999)
// -----------------------------------------------------------------------------
// SEVERITY: WARNING
// POLICY: Permanent; fix the input, never retry
define_error_codes! {
    VALIDATION_CODES, ErrorCategory::Validation => {
        VALIDATION_FAILED        = 1000,
        INVALID_INPUT            = 1001,
        MISSING_REQUIRED_FIELD   = 1002,
        INVALID_FORMAT           = 1003,
        INVALID_TYPE             = 1004,
        OUT_OF_RANGE             = 1005,
        INVALID_LENGTH           = 1006,
        PATTERN_MISMATCH         = 1007,
        INVALID_ENUM_VALUE       = 1008,
        SCHEMA_VALIDATION_FAILED = 1009,
        CONSTRAINT_VIOLATION     = 1010,
        DUPLICATE_VALUE          = 1011,
        INVALID_JSON             = 1012,
        INVALID_DATE             = 1013,
        INVALID_EMAIL            = 1014,
        INVALID_URL              = 1015,
    }
}

// -----------------------------------------------------------------------------
// RUNTIME (2000-2999)
// -----------------------------------------------------------------------------
// SEVERITY: ERROR
// POLICY: Non-recoverable; also the fallback category for unmapped codes
define_error_codes! {
    RUNTIME_CODES, ErrorCategory::Runtime => {
        UNKNOWN_ERROR            = 2000,
        NOT_IMPLEMENTED          = 2001,
        INVALID_STATE            = 2002,
        INVALID_OPERATION        = 2003,
        UNSUPPORTED_OPERATION    = 2004,
        NULL_REFERENCE           = 2005,
        TYPE_ERROR               = 2006,
        RANGE_ERROR              = 2007,
        STACK_OVERFLOW           = 2008,
        DEADLOCK_DETECTED        = 2009,
        CONCURRENT_MODIFICATION  = 2010,
        INITIALIZATION_FAILED    = 2011,
        SHUTDOWN_FAILED          = 2012,
        DEPENDENCY_ERROR         = 2013,
        PLUGIN_ERROR             = 2014,
        SERIALIZATION_ERROR      = 2015,
        DESERIALIZATION_ERROR    = 2016,
        PARSE_ERROR              = 2017,
        ASSERTION_FAILED         = 2018,
        INTERNAL_ERROR           = 2019,
        OPERATION_CANCELLED      = 2020,
    }
}

// -----------------------------------------------------------------------------
// NETWORK (3000-3999)
// -----------------------------------------------------------------------------
// SEVERITY: ERROR
// POLICY: Transient; retry with backoff, advised ceiling 3
define_error_codes! {
    NETWORK_CODES, ErrorCategory::Network => {
        NETWORK_ERROR            = 3000,
        CONNECTION_FAILED        = 3001,
        CONNECTION_TIMEOUT       = 3002,
        CONNECTION_REFUSED       = 3003,
        CONNECTION_RESET         = 3004,
        HOST_UNREACHABLE         = 3005,
        DNS_LOOKUP_FAILED        = 3006,
        TLS_HANDSHAKE_FAILED     = 3007,
        PROXY_ERROR              = 3008,
        HTTP_ERROR               = 3009,
        BAD_GATEWAY              = 3010,
        SERVICE_UNAVAILABLE      = 3011,
        GATEWAY_TIMEOUT          = 3012,
        TOO_MANY_REDIRECTS       = 3013,
        REQUEST_FAILED           = 3014,
        INVALID_RESPONSE         = 3015,
    }
}

// -----------------------------------------------------------------------------
// FILESYSTEM (4000-4999)
// -----------------------------------------------------------------------------
// SEVERITY: ERROR
// POLICY: Non-recoverable (conservative, even for transient-looking failures)
define_error_codes! {
    FILESYSTEM_CODES, ErrorCategory::Filesystem => {
        FILESYSTEM_ERROR         = 4000,
        FILE_NOT_FOUND           = 4001,
        FILE_ALREADY_EXISTS      = 4002,
        PERMISSION_DENIED        = 4003,
        DIRECTORY_NOT_FOUND      = 4004,
        DIRECTORY_NOT_EMPTY      = 4005,
        NOT_A_DIRECTORY          = 4006,
        IS_A_DIRECTORY           = 4007,
        FILE_TOO_LARGE           = 4008,
        DISK_FULL                = 4009,
        READ_ERROR               = 4010,
        WRITE_ERROR              = 4011,
        FILE_LOCKED              = 4012,
        PATH_TOO_LONG            = 4013,
        INVALID_PATH             = 4014,
        SYMLINK_LOOP             = 4015,
    }
}

// -----------------------------------------------------------------------------
// CONFIGURATION (5000-5999)
// -----------------------------------------------------------------------------
// SEVERITY: ERROR
// POLICY: Non-recoverable; fix the configuration source
define_error_codes! {
    CONFIGURATION_CODES, ErrorCategory::Configuration => {
        CONFIGURATION_ERROR            = 5000,
        CONFIG_NOT_FOUND               = 5001,
        CONFIG_PARSE_ERROR             = 5002,
        CONFIG_VALIDATION_FAILED       = 5003,
        MISSING_CONFIG_VALUE           = 5004,
        INVALID_CONFIG_VALUE           = 5005,
        CONFIG_TYPE_MISMATCH           = 5006,
        UNSUPPORTED_CONFIG_FORMAT      = 5007,
        ENV_VAR_MISSING                = 5008,
        ENV_VAR_INVALID                = 5009,
        CONFIG_MERGE_CONFLICT          = 5010,
        CONFIG_WRITE_FAILED            = 5011,
        SCHEMA_GENERATION_FAILED       = 5012,
        CONFIG_PATH_RESOLUTION_FAILED  = 5013,
    }
}

// -----------------------------------------------------------------------------
// SECURITY (6000-6999)
// -----------------------------------------------------------------------------
// SEVERITY: CRITICAL
// POLICY: Permanent; alert, never retry
define_error_codes! {
    SECURITY_CODES, ErrorCategory::Security => {
        SECURITY_ERROR           = 6000,
        UNAUTHORIZED_ACCESS      = 6001,
        FORBIDDEN                = 6002,
        INVALID_SIGNATURE        = 6003,
        ENCRYPTION_FAILED        = 6004,
        DECRYPTION_FAILED        = 6005,
        CERTIFICATE_INVALID      = 6006,
        CERTIFICATE_EXPIRED      = 6007,
        INTEGRITY_CHECK_FAILED   = 6008,
        SECRET_EXPOSED           = 6009,
        CSRF_DETECTED            = 6010,
        INJECTION_DETECTED       = 6011,
        ABUSE_DETECTED           = 6012,
        SANDBOX_VIOLATION        = 6013,
    }
}

// -----------------------------------------------------------------------------
// TIMEOUT (7000-7999)
// -----------------------------------------------------------------------------
// SEVERITY: WARNING
// POLICY: Transient; retry with backoff, advised ceiling 2
define_error_codes! {
    TIMEOUT_CODES, ErrorCategory::Timeout => {
        TIMEOUT_ERROR            = 7000,
        OPERATION_TIMEOUT        = 7001,
        REQUEST_TIMEOUT          = 7002,
        READ_TIMEOUT             = 7003,
        WRITE_TIMEOUT            = 7004,
        LOCK_TIMEOUT             = 7005,
        IDLE_TIMEOUT             = 7006,
        DEADLINE_EXCEEDED        = 7007,
        RESPONSE_TIMEOUT         = 7008,
        QUERY_TIMEOUT            = 7009,
    }
}

// -----------------------------------------------------------------------------
// RESOURCE (8000-8999)
// -----------------------------------------------------------------------------
// SEVERITY: ERROR
// POLICY: Recoverable but not auto-retryable; advised ceiling 5 for manual retry
define_error_codes! {
    RESOURCE_CODES, ErrorCategory::Resource => {
        RESOURCE_ERROR           = 8000,
        RESOURCE_NOT_FOUND       = 8001,
        RESOURCE_EXHAUSTED       = 8002,
        OUT_OF_MEMORY            = 8003,
        QUOTA_EXCEEDED           = 8004,
        RATE_LIMITED             = 8005,
        RESOURCE_LOCKED          = 8006,
        RESOURCE_BUSY            = 8007,
        TOO_MANY_OPEN_FILES      = 8008,
        POOL_EXHAUSTED           = 8009,
        CAPACITY_EXCEEDED        = 8010,
        RESOURCE_CONFLICT        = 8011,
        RESOURCE_GONE            = 8012,
    }
}

// -----------------------------------------------------------------------------
// AUTH (9000-9999)
// -----------------------------------------------------------------------------
// SEVERITY: ERROR
// POLICY: Permanent; re-authenticate, never retry blindly
define_error_codes! {
    AUTH_CODES, ErrorCategory::Auth => {
        AUTH_ERROR               = 9000,
        AUTHENTICATION_FAILED    = 9001,
        INVALID_CREDENTIALS      = 9002,
        TOKEN_EXPIRED            = 9003,
        TOKEN_INVALID            = 9004,
        TOKEN_MISSING            = 9005,
        SESSION_EXPIRED          = 9006,
        SESSION_INVALID          = 9007,
        ACCOUNT_LOCKED           = 9008,
        ACCOUNT_DISABLED         = 9009,
        MFA_REQUIRED             = 9010,
        MFA_FAILED               = 9011,
        INSUFFICIENT_PERMISSIONS = 9012,
        TOKEN_REFRESH_FAILED     = 9013,
    }
}

/// Registered codes of one category, in ascending order.
pub const fn codes_in(category: ErrorCategory) -> &'static [ErrorCode] {
    match category {
        ErrorCategory::Validation => VALIDATION_CODES,
        ErrorCategory::Runtime => RUNTIME_CODES,
        ErrorCategory::Network => NETWORK_CODES,
        ErrorCategory::Filesystem => FILESYSTEM_CODES,
        ErrorCategory::Configuration => CONFIGURATION_CODES,
        ErrorCategory::Security => SECURITY_CODES,
        ErrorCategory::Timeout => TIMEOUT_CODES,
        ErrorCategory::Resource => RESOURCE_CODES,
        ErrorCategory::Auth => AUTH_CODES,
    }
}

/// Every registered code, in ascending order.
pub fn all() -> impl Iterator<Item = ErrorCode> {
    ErrorCategory::ALL
        .into_iter()
        .flat_map(|category| codes_in(category).iter().copied())
}

/// Resolve a raw value to its registered code.
///
/// Blocks are contiguous from their base, so this is an index, not a scan.
pub fn lookup(value: i64) -> Option<ErrorCode> {
    let category = ErrorCategory::for_code(value)?;
    let offset = usize::try_from(value - i64::from(category.base_code())).ok()?;
    codes_in(category)
        .get(offset)
        .copied()
        .filter(|code| i64::from(code.value()) == value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Every block must start at its base and count up without gaps.
    #[test]
    fn blocks_are_contiguous_from_base() {
        for category in ErrorCategory::ALL {
            let table = codes_in(category);
            assert!(!table.is_empty(), "{category} has no codes");
            for (offset, code) in table.iter().enumerate() {
                assert_eq!(
                    usize::from(code.value()),
                    usize::from(category.base_code()) + offset,
                    "gap in {category} at {}",
                    code.name()
                );
                assert_eq!(code.category(), category);
            }
        }
    }

    #[test]
    fn names_and_values_are_unique() {
        let mut values = HashSet::new();
        let mut names = HashSet::new();
        for code in all() {
            assert!(values.insert(code.value()), "duplicate value {}", code.value());
            assert!(names.insert(code.name()), "duplicate name {}", code.name());
        }
    }

    #[test]
    fn range_table_matches_categories() {
        for category in ErrorCategory::ALL {
            let (start, end) = ranges::bounds(category);
            assert_eq!(start, category.base_code());
            assert_eq!(end, start + 999);
            for code in codes_in(category) {
                assert!((start..=end).contains(&code.value()), "{} outside {:?}", code, category);
            }
        }
    }

    #[test]
    fn enforce_category_ranges() {
        assert!(VALIDATION_FAILED.value() >= ranges::VALIDATION_START);
        assert!(INVALID_URL.value() <= ranges::VALIDATION_END);
        assert!(UNKNOWN_ERROR.value() >= ranges::RUNTIME_START);
        assert!(OPERATION_CANCELLED.value() <= ranges::RUNTIME_END);
        assert!(NETWORK_ERROR.value() >= ranges::NETWORK_START);
        assert!(FILESYSTEM_ERROR.value() >= ranges::FILESYSTEM_START);
        assert!(CONFIGURATION_ERROR.value() >= ranges::CONFIGURATION_START);
        assert!(SECURITY_ERROR.value() >= ranges::SECURITY_START);
        assert!(TIMEOUT_ERROR.value() >= ranges::TIMEOUT_START);
        assert!(RESOURCE_ERROR.value() >= ranges::RESOURCE_START);
        assert!(AUTH_ERROR.value() >= ranges::AUTH_START);
        assert!(TOKEN_REFRESH_FAILED.value() <= ranges::AUTH_END);
    }

    #[test]
    fn pinned_codes_never_move() {
        assert_eq!(UNKNOWN_ERROR.value(), 2000);
        assert_eq!(ASSERTION_FAILED.value(), 2018);
        assert_eq!(INTERNAL_ERROR.value(), 2019);
        assert_eq!(CONNECTION_TIMEOUT.value(), 3002);
        assert_eq!(UNAUTHORIZED_ACCESS.value(), 6001);
    }

    #[test]
    fn lookup_round_trips_every_code() {
        for code in all() {
            assert_eq!(lookup(i64::from(code.value())), Some(code));
        }
        assert_eq!(lookup(1016), None);
        assert_eq!(lookup(-2019), None);
        assert_eq!(lookup(i64::MAX), None);
    }

    #[test]
    fn all_is_ascending() {
        let values: Vec<u16> = all().map(ErrorCode::value).collect();
        let mut sorted = values.clone();
        sorted.sort_unstable();
        assert_eq!(values, sorted);
    }
}
