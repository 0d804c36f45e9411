//! Convenience macros for declaring codes and building errors.
//!
//! # Macros
//!
//! - [`define_error_code!`] / [`define_error_codes!`]: declare registry
//!   constants (validated at compile time by `ErrorCode::const_new`)
//! - [`app_err!`]: build an [`ExtendedAppError`](crate::ExtendedAppError)
//!   with a formatted message
//! - [`ensure!`]: early-return an `Err` when a condition does not hold,
//!   the statement form of [`crate::assert`]
//!
//! # Usage
//!
//! ```rust
//! use keystone_errors::{app_err, ensure, definitions, Result};
//!
//! fn parse_port(raw: &str) -> Result<u16> {
//!     let port: u16 = raw
//!         .parse()
//!         .map_err(|_| app_err!(definitions::INVALID_FORMAT, "not a port: {}", raw))?;
//!     ensure!(port >= 1024, code = definitions::OUT_OF_RANGE, "port {} is privileged", port);
//!     Ok(port)
//! }
//!
//! assert_eq!(parse_port("8080").unwrap(), 8080);
//! assert_eq!(parse_port("80").unwrap_err().code(), definitions::OUT_OF_RANGE);
//! ```

// ============================================================================
// Error Creation Macros
// ============================================================================

/// Build an [`ExtendedAppError`](crate::ExtendedAppError) with a formatted
/// message and default options.
///
/// # Example
///
/// ```rust
/// # use keystone_errors::{app_err, definitions, ErrorCategory};
/// let attempts = 3;
/// let err = app_err!(definitions::CONNECTION_FAILED, "gave up after {} attempts", attempts);
/// assert_eq!(err.message(), "gave up after 3 attempts");
/// assert_eq!(err.category(), ErrorCategory::Network);
/// ```
#[macro_export]
macro_rules! app_err {
    ($code:expr, $($arg:tt)+) => {
        $crate::create_error($code, format!($($arg)+), $crate::ErrorOptions::default())
    };
}

/// Return `Err` from the enclosing function unless a condition holds.
///
/// The error code defaults to `ASSERTION_FAILED`; override it with
/// `code = ...` before the message.
///
/// # Example
///
/// ```rust
/// # use keystone_errors::{ensure, definitions, Result};
/// fn check(len: usize) -> Result<()> {
///     ensure!(len > 0, "buffer must not be empty");
///     ensure!(len <= 64, code = definitions::INVALID_LENGTH, "buffer too long: {}", len);
///     Ok(())
/// }
///
/// assert_eq!(check(0).unwrap_err().code(), definitions::ASSERTION_FAILED);
/// assert_eq!(check(65).unwrap_err().code(), definitions::INVALID_LENGTH);
/// assert!(check(8).is_ok());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, code = $code:expr, $($arg:tt)+) => {
        if !($cond) {
            return ::core::result::Result::Err($crate::app_err!($code, $($arg)+).into());
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        $crate::ensure!($cond, code = $crate::definitions::ASSERTION_FAILED, $($arg)+)
    };
}

// ============================================================================
// Code Definition Macros
// ============================================================================

/// Define a single registry constant.
///
/// # Example
///
/// ```rust
/// # use keystone_errors::{define_error_code, ErrorCategory};
/// define_error_code!(CACHE_MISS, 8100, ErrorCategory::Resource);
/// assert_eq!(CACHE_MISS.name(), "CACHE_MISS");
/// ```
#[macro_export]
macro_rules! define_error_code {
    ($name:ident, $code:expr, $category:expr) => {
        #[doc = concat!("`", stringify!($name), "` = ", stringify!($code))]
        pub const $name: $crate::ErrorCode =
            $crate::ErrorCode::const_new(stringify!($name), $code, $category);
    };
}

/// Define a category block: one constant per code plus a table of all of them.
///
/// # Example
///
/// ```rust
/// # use keystone_errors::{define_error_codes, ErrorCategory};
/// define_error_codes! {
///     EXTRA_CODES, ErrorCategory::Timeout => {
///         SLOW_DISK = 7100,
///         SLOW_PEER = 7101,
///     }
/// }
/// assert_eq!(EXTRA_CODES, &[SLOW_DISK, SLOW_PEER]);
/// ```
#[macro_export]
macro_rules! define_error_codes {
    ($table:ident, $category:expr => { $( $name:ident = $code:expr ),+ $(,)? }) => {
        $(
            $crate::define_error_code!($name, $code, $category);
        )+

        #[doc = concat!("Every code declared in the `", stringify!($category), "` block.")]
        pub const $table: &[$crate::ErrorCode] = &[ $( $name ),+ ];
    };
}

// ============================================================================
// Tests
// ============================================================================
