//! # Keystone Errors
//!
//! Numeric error taxonomy, classification and Result utilities.
//!
//! ## Design Philosophy
//!
//! 1. **Every failure has a registered code** in one of nine 1000-wide ranges
//! 2. **The code decides the rest**: category, default severity and whether a
//!    retry can help all derive from it
//! 3. **Errors are values**: expected failures travel as `Err`, never as panics
//! 4. **Errors are immutable** once built
//! 5. **One wire shape** for anything persisted or shipped ([`ErrorLogRecord`])
//!
//! ## Modules
//!
//! - [`codes`], [`definitions`]: the code type, classifier and registry
//! - [`models`]: categories, severities and the two error shapes
//! - [`factory`]: construction, correlation ids and conversion of anything
//!   thrown
//! - [`recovery`]: retry decisions and delay calculation
//! - [`logging`]: the flat log record
//! - [`result`], [`combinators`], [`assertions`]: composing fallible steps
//!
//! ## Quick Start
//!
//! ```rust
//! use keystone_errors::{
//!     create_error, definitions, get_retry_delay, should_retry, ErrorCategory, ErrorOptions,
//!     ErrorSeverity, RetryDelayOptions, Result,
//! };
//!
//! fn connect(attempt: u32) -> Result<()> {
//!     Err(create_error(
//!         definitions::CONNECTION_TIMEOUT,
//!         format!("attempt {attempt} timed out"),
//!         ErrorOptions::default(),
//!     ))
//! }
//!
//! let err = connect(0).unwrap_err();
//! assert_eq!(err.category(), ErrorCategory::Network);
//! assert_eq!(err.severity(), ErrorSeverity::Error);
//! assert!(should_retry(err.code(), 0));
//!
//! let options = RetryDelayOptions::default().with_jitter(false);
//! assert_eq!(get_retry_delay(1, &options).as_millis(), 2000);
//! ```
//!
//! ## Converting Foreign Failures
//!
//! ```rust
//! use keystone_errors::{definitions, to_app_error, ResultExt};
//!
//! let parsed = "12x".parse::<u16>().into_app_error(definitions::INVALID_FORMAT);
//! assert_eq!(parsed.unwrap_err().name(), "ParseIntError");
//!
//! let from_json = to_app_error(serde_json::json!({ "message": "upstream said no" }));
//! assert_eq!(from_json.code(), definitions::UNKNOWN_ERROR);
//! ```
//!
//! ## Features
//!
//! - `tracing`: `ErrorLogRecord::emit` publishes records as `tracing` events

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assertions;
pub mod codes;
pub mod combinators;
pub mod convenience;
pub mod definitions;
pub mod factory;
pub mod logging;
pub mod models;
pub mod recovery;
pub mod result;

pub use assertions::*;
pub use codes::*;
pub use combinators::*;
pub use factory::*;
pub use logging::*;
pub use models::*;
pub use recovery::*;
pub use result::ResultExt;

/// Result whose error defaults to [`ExtendedAppError`].
pub type Result<T, E = ExtendedAppError> = std::result::Result<T, E>;

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn connection_timeout_end_to_end() {
        let err = create_error(definitions::CONNECTION_TIMEOUT, "t/o", ErrorOptions::default());
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Error);
        assert!(err.is_recoverable());
        assert!(err.is_retryable());
        assert_eq!(get_max_retry_attempts(err.code()), 3);
    }

    #[test]
    fn unauthorized_access_end_to_end() {
        let err = create_error(definitions::UNAUTHORIZED_ACCESS, "nope", ErrorOptions::default());
        assert_eq!(err.category(), ErrorCategory::Security);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(!err.is_recoverable());
        assert!(!err.is_retryable());
        assert!(err.is_critical());
    }

    #[test]
    fn error_propagates_with_question_mark() {
        fn inner() -> Result<()> {
            Err(ExtendedAppError::new(definitions::DISK_FULL, "no space"))
        }

        fn outer() -> Result<u8> {
            inner()?;
            Ok(1)
        }

        let err = outer().unwrap_err();
        assert_eq!(err.to_string(), "FilesystemError [4009]: no space");
    }

    #[test]
    fn result_alias_accepts_custom_error() {
        let r: Result<u8, &str> = Err("plain");
        assert_eq!(r, Err("plain"));
    }

    #[test]
    fn errors_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AppError>();
        assert_send_sync::<ExtendedAppError>();
        assert_send_sync::<ErrorLogRecord>();
        assert_send_sync::<ErrorCode>();
    }
}
