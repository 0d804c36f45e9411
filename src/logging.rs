//! Flat log record for persisting or transmitting errors.
//!
//! [`ErrorLogRecord`] is the wire contract for anything that stores or ships
//! errors: every field is a JSON primitive and there are no nested error
//! objects. The cause, if any, is reduced to its display message; it never
//! carries a backtrace or a source chain.
//!
//! ```json
//! {"message":"t/o","code":3002,"category":"NETWORK","severity":"ERROR",
//!  "correlationId":"err-m2f3k1-a8x0q2z","timestamp":1730000000000,
//!  "isRecoverable":true,"isRetryable":true}
//! ```
//!
//! The crate never logs on its own. Callers pick a sink: [`ErrorLogRecord::write_to`]
//! for line-oriented text, [`ErrorLogRecord::to_json`] for JSON, or
//! `ErrorLogRecord::emit` (feature `tracing`) for a structured `tracing` event.

use crate::{ErrorCategory, ErrorCode, ErrorSeverity, ExtendedAppError};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Maximum length for any individual field in text output
const MAX_FIELD_OUTPUT_LEN: usize = 1024;

/// Truncation indicator appended to truncated strings
const TRUNCATION_INDICATOR: &str = "...[TRUNCATED]";

/// Flat, JSON-serializable projection of an [`ExtendedAppError`].
///
/// `cause` is omitted from the JSON entirely when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorLogRecord {
    /// Human-readable message
    pub message: String,
    /// Numeric error code
    pub code: ErrorCode,
    /// Category of `code`
    pub category: ErrorCategory,
    /// Severity at construction
    pub severity: ErrorSeverity,
    /// Correlation id at construction
    pub correlation_id: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Whether the category is recoverable
    pub is_recoverable: bool,
    /// Whether the category is auto-retryable
    pub is_retryable: bool,
    /// Display message of the cause
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

/// Project an error to its log record.
pub fn format_error_for_log(error: &ExtendedAppError) -> ErrorLogRecord {
    ErrorLogRecord {
        message: error.message().to_owned(),
        code: error.code(),
        category: error.category(),
        severity: error.severity(),
        correlation_id: error.correlation_id().to_owned(),
        timestamp: error.timestamp(),
        is_recoverable: error.is_recoverable(),
        is_retryable: error.is_retryable(),
        cause: error.cause().map(|cause| cause.to_string()),
    }
}

impl From<&ExtendedAppError> for ErrorLogRecord {
    fn from(error: &ExtendedAppError) -> Self {
        format_error_for_log(error)
    }
}

impl ErrorLogRecord {
    /// Write a single `key='value'` line to a formatter.
    ///
    /// Free-text fields (`message`, `cause`) are truncated to 1024 bytes on
    /// a character boundary, with a visible `...[TRUNCATED]` marker.
    ///
    /// ```rust
    /// # use keystone_errors::{create_error, definitions, ErrorOptions};
    /// let err = create_error(
    ///     definitions::DISK_FULL,
    ///     "no space",
    ///     ErrorOptions::default().with_correlation_id("err-1-abc"),
    /// );
    /// let mut line = String::new();
    /// err.to_log_record().write_to(&mut line).unwrap();
    /// assert!(line.starts_with("[4009] ERROR FILESYSTEM correlation_id='err-1-abc'"));
    /// ```
    pub fn write_to(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} correlation_id='{}' timestamp={}{}{} message='{}'",
            self.code,
            self.severity,
            self.category,
            self.correlation_id,
            self.timestamp,
            if self.is_recoverable { " [RECOVERABLE]" } else { "" },
            if self.is_retryable { " [RETRYABLE]" } else { "" },
            truncate_with_indicator(&self.message)
        )?;

        if let Some(cause) = &self.cause {
            write!(f, " cause='{}'", truncate_with_indicator(cause))?;
        }

        Ok(())
    }

    /// Render the wire contract as compact JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Emit one `tracing` event carrying every field.
    ///
    /// `CRITICAL` and `ERROR` log at `ERROR`, `WARNING` at `WARN`, `INFO` at
    /// `INFO`.
    #[cfg(feature = "tracing")]
    pub fn emit(&self) {
        macro_rules! event_at {
            ($level:expr) => {
                tracing::event!(
                    target: "keystone_errors",
                    $level,
                    code = u16::from(self.code),
                    category = self.category.display_name(),
                    severity = self.severity.display_name(),
                    correlation_id = %self.correlation_id,
                    timestamp = self.timestamp,
                    is_recoverable = self.is_recoverable,
                    is_retryable = self.is_retryable,
                    cause = self.cause.as_deref(),
                    "{}",
                    truncate_with_indicator(&self.message)
                )
            };
        }

        match self.severity {
            ErrorSeverity::Critical | ErrorSeverity::Error => event_at!(tracing::Level::ERROR),
            ErrorSeverity::Warning => event_at!(tracing::Level::WARN),
            ErrorSeverity::Info => event_at!(tracing::Level::INFO),
        }
    }
}

impl fmt::Display for ErrorLogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

/// Truncate a field for text output.
///
/// Returns the input unchanged (borrowed) when it fits.
fn truncate_with_indicator(s: &str) -> Cow<'_, str> {
    if s.len() <= MAX_FIELD_OUTPUT_LEN {
        return Cow::Borrowed(s);
    }

    let max_content_len = MAX_FIELD_OUTPUT_LEN.saturating_sub(TRUNCATION_INDICATOR.len());

    // Back off to the last char boundary at or before the limit
    let mut idx = max_content_len;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }

    if idx == 0 {
        return Cow::Borrowed(TRUNCATION_INDICATOR);
    }

    let mut result = String::with_capacity(idx + TRUNCATION_INDICATOR.len());
    result.push_str(&s[..idx]);
    result.push_str(TRUNCATION_INDICATOR);
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_error, definitions, ErrorOptions};
    use std::io;

    fn fixed(code: ErrorCode, message: &str) -> ExtendedAppError {
        create_error(code, message, ErrorOptions::default().with_correlation_id("err-0-0000000"))
    }

    #[test]
    fn record_mirrors_error() {
        let err = fixed(definitions::CONNECTION_TIMEOUT, "t/o");
        let record = format_error_for_log(&err);
        assert_eq!(record.code, definitions::CONNECTION_TIMEOUT);
        assert_eq!(record.category, ErrorCategory::Network);
        assert_eq!(record.severity, ErrorSeverity::Error);
        assert_eq!(record.timestamp, err.timestamp());
        assert!(record.is_recoverable && record.is_retryable);
        assert_eq!(record.cause, None);
        assert_eq!(ErrorLogRecord::from(&err), record);
    }

    #[test]
    fn json_omits_absent_cause() {
        let record = fixed(definitions::INVALID_INPUT, "bad").to_log_record();
        let value: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("cause"));
        assert!(!object.contains_key("name"));
        assert_eq!(object["code"], 1001);
        assert_eq!(object["severity"], "WARNING");
        assert_eq!(object["correlationId"], "err-0-0000000");
        assert_eq!(object["isRetryable"], false);
        assert_eq!(object.len(), 8);
    }

    #[test]
    fn cause_is_reduced_to_message() {
        let err = create_error(
            definitions::WRITE_ERROR,
            "write failed",
            ErrorOptions::default().with_cause(io::Error::other("EBADF")),
        );
        let record = err.to_log_record();
        assert_eq!(record.cause.as_deref(), Some("EBADF"));
        let json = record.to_json().unwrap();
        assert!(json.contains(r#""cause":"EBADF""#));
    }

    #[test]
    fn record_round_trips_through_json() {
        let record = fixed(definitions::TOKEN_EXPIRED, "expired").to_log_record();
        let back: ErrorLogRecord = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn text_line_flags() {
        let line = fixed(definitions::RATE_LIMITED, "slow").to_log_record().to_string();
        assert!(line.contains("[RECOVERABLE]"));
        assert!(!line.contains("[RETRYABLE]"));
        assert!(line.ends_with("message='slow'"));
    }

    #[test]
    fn truncate_ascii() {
        let s = "a".repeat(MAX_FIELD_OUTPUT_LEN + 10);
        let truncated = truncate_with_indicator(&s);
        assert!(truncated.len() <= MAX_FIELD_OUTPUT_LEN);
        assert!(truncated.ends_with(TRUNCATION_INDICATOR));
    }

    #[test]
    fn no_truncate_at_limit() {
        let s = "a".repeat(MAX_FIELD_OUTPUT_LEN);
        let truncated = truncate_with_indicator(&s);
        assert!(matches!(truncated, Cow::Borrowed(_)));
        assert_eq!(truncated.len(), MAX_FIELD_OUTPUT_LEN);
    }

    #[test]
    fn truncate_multibyte_boundary() {
        // 2-byte and 4-byte characters
        for unit in ["й", "🔥"] {
            let s = unit.repeat(MAX_FIELD_OUTPUT_LEN);
            let truncated = truncate_with_indicator(&s);
            assert!(truncated.len() <= MAX_FIELD_OUTPUT_LEN);
            assert!(truncated.ends_with(TRUNCATION_INDICATOR));
        }
    }

    #[test]
    fn long_message_truncated_in_text_only() {
        let long = "x".repeat(4096);
        let record = fixed(definitions::INTERNAL_ERROR, &long).to_log_record();
        assert!(record.to_string().contains(TRUNCATION_INDICATOR));
        assert_eq!(record.message.len(), 4096);
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn emit_without_subscriber_is_silent() {
        fixed(definitions::UNAUTHORIZED_ACCESS, "nope").to_log_record().emit();
        fixed(definitions::READ_TIMEOUT, "slow").to_log_record().emit();
    }
}
