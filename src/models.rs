//! Error categories, severities and the error value shapes.
//!
//! # Single Source of Truth
//!
//! The tables on [`ErrorCategory`] below decide, for every category:
//! - which 1000-wide code range it owns
//! - its default [`ErrorSeverity`]
//! - whether its failures are recoverable and/or retryable
//! - how many retries callers are advised to attempt
//!
//! The code-level functions in [`crate::codes`] and [`crate::recovery`] only
//! route a numeric code to its category and read these tables. No other part
//! of the crate redefines a category-to-severity or category-to-policy mapping.
//!
//! # Error Shapes
//!
//! - [`AppError`]: the minimal contract (`code`, `message`, `name`, `cause?`)
//! - [`ExtendedAppError`]: adds classification, correlation id and timestamp
//! - [`AppErrorKind`]: which of the two a value is, decided at construction
//!
//! Both shapes are immutable once built: fields are private and only readable
//! through accessors.

use crate::ErrorCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Shared, type-erased cause attached to an error.
///
/// `Arc` keeps error values `Clone` without requiring the cause to be.
pub type ErrorCause = Arc<dyn Error + Send + Sync + 'static>;

// ============================================================================
// Error Category
// ============================================================================

/// Error domain derived from an error code's thousands digit.
///
/// | Category        | Range     | Severity | Recoverable | Retryable | Advised retries |
/// |-----------------|-----------|----------|-------------|-----------|-----------------|
/// | `VALIDATION`    | 1000-1999 | WARNING  | no          | no        | 0               |
/// | `RUNTIME`       | 2000-2999 | ERROR    | no          | no        | 0               |
/// | `NETWORK`       | 3000-3999 | ERROR    | yes         | yes       | 3               |
/// | `FILESYSTEM`    | 4000-4999 | ERROR    | no          | no        | 0               |
/// | `CONFIGURATION` | 5000-5999 | ERROR    | no          | no        | 0               |
/// | `SECURITY`      | 6000-6999 | CRITICAL | no          | no        | 0               |
/// | `TIMEOUT`       | 7000-7999 | WARNING  | yes         | yes       | 2               |
/// | `RESOURCE`      | 8000-8999 | ERROR    | yes         | no        | 5               |
/// | `AUTH`          | 9000-9999 | ERROR    | no          | no        | 0               |
///
/// `RUNTIME`, `FILESYSTEM` and `CONFIGURATION` are treated as non-recoverable
/// even though some of their failures can clear on their own. Keep it that way:
/// callers rely on a conservative answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// Input or schema validation failures (1000-1999)
    Validation,
    /// Internal runtime failures; also the fallback for unmapped codes (2000-2999)
    Runtime,
    /// Connectivity and remote-call failures (3000-3999)
    Network,
    /// File and directory failures (4000-4999)
    Filesystem,
    /// Configuration loading and validation failures (5000-5999)
    Configuration,
    /// Security policy violations (6000-6999)
    Security,
    /// Deadline and timeout failures (7000-7999)
    Timeout,
    /// Resource exhaustion and contention (8000-8999)
    Resource,
    /// Authentication and session failures (9000-9999)
    Auth,
}

impl ErrorCategory {
    /// Every category, in ascending range order.
    pub const ALL: [ErrorCategory; 9] = [
        Self::Validation,
        Self::Runtime,
        Self::Network,
        Self::Filesystem,
        Self::Configuration,
        Self::Security,
        Self::Timeout,
        Self::Resource,
        Self::Auth,
    ];

    /// First code of the range this category owns.
    #[inline]
    pub const fn base_code(self) -> u16 {
        match self {
            Self::Validation => 1000,
            Self::Runtime => 2000,
            Self::Network => 3000,
            Self::Filesystem => 4000,
            Self::Configuration => 5000,
            Self::Security => 6000,
            Self::Timeout => 7000,
            Self::Resource => 8000,
            Self::Auth => 9000,
        }
    }

    /// Category owning `code`'s range, or `None` when no category claims it.
    ///
    /// Equivalent to reverse-mapping `floor(code / 1000) * 1000` (floor toward
    /// negative infinity), expressed as range matches so extreme inputs cannot
    /// overflow.
    #[inline]
    pub const fn for_code(code: i64) -> Option<Self> {
        match code {
            1000..=1999 => Some(Self::Validation),
            2000..=2999 => Some(Self::Runtime),
            3000..=3999 => Some(Self::Network),
            4000..=4999 => Some(Self::Filesystem),
            5000..=5999 => Some(Self::Configuration),
            6000..=6999 => Some(Self::Security),
            7000..=7999 => Some(Self::Timeout),
            8000..=8999 => Some(Self::Resource),
            9000..=9999 => Some(Self::Auth),
            _ => None,
        }
    }

    /// Category owning `code`'s range, defaulting to `RUNTIME`.
    #[inline]
    pub const fn from_code(code: i64) -> Self {
        match Self::for_code(code) {
            Some(category) => category,
            None => Self::Runtime,
        }
    }

    /// Upper-case name used in messages and on the wire (`"NETWORK"`).
    #[inline]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION",
            Self::Runtime => "RUNTIME",
            Self::Network => "NETWORK",
            Self::Filesystem => "FILESYSTEM",
            Self::Configuration => "CONFIGURATION",
            Self::Security => "SECURITY",
            Self::Timeout => "TIMEOUT",
            Self::Resource => "RESOURCE",
            Self::Auth => "AUTH",
        }
    }

    /// Default error `name` for errors of this category (`"NetworkError"`).
    #[inline]
    pub const fn error_name(self) -> &'static str {
        match self {
            Self::Validation => "ValidationError",
            Self::Runtime => "RuntimeError",
            Self::Network => "NetworkError",
            Self::Filesystem => "FilesystemError",
            Self::Configuration => "ConfigurationError",
            Self::Security => "SecurityError",
            Self::Timeout => "TimeoutError",
            Self::Resource => "ResourceError",
            Self::Auth => "AuthError",
        }
    }

    /// Default severity. No category maps to `INFO`.
    #[inline]
    pub const fn severity(self) -> ErrorSeverity {
        match self {
            Self::Security => ErrorSeverity::Critical,
            Self::Validation | Self::Timeout => ErrorSeverity::Warning,
            Self::Runtime
            | Self::Network
            | Self::Filesystem
            | Self::Configuration
            | Self::Resource
            | Self::Auth => ErrorSeverity::Error,
        }
    }

    /// Whether the failure might resolve without intervention.
    #[inline]
    pub const fn is_recoverable(self) -> bool {
        match self {
            Self::Network | Self::Timeout | Self::Resource => true,
            Self::Security | Self::Auth | Self::Validation => false,
            Self::Runtime | Self::Filesystem | Self::Configuration => false,
        }
    }

    /// Whether the failure is a candidate for automatic re-execution.
    ///
    /// Strictly narrower than [`is_recoverable`](Self::is_recoverable):
    /// `RESOURCE` exhaustion may need external intervention, not a blind retry.
    #[inline]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Network | Self::Timeout)
    }

    /// Advised retry ceiling for this category.
    #[inline]
    pub const fn max_retry_attempts(self) -> u32 {
        match self {
            Self::Network => 3,
            Self::Timeout => 2,
            Self::Resource => 5,
            _ => 0,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl From<ErrorCategory> for i64 {
    /// A category converts to the base of its range.
    fn from(category: ErrorCategory) -> Self {
        i64::from(category.base_code())
    }
}

// ============================================================================
// Error Severity
// ============================================================================

/// Impact tier of an error, determined by its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorSeverity {
    /// Requires immediate attention
    Critical,
    /// Operation failed
    Error,
    /// Operation failed in a way the caller is expected to handle
    Warning,
    /// Informational; no category defaults to this tier
    Info,
}

impl ErrorSeverity {
    /// Every severity, most severe first.
    pub const ALL: [ErrorSeverity; 4] = [Self::Critical, Self::Error, Self::Warning, Self::Info];

    /// Upper-case name used on the wire (`"CRITICAL"`).
    #[inline]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// AppError (minimal contract)
// ============================================================================

/// Minimal error contract: `{ code, message, name, cause? }`.
///
/// Built once and never mutated. The `with_*` methods consume the value and
/// are meant for construction chains only.
#[derive(Debug, Clone)]
#[must_use = "errors should be handled or logged"]
pub struct AppError {
    code: ErrorCode,
    message: String,
    name: String,
    cause: Option<ErrorCause>,
}

impl AppError {
    /// Create an error whose name defaults to its category's error name.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            name: code.category().error_name().to_owned(),
            cause: None,
        }
    }

    /// Override the error name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Attach the underlying cause.
    pub fn with_cause(mut self, cause: impl Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// Attach an already shared cause.
    pub fn with_shared_cause(mut self, cause: ErrorCause) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Error code.
    #[inline]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Error name (`"RuntimeError"`, or the wrapped error's type name).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Underlying cause, if one was supplied.
    #[inline]
    pub fn cause(&self) -> Option<&ErrorCause> {
        self.cause.as_ref()
    }

    pub(crate) fn into_parts(self) -> (ErrorCode, String, String, Option<ErrorCause>) {
        (self.code, self.message, self.name, self.cause)
    }
}

impl fmt::Display for AppError {
    /// Format: `"{name} [{code}]: {message}"`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.name, self.code, self.message)
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|c| c as &(dyn Error + 'static))
    }
}

// ============================================================================
// ExtendedAppError (classified contract)
// ============================================================================

/// Fully classified error: code, category, severity, recovery flags,
/// correlation id and creation timestamp.
///
/// Construct through [`crate::create_error`] and friends. Every field is
/// computed at construction and never changes afterwards.
///
/// # Example
///
/// ```rust
/// use keystone_errors::{create_error, definitions, ErrorCategory, ErrorOptions, ErrorSeverity};
///
/// let err = create_error(definitions::CONNECTION_TIMEOUT, "t/o", ErrorOptions::default());
/// assert_eq!(err.category(), ErrorCategory::Network);
/// assert_eq!(err.severity(), ErrorSeverity::Error);
/// assert!(err.is_recoverable() && err.is_retryable());
/// ```
#[derive(Debug, Clone)]
#[must_use = "errors should be handled or logged"]
pub struct ExtendedAppError {
    code: ErrorCode,
    message: String,
    name: String,
    cause: Option<ErrorCause>,
    severity: ErrorSeverity,
    category: ErrorCategory,
    correlation_id: String,
    timestamp: i64,
    recoverable: bool,
    retryable: bool,
}

/// Field set handed from the factory to [`ExtendedAppError::assemble`].
pub(crate) struct ExtendedParts {
    pub(crate) code: ErrorCode,
    pub(crate) message: String,
    pub(crate) name: String,
    pub(crate) cause: Option<ErrorCause>,
    pub(crate) severity: ErrorSeverity,
    pub(crate) correlation_id: String,
    pub(crate) timestamp: i64,
}

impl ExtendedAppError {
    /// Create with default options. Shorthand for
    /// `create_error(code, message, ErrorOptions::default())`.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        crate::factory::create_error(code, message, crate::factory::ErrorOptions::default())
    }

    /// Category and recovery flags always follow the code; only severity,
    /// name, cause and correlation id are caller-controlled.
    pub(crate) fn assemble(parts: ExtendedParts) -> Self {
        let category = parts.code.category();
        Self {
            code: parts.code,
            message: parts.message,
            name: parts.name,
            cause: parts.cause,
            severity: parts.severity,
            category,
            correlation_id: parts.correlation_id,
            timestamp: parts.timestamp,
            recoverable: category.is_recoverable(),
            retryable: category.is_retryable(),
        }
    }

    /// Error code.
    #[inline]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Error name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Underlying cause, if one was supplied.
    #[inline]
    pub fn cause(&self) -> Option<&ErrorCause> {
        self.cause.as_ref()
    }

    /// Severity (category default unless overridden at construction).
    #[inline]
    pub const fn severity(&self) -> ErrorSeverity {
        self.severity
    }

    /// Category derived from the code.
    #[inline]
    pub const fn category(&self) -> ErrorCategory {
        self.category
    }

    /// Correlation id for cross-system tracing.
    #[inline]
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// Creation time in milliseconds since the Unix epoch.
    #[inline]
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Creation time as a UTC datetime.
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Whether the failure might resolve without intervention.
    #[inline]
    pub const fn is_recoverable(&self) -> bool {
        self.recoverable
    }

    /// Whether the failure is a candidate for automatic re-execution.
    #[inline]
    pub const fn is_retryable(&self) -> bool {
        self.retryable
    }

    /// Whether this error carries `CRITICAL` severity.
    #[inline]
    pub fn is_critical(&self) -> bool {
        self.severity == ErrorSeverity::Critical
    }

    /// Project to the flat wire record. See [`crate::format_error_for_log`].
    #[inline]
    pub fn to_log_record(&self) -> crate::ErrorLogRecord {
        crate::logging::format_error_for_log(self)
    }
}

impl fmt::Display for ExtendedAppError {
    /// Format: `"{name} [{code}]: {message}"`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.name, self.code, self.message)
    }
}

impl Error for ExtendedAppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|c| c as &(dyn Error + 'static))
    }
}

/// Serializes every field under its camelCase wire name, including `name`,
/// so the output satisfies [`crate::is_extended_app_error`]. `cause` is
/// reduced to its message and omitted when absent.
impl Serialize for ExtendedAppError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("ExtendedAppError", 10)?;
        state.serialize_field("code", &self.code)?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("severity", &self.severity)?;
        state.serialize_field("category", &self.category)?;
        state.serialize_field("correlationId", &self.correlation_id)?;
        state.serialize_field("timestamp", &self.timestamp)?;
        state.serialize_field("isRecoverable", &self.recoverable)?;
        state.serialize_field("isRetryable", &self.retryable)?;
        match &self.cause {
            Some(cause) => state.serialize_field("cause", &cause.to_string())?,
            None => state.skip_field("cause")?,
        }
        state.end()
    }
}

// ============================================================================
// AppErrorKind
// ============================================================================

/// Which error shape a value has, fixed when the value is built.
#[derive(Debug, Clone)]
pub enum AppErrorKind {
    /// Minimal `{code, message, name, cause?}` error
    Basic(AppError),
    /// Fully classified error
    Extended(ExtendedAppError),
}

impl AppErrorKind {
    /// Error code of either shape.
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Basic(e) => e.code(),
            Self::Extended(e) => e.code(),
        }
    }

    /// Message of either shape.
    pub fn message(&self) -> &str {
        match self {
            Self::Basic(e) => e.message(),
            Self::Extended(e) => e.message(),
        }
    }

    /// Name of either shape.
    pub fn name(&self) -> &str {
        match self {
            Self::Basic(e) => e.name(),
            Self::Extended(e) => e.name(),
        }
    }

    /// Whether this is the classified shape.
    pub const fn is_extended(&self) -> bool {
        matches!(self, Self::Extended(_))
    }

    /// Upgrade to the classified shape; extended values pass through unchanged.
    pub fn into_extended(self) -> ExtendedAppError {
        crate::factory::to_app_error(crate::factory::Thrown::App(self))
    }
}

impl From<AppError> for AppErrorKind {
    fn from(error: AppError) -> Self {
        Self::Basic(error)
    }
}

impl From<ExtendedAppError> for AppErrorKind {
    fn from(error: ExtendedAppError) -> Self {
        Self::Extended(error)
    }
}

impl fmt::Display for AppErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic(e) => fmt::Display::fmt(e, f),
            Self::Extended(e) => fmt::Display::fmt(e, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions;
    use std::io;

    #[test]
    fn every_category_owns_its_range() {
        for category in ErrorCategory::ALL {
            let base = i64::from(category.base_code());
            assert_eq!(ErrorCategory::for_code(base), Some(category));
            assert_eq!(ErrorCategory::for_code(base + 999), Some(category));
        }
    }

    #[test]
    fn unmapped_codes_fall_back_to_runtime() {
        assert_eq!(ErrorCategory::for_code(999), None);
        assert_eq!(ErrorCategory::from_code(-1), ErrorCategory::Runtime);
        assert_eq!(ErrorCategory::from_code(10_000), ErrorCategory::Runtime);
        assert_eq!(ErrorCategory::from_code(i64::MIN), ErrorCategory::Runtime);
        assert_eq!(ErrorCategory::from_code(i64::MAX), ErrorCategory::Runtime);
    }

    #[test]
    fn no_category_defaults_to_info() {
        assert!(
            ErrorCategory::ALL
                .iter()
                .all(|c| c.severity() != ErrorSeverity::Info)
        );
    }

    #[test]
    fn retryable_categories_are_recoverable() {
        for category in ErrorCategory::ALL {
            if category.is_retryable() {
                assert!(category.is_recoverable(), "{category} retryable but not recoverable");
            }
        }
        assert!(ErrorCategory::Resource.is_recoverable());
        assert!(!ErrorCategory::Resource.is_retryable());
    }

    #[test]
    fn category_serializes_upper_case() {
        let json = serde_json::to_string(&ErrorCategory::Configuration).unwrap();
        assert_eq!(json, "\"CONFIGURATION\"");
        let back: ErrorSeverity = serde_json::from_str("\"WARNING\"").unwrap();
        assert_eq!(back, ErrorSeverity::Warning);
    }

    #[test]
    fn app_error_defaults_name_from_category() {
        let err = AppError::new(definitions::FILE_NOT_FOUND, "missing");
        assert_eq!(err.name(), "FilesystemError");
        assert!(err.cause().is_none());
        assert_eq!(err.to_string(), "FilesystemError [4001]: missing");
    }

    #[test]
    fn app_error_exposes_cause_as_source() {
        let err = AppError::new(definitions::READ_ERROR, "read failed")
            .with_cause(io::Error::from(io::ErrorKind::UnexpectedEof));
        let source = err.source().expect("source");
        assert!(source.to_string().contains("end of file"));
    }

    #[test]
    fn kind_reports_shape() {
        let basic: AppErrorKind = AppError::new(definitions::INTERNAL_ERROR, "boom").into();
        assert!(!basic.is_extended());
        assert_eq!(basic.name(), "RuntimeError");

        let extended = basic.into_extended();
        assert_eq!(extended.code(), definitions::INTERNAL_ERROR);
        assert_eq!(extended.message(), "boom");
        assert!(AppErrorKind::from(extended).is_extended());
    }

    #[test]
    fn extended_error_serializes_full_shape() {
        let err = ExtendedAppError::new(definitions::RATE_LIMITED, "slow down");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["code"], 8005);
        assert_eq!(value["category"], "RESOURCE");
        assert_eq!(value["isRecoverable"], true);
        assert_eq!(value["isRetryable"], false);
        assert!(value.get("cause").is_none());
        assert!(crate::is_extended_app_error(&value));
    }
}
