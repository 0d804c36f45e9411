//! Error construction and conversion.
//!
//! # Construction
//!
//! [`create_error`] is the one place an [`ExtendedAppError`] is assembled.
//! It derives category, default severity and recovery flags from the code,
//! stamps the current time and generates a correlation id unless the caller
//! supplied one through [`ErrorOptions`].
//!
//! # Conversion
//!
//! [`to_app_error`] is total over [`Thrown`], the closed set of things a
//! failing operation can hand back: an error value of either shape, a native
//! `std::error::Error`, a bare message, an untyped JSON value, or a caught
//! panic payload. Every variant maps to exactly one `ExtendedAppError`.
//!
//! ```rust
//! use keystone_errors::{to_app_error, definitions, Thrown};
//! use serde::Deserialize;
//! use serde_json::Value;
//!
//! assert_eq!(to_app_error("x").message(), "x");
//! assert_eq!(to_app_error(Value::Null).message(), "null");
//! assert_eq!(to_app_error("x").code(), definitions::UNKNOWN_ERROR);
//! ```

use crate::models::ExtendedParts;
use crate::{
    definitions, AppError, AppErrorKind, CodeError, ErrorCause, ErrorCode, ErrorSeverity,
    ExtendedAppError,
};
use serde::Deserialize;
use serde_json::Value;
use smallvec::SmallVec;
use std::any::Any;
use std::borrow::Cow;
use std::convert::Infallible;
use std::error::Error;
use std::io;
use std::sync::Arc;

/// Length of the random tail of a correlation id.
const CORRELATION_SUFFIX_LEN: usize = 7;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

// ============================================================================
// Options
// ============================================================================

/// Overrides for [`create_error`]. Everything is optional.
///
/// ```rust
/// use keystone_errors::{create_error, definitions, ErrorOptions, ErrorSeverity};
///
/// let err = create_error(
///     definitions::CONFIG_NOT_FOUND,
///     "no config file",
///     ErrorOptions::default()
///         .with_severity(ErrorSeverity::Warning)
///         .with_correlation_id("req-42"),
/// );
/// assert_eq!(err.severity(), ErrorSeverity::Warning);
/// assert_eq!(err.correlation_id(), "req-42");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ErrorOptions {
    cause: Option<ErrorCause>,
    correlation_id: Option<String>,
    severity: Option<ErrorSeverity>,
    name: Option<String>,
}

impl ErrorOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
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

    /// Use this correlation id instead of generating one.
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Override the category's default severity.
    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Override the category's default error name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

// ============================================================================
// Construction
// ============================================================================

/// Build a fully classified error.
///
/// - category and recovery flags always follow `code`
/// - severity is the category default unless overridden
/// - name is the category's error name (`"NetworkError"`) unless overridden
/// - correlation id is generated unless supplied
/// - `cause` is present only if supplied
pub fn create_error(code: ErrorCode, message: impl Into<String>, options: ErrorOptions) -> ExtendedAppError {
    let timestamp = now_millis();
    let correlation_id = options
        .correlation_id
        .unwrap_or_else(|| generate_correlation_id_at(timestamp, &mut fastrand::Rng::new()));

    ExtendedAppError::assemble(ExtendedParts {
        code,
        message: message.into(),
        name: options
            .name
            .unwrap_or_else(|| code.category().error_name().to_owned()),
        cause: options.cause,
        severity: options.severity.unwrap_or_else(|| code.severity()),
        correlation_id,
        timestamp,
    })
}

/// Build an error whose message is `"<CATEGORY> error occurred"`.
pub fn create_error_from_code(code: ErrorCode, options: ErrorOptions) -> ExtendedAppError {
    create_error(code, format!("{} error occurred", code.category()), options)
}

/// Generate a correlation id: `"err-" + base36(now_ms) + "-" + 7 base36 chars`.
///
/// Uniqueness is probabilistic (36^7 suffixes per millisecond), not guaranteed.
pub fn generate_correlation_id() -> String {
    generate_correlation_id_at(now_millis(), &mut fastrand::Rng::new())
}

/// [`generate_correlation_id`] for a given timestamp and random source.
pub fn generate_correlation_id_at(timestamp_ms: i64, rng: &mut fastrand::Rng) -> String {
    let mut id = String::with_capacity(4 + 13 + 1 + CORRELATION_SUFFIX_LEN);
    id.push_str("err-");
    if timestamp_ms < 0 {
        id.push('-');
    }
    push_base36(&mut id, timestamp_ms.unsigned_abs());
    id.push('-');
    for _ in 0..CORRELATION_SUFFIX_LEN {
        id.push(char::from(BASE36_DIGITS[rng.usize(..BASE36_DIGITS.len())]));
    }
    id
}

fn push_base36(out: &mut String, mut value: u64) {
    if value == 0 {
        out.push('0');
        return;
    }
    let mut digits: SmallVec<[u8; 13]> = SmallVec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.extend(digits.iter().rev().map(|&d| char::from(d)));
}

#[inline]
fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// ============================================================================
// Thrown values
// ============================================================================

/// Everything a failing operation can hand back, as a closed sum.
///
/// Build one with `From`/`Into` (error values, strings, JSON values,
/// `io::Error`, boxed errors), [`Thrown::native`] for any other
/// `std::error::Error`, or [`Thrown::from_panic`] for a caught unwind payload.
#[derive(Debug)]
pub enum Thrown {
    /// An error value of either shape
    App(AppErrorKind),
    /// Any other `std::error::Error`, with its type name
    Native {
        /// Short type name of the error (`"ParseIntError"`)
        name: String,
        /// The error itself
        error: ErrorCause,
    },
    /// A bare message
    Message(String),
    /// An untyped value, typically read back from a log sink or a foreign API
    Structured(Value),
    /// A panic payload caught by `catch_unwind`
    Panic(Box<dyn Any + Send + 'static>),
}

impl Thrown {
    /// Wrap any error type, recording its short type name.
    pub fn native<E: Error + Send + Sync + 'static>(error: E) -> Self {
        Self::Native {
            name: short_type_name::<E>().into_owned(),
            error: Arc::new(error),
        }
    }

    /// Wrap a payload returned by `std::panic::catch_unwind`.
    pub fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        Self::Panic(payload)
    }

    /// The error value, when this is one.
    pub fn as_app_error(&self) -> Option<&AppErrorKind> {
        match self {
            Self::App(kind) => Some(kind),
            _ => None,
        }
    }

    /// Best human-readable message for any variant.
    ///
    /// JSON values use their `message` string when they carry one; other
    /// values render as JSON text, except strings which render bare.
    pub fn message(&self) -> Cow<'_, str> {
        match self {
            Self::App(kind) => Cow::Borrowed(kind.message()),
            Self::Native { error, .. } => Cow::Owned(error.to_string()),
            Self::Message(message) => Cow::Borrowed(message),
            Self::Structured(value) => match value.get("message").and_then(Value::as_str) {
                Some(message) => Cow::Borrowed(message),
                None => render_value(value),
            },
            Self::Panic(payload) => Cow::Borrowed(panic_message(&**payload)),
        }
    }
}

impl From<AppErrorKind> for Thrown {
    fn from(kind: AppErrorKind) -> Self {
        Self::App(kind)
    }
}

impl From<AppError> for Thrown {
    fn from(error: AppError) -> Self {
        Self::App(AppErrorKind::Basic(error))
    }
}

impl From<ExtendedAppError> for Thrown {
    fn from(error: ExtendedAppError) -> Self {
        Self::App(AppErrorKind::Extended(error))
    }
}

impl From<String> for Thrown {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<&str> for Thrown {
    fn from(message: &str) -> Self {
        Self::Message(message.to_owned())
    }
}

impl From<Value> for Thrown {
    fn from(value: Value) -> Self {
        Self::Structured(value)
    }
}

impl From<io::Error> for Thrown {
    fn from(error: io::Error) -> Self {
        Self::native(error)
    }
}

impl From<CodeError> for Thrown {
    fn from(error: CodeError) -> Self {
        Self::native(error)
    }
}

impl From<Box<dyn Error + Send + Sync + 'static>> for Thrown {
    fn from(error: Box<dyn Error + Send + Sync + 'static>) -> Self {
        Self::Native {
            name: "Error".to_owned(),
            error: Arc::from(error),
        }
    }
}

impl From<Infallible> for Thrown {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

// ============================================================================
// Conversion
// ============================================================================

/// Wrap a native error with `INTERNAL_ERROR`.
pub fn from_error<E: Error + Send + Sync + 'static>(error: E) -> ExtendedAppError {
    from_error_with_code(error, definitions::INTERNAL_ERROR)
}

/// Wrap a native error, keeping its type name as `name` and the error itself
/// as `cause`.
pub fn from_error_with_code<E: Error + Send + Sync + 'static>(error: E, code: ErrorCode) -> ExtendedAppError {
    let message = error.to_string();
    create_error(
        code,
        message,
        ErrorOptions::default()
            .with_name(short_type_name::<E>())
            .with_cause(error),
    )
}

/// Convert anything thrown into an `ExtendedAppError`, using `UNKNOWN_ERROR`
/// where no code is carried.
pub fn to_app_error(value: impl Into<Thrown>) -> ExtendedAppError {
    to_app_error_with_code(value, definitions::UNKNOWN_ERROR)
}

/// Convert anything thrown into an `ExtendedAppError`.
///
/// - an `ExtendedAppError` passes through unchanged
/// - an `AppError` keeps its code, message, name and cause
/// - a native error keeps its type name and becomes the cause
/// - an AppError-shaped JSON object keeps its fields; unregistered codes
///   become `UNKNOWN_ERROR`
/// - an extended-shaped JSON object with a registered code is restored with
///   its severity, correlation id and timestamp
/// - everything else uses `code` and [`Thrown::message`]
pub fn to_app_error_with_code(value: impl Into<Thrown>, code: ErrorCode) -> ExtendedAppError {
    match value.into() {
        Thrown::App(AppErrorKind::Extended(error)) => error,
        Thrown::App(AppErrorKind::Basic(error)) => {
            let (code, message, name, cause) = error.into_parts();
            let mut options = ErrorOptions::default().with_name(name);
            if let Some(cause) = cause {
                options = options.with_shared_cause(cause);
            }
            create_error(code, message, options)
        }
        Thrown::Native { name, error } => create_error(
            code,
            error.to_string(),
            ErrorOptions::default().with_name(name).with_shared_cause(error),
        ),
        Thrown::Structured(value) if is_app_error(&value) => upgrade_structured(&value),
        other => create_error(code, other.message(), ErrorOptions::default()),
    }
}

fn upgrade_structured(value: &Value) -> ExtendedAppError {
    let registered = value
        .get("code")
        .and_then(Value::as_i64)
        .and_then(definitions::lookup);
    let message = value.get("message").and_then(Value::as_str).unwrap_or_default();
    let name = value.get("name").and_then(Value::as_str);

    if let Some(code) = registered.filter(|_| is_extended_app_error(value)) {
        if let Some(restored) = restore_extended(code, message, name, value) {
            return restored;
        }
    }

    let mut options = ErrorOptions::default();
    if let Some(name) = name {
        options = options.with_name(name);
    }
    if is_extended_app_error(value) {
        if let Some(id) = value.get("correlationId").and_then(Value::as_str) {
            options = options.with_correlation_id(id);
        }
    }
    create_error(registered.unwrap_or(definitions::UNKNOWN_ERROR), message, options)
}

/// Rebuild a serialized `ExtendedAppError` as it was. Category and recovery
/// flags are derived from `code` again; a severity or timestamp that does not
/// parse yields `None`.
fn restore_extended(code: ErrorCode, message: &str, name: Option<&str>, value: &Value) -> Option<ExtendedAppError> {
    let severity = value
        .get("severity")
        .and_then(|s| ErrorSeverity::deserialize(s).ok())?;
    let timestamp = value.get("timestamp").and_then(Value::as_i64)?;
    let correlation_id = value.get("correlationId").and_then(Value::as_str)?;

    Some(ExtendedAppError::assemble(ExtendedParts {
        code,
        message: message.to_owned(),
        name: name.map_or_else(|| code.category().error_name().to_owned(), str::to_owned),
        cause: None,
        severity,
        correlation_id: correlation_id.to_owned(),
        timestamp,
    }))
}

// ============================================================================
// Structural guards
// ============================================================================

/// Whether a JSON value has the `{code: number, message: string, name: string}`
/// shape.
pub fn is_app_error(value: &Value) -> bool {
    value.get("code").is_some_and(Value::is_number)
        && value.get("message").is_some_and(Value::is_string)
        && value.get("name").is_some_and(Value::is_string)
}

/// Whether a JSON value has the full extended shape: the AppError fields plus
/// `severity`, `category`, `correlationId` (strings), `timestamp` (number),
/// `isRecoverable` and `isRetryable` (booleans).
pub fn is_extended_app_error(value: &Value) -> bool {
    is_app_error(value)
        && value.get("severity").is_some_and(Value::is_string)
        && value.get("category").is_some_and(Value::is_string)
        && value.get("correlationId").is_some_and(Value::is_string)
        && value.get("timestamp").is_some_and(Value::is_number)
        && value.get("isRecoverable").is_some_and(Value::is_boolean)
        && value.get("isRetryable").is_some_and(Value::is_boolean)
}

// ============================================================================
// Helpers
// ============================================================================

/// Last path segment of a type name, without generic arguments.
///
/// A bare `Error` keeps the nearest meaningful module (`io::Error`,
/// `serde_json::Error`); `error` modules are skipped.
fn short_type_name<T: ?Sized>() -> Cow<'static, str> {
    let full = std::any::type_name::<T>();
    let path = full.split('<').next().unwrap_or(full);
    let mut segments = path.rsplit("::");
    let last = segments.next().unwrap_or(path);
    if last != "Error" {
        return Cow::Borrowed(last);
    }
    match segments.find(|segment| *segment != "error") {
        Some(parent) => Cow::Owned(format!("{parent}::{last}")),
        None => Cow::Borrowed(last),
    }
}

fn render_value(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
