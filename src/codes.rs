//! Error code type and category classifier.
//!
//! # Code Space
//!
//! Codes are integers in `[1000, 9999]`, split into nine 1000-wide ranges,
//! one per [`ErrorCategory`]:
//!
//! - **1xxx** VALIDATION
//! - **2xxx** RUNTIME
//! - **3xxx** NETWORK
//! - **4xxx** FILESYSTEM
//! - **5xxx** CONFIGURATION
//! - **6xxx** SECURITY
//! - **7xxx** TIMEOUT
//! - **8xxx** RESOURCE
//! - **9xxx** AUTH
//!
//! # Governance
//!
//! [`ErrorCode`] values exist only for registered codes: the constants in
//! [`crate::definitions`], or a successful lookup through `TryFrom<i64>` /
//! [`ErrorCode::from_name`]. `ErrorCode::const_new` rejects, at compile time,
//! any code outside `[1000, 9999]` or outside its declared category's range.
//! The table is append-only; existing codes are never renumbered.
//!
//! # Classifier
//!
//! The free functions here accept *any* integer, registered or not, and are
//! total: codes outside every range classify as `RUNTIME`.
//!
//! ```rust
//! use keystone_errors::{categorize_error, definitions, ErrorCategory};
//!
//! assert_eq!(categorize_error(definitions::CONNECTION_TIMEOUT), ErrorCategory::Network);
//! assert_eq!(categorize_error(-1), ErrorCategory::Runtime);
//! assert_eq!(categorize_error(12_000), ErrorCategory::Runtime);
//! ```

use crate::{ErrorCategory, ErrorSeverity};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;
use thiserror::Error;

/// Lowest code any category may own.
pub const MIN_ERROR_CODE: u16 = 1000;

/// Highest code any category may own.
pub const MAX_ERROR_CODE: u16 = 9999;

// ============================================================================
// Lookup Errors
// ============================================================================

/// Failure to resolve a raw value to a registered [`ErrorCode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    /// No registered code has this numeric value.
    #[error("error code {value} is not registered")]
    Unregistered {
        /// The rejected value
        value: i64,
    },
    /// No registered code has this symbolic name.
    #[error("no error code is named '{name}'")]
    UnknownName {
        /// The rejected name
        name: String,
    },
}

// ============================================================================
// Error Code
// ============================================================================

/// A registered error code: numeric value plus symbolic name.
///
/// `Copy` and cheap to pass by value. Equality and hashing use both fields;
/// since the registry maps each value to exactly one name, that is the same as
/// comparing values.
///
/// Serializes as its bare integer. Deserialization accepts registered values
/// only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode {
    code: u16,
    name: &'static str,
}

impl ErrorCode {
    /// Declare a code in a const context.
    ///
    /// # Panics
    ///
    /// Panics (a compile error in const contexts) if `code` is outside
    /// `[1000, 9999]` or outside `category`'s range.
    #[inline]
    pub const fn const_new(name: &'static str, code: u16, category: ErrorCategory) -> Self {
        assert!(
            code >= MIN_ERROR_CODE && code <= MAX_ERROR_CODE,
            "Error code must be 1000-9999"
        );
        assert!(
            (code / 1000) * 1000 == category.base_code(),
            "Error code is outside its category's range"
        );
        Self { code, name }
    }

    /// Look up a registered code by symbolic name (`"CONNECTION_TIMEOUT"`).
    ///
    /// # Errors
    ///
    /// [`CodeError::UnknownName`] when no code has that name.
    pub fn from_name(name: &str) -> Result<Self, CodeError> {
        crate::definitions::all()
            .find(|code| code.name == name)
            .ok_or_else(|| CodeError::UnknownName {
                name: name.to_owned(),
            })
    }

    /// Numeric value.
    #[inline]
    pub const fn value(self) -> u16 {
        self.code
    }

    /// Symbolic name.
    #[inline]
    pub const fn name(self) -> &'static str {
        self.name
    }

    /// Category owning this code's range.
    #[inline]
    pub const fn category(self) -> ErrorCategory {
        ErrorCategory::from_code(self.code as i64)
    }

    /// Default severity of this code's category.
    #[inline]
    pub const fn severity(self) -> ErrorSeverity {
        self.category().severity()
    }
}

impl fmt::Display for ErrorCode {
    /// Writes the numeric value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

impl From<ErrorCode> for i64 {
    fn from(code: ErrorCode) -> Self {
        i64::from(code.code)
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code
    }
}

impl TryFrom<i64> for ErrorCode {
    type Error = CodeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        crate::definitions::lookup(value).ok_or(CodeError::Unregistered { value })
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.code)
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        ErrorCode::try_from(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Classifier
// ============================================================================

/// Map any integer to its category. Total and pure; unmapped values
/// (negative, below 1000, 10000 and above) classify as `RUNTIME`.
#[inline]
pub fn categorize_error(code: impl Into<i64>) -> ErrorCategory {
    ErrorCategory::from_code(code.into())
}

/// Default severity of a category.
#[inline]
pub const fn get_severity(category: ErrorCategory) -> ErrorSeverity {
    category.severity()
}

/// Default severity of the category `code` belongs to.
#[inline]
pub fn get_severity_for_code(code: impl Into<i64>) -> ErrorSeverity {
    categorize_error(code).severity()
}

/// Whether `floor(code / 1000) * 1000 == base`.
///
/// `base` may be a raw integer or an [`ErrorCategory`] (its range base).
#[inline]
pub fn is_in_category(code: impl Into<i64>, base: impl Into<i64>) -> bool {
    code.into().div_euclid(1000).checked_mul(1000) == Some(base.into())
}

/// Whether a category's severity is `CRITICAL`.
#[inline]
pub const fn is_critical_category(category: ErrorCategory) -> bool {
    matches!(category.severity(), ErrorSeverity::Critical)
}

/// Categories whose default severity is `severity`, in range order.
///
/// Over all four severities the results partition [`ErrorCategory::ALL`].
pub fn get_categories_by_severity(severity: ErrorSeverity) -> SmallVec<[ErrorCategory; 9]> {
    ErrorCategory::ALL
        .into_iter()
        .filter(|category| category.severity() == severity)
        .collect()
}

/// Whether `code` is a registered error code.
#[inline]
pub fn is_valid_error_code(code: impl Into<i64>) -> bool {
    crate::definitions::lookup(code.into()).is_some()
}

// ============================================================================
// Tests
// ============================================================================
