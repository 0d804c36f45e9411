//! Non-panicking assertions.
//!
//! Each check returns `Err(ExtendedAppError)` with `ASSERTION_FAILED` (or a
//! caller-chosen code) instead of unwinding, so it composes with `?`.
//!
//! ```rust
//! use keystone_errors::{assert_defined, assert_non_empty, Result};
//!
//! fn head(items: &[u8], label: Option<&str>) -> Result<(u8, String)> {
//!     let label = assert_defined(label, "label is required")?;
//!     let items = assert_non_empty(items, "at least one item")?;
//!     Ok((*items.first(), label.to_owned()))
//! }
//!
//! assert_eq!(head(&[7, 8], Some("a")).unwrap(), (7, "a".to_owned()));
//! assert!(head(&[], Some("a")).is_err());
//! ```

use crate::{create_error, definitions, ErrorCode, ErrorOptions, ExtendedAppError};
use std::ops::Deref;

fn assertion_failed(code: ErrorCode, message: impl Into<String>) -> ExtendedAppError {
    create_error(code, message, ErrorOptions::default())
}

/// `Ok(())` when `condition` holds, otherwise `Err` with `code` or
/// `ASSERTION_FAILED`.
pub fn assert(condition: bool, message: impl Into<String>, code: Option<ErrorCode>) -> Result<(), ExtendedAppError> {
    if condition {
        Ok(())
    } else {
        Err(assertion_failed(code.unwrap_or(definitions::ASSERTION_FAILED), message))
    }
}

/// The contained value, or `Err` when it is `None`.
pub fn assert_defined<T>(value: Option<T>, message: impl Into<String>) -> Result<T, ExtendedAppError> {
    value.ok_or_else(|| assertion_failed(definitions::ASSERTION_FAILED, message))
}

/// A slice proven to hold at least one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonEmpty<'a, T> {
    head: &'a T,
    items: &'a [T],
}

impl<'a, T> NonEmpty<'a, T> {
    /// Wrap a slice, or `None` when it is empty.
    pub fn new(items: &'a [T]) -> Option<Self> {
        items.first().map(|head| Self { head, items })
    }

    /// First element. Never fails.
    #[inline]
    pub const fn first(&self) -> &'a T {
        self.head
    }

    /// Everything after the first element.
    #[inline]
    pub fn rest(&self) -> &'a [T] {
        &self.items[1..]
    }

    /// The whole slice.
    #[inline]
    pub const fn as_slice(&self) -> &'a [T] {
        self.items
    }
}

impl<T> Deref for NonEmpty<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.items
    }
}

/// The slice as a [`NonEmpty`], or `Err` when it is empty.
pub fn assert_non_empty<'a, T>(items: &'a [T], message: impl Into<String>) -> Result<NonEmpty<'a, T>, ExtendedAppError> {
    NonEmpty::new(items).ok_or_else(|| assertion_failed(definitions::ASSERTION_FAILED, message))
}

/// `value` unchanged when `predicate` holds, otherwise `Err`.
pub fn assert_matches<T>(
    value: T,
    predicate: impl FnOnce(&T) -> bool,
    message: impl Into<String>,
) -> Result<T, ExtendedAppError> {
    if predicate(&value) {
        Ok(value)
    } else {
        Err(assertion_failed(definitions::ASSERTION_FAILED, message))
    }
}
