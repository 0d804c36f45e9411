//! Free-function Result core.
//!
//! Thin, named wrappers over `std::result::Result` so call sites can read as
//! a pipeline of steps (`result::and_then(r, parse)`) and so every branch
//! guarantee is pinned by a test: a function passed for one side is never
//! invoked on the other side.
//!
//! Method syntax is covered by `std` itself plus [`ResultExt`] for the few
//! operations `std` lacks.
//!
//! ```rust
//! use keystone_errors::result;
//!
//! let r: Result<i32, String> = result::ok(20);
//! let r = result::and_then(r, |v| result::ok(v + 1));
//! assert_eq!(result::map(r, |v| v * 2), Ok(42));
//! ```

use crate::{from_error_with_code, ErrorCode, ErrorOptions, ExtendedAppError};
use std::error::Error;
use std::fmt;

/// Wrap a success value.
#[inline]
pub fn ok<T, E>(value: T) -> Result<T, E> {
    Ok(value)
}

/// Wrap an error value.
#[inline]
pub fn err<T, E>(error: E) -> Result<T, E> {
    Err(error)
}

/// Whether `result` is `Ok`.
#[inline]
pub fn is_ok<T, E>(result: &Result<T, E>) -> bool {
    result.is_ok()
}

/// Whether `result` is `Err`.
#[inline]
pub fn is_err<T, E>(result: &Result<T, E>) -> bool {
    result.is_err()
}

/// Extract the success value.
///
/// # Panics
///
/// Panics on `Err`, with the error's `Debug` rendering in the message. Only
/// for states the caller has already ruled out; everything else should
/// propagate with `?`.
#[inline]
#[track_caller]
pub fn unwrap<T, E: fmt::Debug>(result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(error) => panic!("called `result::unwrap` on an `Err` value: {error:?}"),
    }
}

/// Success value or `default`.
#[inline]
pub fn unwrap_or<T, E>(result: Result<T, E>, default: T) -> T {
    result.unwrap_or(default)
}

/// Success value, or `f(error)`. `f` runs only on `Err`.
#[inline]
pub fn unwrap_or_else<T, E>(result: Result<T, E>, f: impl FnOnce(E) -> T) -> T {
    result.unwrap_or_else(f)
}

/// Transform the success value. `f` runs only on `Ok`.
#[inline]
pub fn map<T, U, E>(result: Result<T, E>, f: impl FnOnce(T) -> U) -> Result<U, E> {
    result.map(f)
}

/// Transform the error value. `f` runs only on `Err`.
#[inline]
pub fn map_err<T, E, F>(result: Result<T, E>, f: impl FnOnce(E) -> F) -> Result<T, F> {
    result.map_err(f)
}

/// Chain a fallible step. Short-circuits on `Err` without calling `f`.
#[inline]
pub fn and_then<T, U, E>(result: Result<T, E>, f: impl FnOnce(T) -> Result<U, E>) -> Result<U, E> {
    result.and_then(f)
}

/// `a` if it is `Ok`, otherwise `b` verbatim.
#[inline]
pub fn or_else<T, E>(a: Result<T, E>, b: Result<T, E>) -> Result<T, E> {
    match a {
        Ok(value) => Ok(value),
        Err(_) => b,
    }
}

/// Dispatch to exactly one of the two handlers.
#[inline]
pub fn match_result<T, E, U>(
    result: Result<T, E>,
    on_ok: impl FnOnce(T) -> U,
    on_err: impl FnOnce(E) -> U,
) -> U {
    match result {
        Ok(value) => on_ok(value),
        Err(error) => on_err(error),
    }
}

/// Extension methods for `Result`.
pub trait ResultExt<T, E>: Sized {
    /// Method form of [`match_result`].
    fn fold<U>(self, on_ok: impl FnOnce(T) -> U, on_err: impl FnOnce(E) -> U) -> U;

    /// Lift a native error into an [`ExtendedAppError`] with `code`, keeping
    /// its message, its type name and the error itself as cause.
    ///
    /// ```rust
    /// use keystone_errors::{definitions, ResultExt};
    ///
    /// let err = "x".parse::<u32>().into_app_error(definitions::PARSE_ERROR).unwrap_err();
    /// assert_eq!(err.code(), definitions::PARSE_ERROR);
    /// assert_eq!(err.name(), "ParseIntError");
    /// ```
    fn into_app_error(self, code: ErrorCode) -> Result<T, ExtendedAppError>
    where
        E: Error + Send + Sync + 'static;

    /// Replace the error with a fresh [`ExtendedAppError`] carrying `message`,
    /// with the original error as cause.
    fn with_message(self, code: ErrorCode, message: impl Into<String>) -> Result<T, ExtendedAppError>
    where
        E: Error + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    #[inline]
    fn fold<U>(self, on_ok: impl FnOnce(T) -> U, on_err: impl FnOnce(E) -> U) -> U {
        match_result(self, on_ok, on_err)
    }

    fn into_app_error(self, code: ErrorCode) -> Result<T, ExtendedAppError>
    where
        E: Error + Send + Sync + 'static,
    {
        self.map_err(|error| from_error_with_code(error, code))
    }

    fn with_message(self, code: ErrorCode, message: impl Into<String>) -> Result<T, ExtendedAppError>
    where
        E: Error + Send + Sync + 'static,
    {
        self.map_err(|error| {
            crate::create_error(code, message, ErrorOptions::default().with_cause(error))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions;
    use std::cell::Cell;
    use std::io;

    #[test]
    fn constructors_and_predicates() {
        let good: Result<u8, &str> = ok(1);
        let bad: Result<u8, &str> = err("no");
        assert!(is_ok(&good) && !is_err(&good));
        assert!(is_err(&bad) && !is_ok(&bad));
    }

    #[test]
    fn unwrap_returns_value() {
        assert_eq!(unwrap(ok::<_, ()>(5)), 5);
    }

    #[test]
    #[should_panic(expected = "\"boom\"")]
    fn unwrap_panics_with_debug_rendering() {
        unwrap::<u8, _>(err("boom"));
    }

    #[test]
    fn unwrap_or_else_runs_only_on_err() {
        let calls = Cell::new(0);
        let value = unwrap_or_else(ok::<_, &str>(3), |_| {
            calls.set(calls.get() + 1);
            0
        });
        assert_eq!((value, calls.get()), (3, 0));

        let value = unwrap_or_else(err::<i32, _>("e"), |e| {
            calls.set(calls.get() + 1);
            e.len() as i32
        });
        assert_eq!((value, calls.get()), (1, 1));
        assert_eq!(unwrap_or(err::<i32, ()>(()), 9), 9);
    }

    #[test]
    fn map_skips_err() {
        let calls = Cell::new(0);
        let r = map(err::<i32, &str>("e"), |v| {
            calls.set(calls.get() + 1);
            v + 1
        });
        assert_eq!(r, Err("e"));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn map_err_skips_ok() {
        let calls = Cell::new(0);
        let r = map_err(ok::<i32, &str>(1), |e| {
            calls.set(calls.get() + 1);
            e.len()
        });
        assert_eq!(r, Ok(1));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn and_then_short_circuits() {
        let calls = Cell::new(0);
        let step = |v: i32| {
            calls.set(calls.get() + 1);
            ok::<_, &str>(v * 10)
        };
        assert_eq!(and_then(err("first"), step), Err("first"));
        assert_eq!(calls.get(), 0);
        assert_eq!(and_then(ok(2), step), Ok(20));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn or_else_prefers_first_ok() {
        assert_eq!(or_else(ok::<_, &str>(1), ok(2)), Ok(1));
        assert_eq!(or_else(err("a"), ok::<i32, _>(2)), Ok(2));
        assert_eq!(or_else::<i32, _>(err("a"), err("b")), Err("b"));
    }

    #[test]
    fn match_result_dispatches_once() {
        let oks = Cell::new(0);
        let errs = Cell::new(0);
        let describe = |r: Result<i32, &str>| {
            match_result(
                r,
                |v| {
                    oks.set(oks.get() + 1);
                    format!("ok {v}")
                },
                |e| {
                    errs.set(errs.get() + 1);
                    format!("err {e}")
                },
            )
        };
        assert_eq!(describe(Ok(1)), "ok 1");
        assert_eq!(describe(Err("x")), "err x");
        assert_eq!((oks.get(), errs.get()), (1, 1));
    }

    #[test]
    fn fold_is_match() {
        assert_eq!(ok::<i32, &str>(2).fold(|v| v * 2, |_| 0), 4);
        assert_eq!(err::<i32, &str>("abc").fold(|v| v, |e| e.len() as i32), 3);
    }

    #[test]
    fn with_message_keeps_original_as_cause() {
        let r: Result<(), io::Error> = Err(io::Error::other("socket closed"));
        let error = r
            .with_message(definitions::CONNECTION_RESET, "peer went away")
            .unwrap_err();
        assert_eq!(error.message(), "peer went away");
        assert_eq!(error.code(), definitions::CONNECTION_RESET);
        assert_eq!(error.source().map(|s| s.to_string()).as_deref(), Some("socket closed"));
    }

    #[test]
    fn into_app_error_leaves_ok_untouched() {
        let r: Result<u8, io::Error> = Ok(7);
        assert_eq!(r.into_app_error(definitions::READ_ERROR).unwrap(), 7);
    }
}
