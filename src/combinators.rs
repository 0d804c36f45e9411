//! Combinators over many results, and panic-catching wrappers.
//!
//! # Aggregation
//!
//! | Function              | Input                    | Stops early | Error returned         |
//! |-----------------------|--------------------------|-------------|------------------------|
//! | [`collect`]           | resolved results         | yes         | first in input order   |
//! | [`partition`]         | resolved results         | no          | all, in input order    |
//! | [`sequence_async`]    | futures, one at a time   | yes         | first in input order   |
//! | [`parallel_async`]    | futures, concurrently    | no          | first in input order   |
//!
//! `sequence` and `parallel` are aliases of `collect` kept for call sites
//! that mirror the async names.
//!
//! # Catching
//!
//! [`try_catch`] and [`try_catch_async`] turn both an `Err` and a panic into
//! an `Err`, so a caller that must not unwind (a worker loop, an FFI edge)
//! gets one failure path.

use crate::{definitions, AppError, Thrown};
use futures::FutureExt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

// ============================================================================
// Aggregation
// ============================================================================

/// Gather successes in order. The first `Err` wins and later entries are not
/// inspected. Empty input yields `Ok(vec![])`.
pub fn collect<T, E>(results: impl IntoIterator<Item = Result<T, E>>) -> Result<Vec<T>, E> {
    results.into_iter().collect()
}

/// Alias of [`collect`].
#[inline]
pub fn sequence<T, E>(results: impl IntoIterator<Item = Result<T, E>>) -> Result<Vec<T>, E> {
    collect(results)
}

/// Alias of [`collect`] over already-resolved values.
#[inline]
pub fn parallel<T, E>(results: impl IntoIterator<Item = Result<T, E>>) -> Result<Vec<T>, E> {
    collect(results)
}

/// Successes and failures split apart, each in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition<T, E> {
    /// `Ok` values
    pub successes: Vec<T>,
    /// `Err` values
    pub failures: Vec<E>,
}

impl<T, E> Default for Partition<T, E> {
    fn default() -> Self {
        Self {
            successes: Vec::new(),
            failures: Vec::new(),
        }
    }
}

/// Split results without short-circuiting.
pub fn partition<T, E>(results: impl IntoIterator<Item = Result<T, E>>) -> Partition<T, E> {
    results
        .into_iter()
        .fold(Partition::default(), |mut acc, result| {
            match result {
                Ok(value) => acc.successes.push(value),
                Err(error) => acc.failures.push(error),
            }
            acc
        })
}

/// Both values, or the first error from the left.
#[inline]
pub fn combine2<A, B, E>(a: Result<A, E>, b: Result<B, E>) -> Result<(A, B), E> {
    Ok((a?, b?))
}

/// All three values, or the first error from the left.
#[inline]
pub fn combine3<A, B, C, E>(a: Result<A, E>, b: Result<B, E>, c: Result<C, E>) -> Result<(A, B, C), E> {
    Ok((a?, b?, c?))
}

// ============================================================================
// Catching
// ============================================================================

fn internal_error(thrown: Thrown) -> AppError {
    AppError::new(definitions::INTERNAL_ERROR, thrown.message()).with_name("RuntimeError")
}

/// Run `f`, turning its `Err` or a panic into an `INTERNAL_ERROR` [`AppError`].
///
/// ```rust
/// use keystone_errors::{combinators, definitions};
///
/// let r: Result<(), _> = combinators::try_catch(|| Err::<(), _>("bad state"));
/// let err = r.unwrap_err();
/// assert_eq!(err.code(), definitions::INTERNAL_ERROR);
/// assert_eq!(err.message(), "bad state");
/// ```
pub fn try_catch<T, X>(f: impl FnOnce() -> Result<T, X>) -> Result<T, AppError>
where
    X: Into<Thrown>,
{
    try_catch_with(f, internal_error)
}

/// Run `f`, passing its `Err` or a panic payload through `mapper`.
pub fn try_catch_with<T, X, E>(f: impl FnOnce() -> Result<T, X>, mapper: impl FnOnce(Thrown) -> E) -> Result<T, E>
where
    X: Into<Thrown>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(mapper(error.into())),
        Err(payload) => Err(mapper(Thrown::from_panic(payload))),
    }
}

/// Async [`try_catch`].
pub async fn try_catch_async<T, X, Fut>(f: impl FnOnce() -> Fut) -> Result<T, AppError>
where
    Fut: Future<Output = Result<T, X>>,
    X: Into<Thrown>,
{
    try_catch_async_with(f, internal_error).await
}

/// Async [`try_catch_with`]. Catches a panic while building the future, a
/// panic while polling it, and its `Err` output.
pub async fn try_catch_async_with<T, X, E, Fut>(
    f: impl FnOnce() -> Fut,
    mapper: impl FnOnce(Thrown) -> E,
) -> Result<T, E>
where
    Fut: Future<Output = Result<T, X>>,
    X: Into<Thrown>,
{
    let future = match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(future) => future,
        Err(payload) => return Err(mapper(Thrown::from_panic(payload))),
    };

    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(mapper(error.into())),
        Err(payload) => Err(mapper(Thrown::from_panic(payload))),
    }
}

// ============================================================================
// Async aggregation
// ============================================================================

/// Await futures one at a time. Stops at the first `Err`; the remaining
/// futures are dropped without being polled.
pub async fn sequence_async<T, E, Fut>(tasks: impl IntoIterator<Item = Fut>) -> Result<Vec<T>, E>
where
    Fut: Future<Output = Result<T, E>>,
{
    let tasks = tasks.into_iter();
    let mut values = Vec::with_capacity(tasks.size_hint().0);
    for future in tasks {
        values.push(future.await?);
    }
    Ok(values)
}

/// Drive all futures concurrently, then fold in input order. Returns the
/// first error by position, not by completion time.
pub async fn parallel_async<T, E, Fut>(tasks: impl IntoIterator<Item = Fut>) -> Result<Vec<T>, E>
where
    Fut: Future<Output = Result<T, E>>,
{
    collect(futures::future::join_all(tasks).await)
}
