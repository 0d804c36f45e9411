//! Basic usage: classify a failure, decide whether to retry, log it.
//!
//! Run with `cargo run --example basic_usage`.

use keystone_errors::{
    app_err, create_error, definitions, ensure, next_retry_delay, to_app_error, BackoffOptions,
    ErrorOptions, ExtendedAppError, Result, ResultExt,
};
use std::time::Duration;

/// Pretend remote call that times out a couple of times before succeeding.
fn fetch(attempt: u32) -> Result<&'static str> {
    if attempt < 2 {
        Err(create_error(
            definitions::CONNECTION_TIMEOUT,
            format!("attempt {attempt} timed out"),
            ErrorOptions::default(),
        ))
    } else {
        Ok("payload")
    }
}

fn fetch_with_retry(options: &BackoffOptions) -> Result<&'static str> {
    let mut attempt = 0;
    loop {
        match fetch(attempt) {
            Ok(body) => return Ok(body),
            Err(err) => {
                println!("{}", err.to_log_record());
                let Some(delay) = next_retry_delay(err.code(), attempt, options) else {
                    return Err(err);
                };
                println!("  retrying in {delay:?}");
                attempt += 1;
            }
        }
    }
}

fn parse_limit(raw: &str) -> Result<u32> {
    let limit: u32 = raw.parse().into_app_error(definitions::INVALID_FORMAT)?;
    ensure!(limit <= 100, code = definitions::OUT_OF_RANGE, "limit {} exceeds 100", limit);
    Ok(limit)
}

fn main() {
    let options = BackoffOptions::default()
        .with_base_delay(Duration::from_millis(10))
        .with_jitter(false);

    match fetch_with_retry(&options) {
        Ok(body) => println!("fetched {body}"),
        Err(err) => println!("gave up: {err}"),
    }

    for raw in ["42", "500", "lots"] {
        match parse_limit(raw) {
            Ok(limit) => println!("limit = {limit}"),
            Err(err) => println!("rejected {raw:?}: {err} (severity {})", err.severity()),
        }
    }

    let denied: ExtendedAppError = app_err!(definitions::UNAUTHORIZED_ACCESS, "token for {} revoked", "svc-a");
    println!("{}", denied.to_log_record().to_json().unwrap_or_default());

    let foreign = to_app_error(serde_json::json!({ "status": 503 }));
    println!("foreign failure: {foreign}");
}
