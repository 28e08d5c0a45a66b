//! Retry loop: run a request until success or the policy says stop.

use super::error::{classify, TransportError};
use super::policy::{RetryDecision, RetryPolicy};

/// Runs `f` until it succeeds or `policy` says to stop, sleeping for the
/// backoff between attempts. `what` names the request in logs.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, what: &str, mut f: F) -> Result<T, TransportError>
where
    F: FnMut() -> Result<T, TransportError>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(e) => match policy.decide(attempt, classify(&e)) {
                RetryDecision::NoRetry => return Err(e),
                RetryDecision::RetryAfter(d) => {
                    tracing::debug!(request = %what, attempt, delay_ms = d.as_millis() as u64, "retrying: {}", e);
                    std::thread::sleep(d);
                    attempt += 1;
                }
            },
        }
    }
}
