//! Per-request retry and backoff.
//!
//! Every listing or transfer request goes through [`run_with_retry`]: failures
//! are classified into an [`ErrorKind`] and the [`RetryPolicy`] decides whether
//! and when to try again. Whole-pass retries live in the driver.

mod error;
mod policy;
mod run;

pub use error::{classify, classify_curl_error, TransportError};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy, MAX_BACKOFF};
pub use run::run_with_retry;
