use std::time::Duration;

use crate::config::TransportConfig;

/// High-level classification of an error for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Network-level failure (connection reset, DNS, short body, etc.).
    Connection,
    /// Non-2xx HTTP status; retried only if the policy lists it.
    Status(u32),
    /// Any other error (never retried).
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Upper bound on any single backoff sleep.
pub const MAX_BACKOFF: Duration = Duration::from_secs(120);

/// Bounded retries with exponential backoff.
///
/// The first retry is immediate; the n-th consecutive failure (n >= 2) waits
/// `backoff_factor * 2^(n-1)` seconds, capped at [`MAX_BACKOFF`].
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub total_retries: u32,
    pub backoff_factor: f64,
    pub status_forcelist: Vec<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&TransportConfig::default())
    }
}

impl From<&TransportConfig> for RetryPolicy {
    fn from(cfg: &TransportConfig) -> Self {
        Self {
            total_retries: cfg.total_retries,
            backoff_factor: cfg.backoff_factor.max(0.0),
            status_forcelist: cfg.status_forcelist.clone(),
        }
    }
}

impl RetryPolicy {
    pub fn is_retryable(&self, kind: ErrorKind) -> bool {
        match kind {
            ErrorKind::Timeout | ErrorKind::Connection => true,
            ErrorKind::Status(code) => self.status_forcelist.contains(&code),
            ErrorKind::Other => false,
        }
    }

    /// Delay before the retry that follows `failures` consecutive failures.
    pub fn backoff(&self, failures: u32) -> Duration {
        if failures <= 1 {
            return Duration::ZERO;
        }
        let exp = 2f64.powi(failures.saturating_sub(1).min(30) as i32);
        let secs = self.backoff_factor * exp;
        Duration::try_from_secs_f64(secs)
            .unwrap_or(MAX_BACKOFF)
            .min(MAX_BACKOFF)
    }

    /// `attempt` is 1-based (1 = the first attempt just failed).
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt > self.total_retries || !self.is_retryable(kind) {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.backoff(attempt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_retry_for_other_or_unlisted_status() {
        let p = RetryPolicy::default();
        assert_eq!(p.decide(1, ErrorKind::Other), RetryDecision::NoRetry);
        assert_eq!(p.decide(1, ErrorKind::Status(404)), RetryDecision::NoRetry);
        assert!(matches!(p.decide(1, ErrorKind::Status(401)), RetryDecision::RetryAfter(_)));
        assert!(matches!(p.decide(1, ErrorKind::Status(504)), RetryDecision::RetryAfter(_)));
    }

    #[test]
    fn backoff_doubles_from_second_failure_and_is_capped() {
        let p = RetryPolicy::default();
        assert_eq!(p.backoff(1), Duration::ZERO);
        assert_eq!(p.backoff(2), Duration::from_millis(200));
        assert_eq!(p.backoff(3), Duration::from_millis(400));
        assert_eq!(p.backoff(5), Duration::from_millis(1600));
        assert_eq!(p.backoff(40), MAX_BACKOFF);
    }

    #[test]
    fn respects_total_retries() {
        let p = RetryPolicy {
            total_retries: 2,
            ..RetryPolicy::default()
        };
        assert!(matches!(p.decide(1, ErrorKind::Timeout), RetryDecision::RetryAfter(_)));
        assert!(matches!(p.decide(2, ErrorKind::Timeout), RetryDecision::RetryAfter(_)));
        assert_eq!(p.decide(3, ErrorKind::Timeout), RetryDecision::NoRetry);
        let none = RetryPolicy {
            total_retries: 0,
            ..RetryPolicy::default()
        };
        assert_eq!(none.decide(1, ErrorKind::Timeout), RetryDecision::NoRetry);
    }
}
