//! Transport error type and its retry classification.

use std::fmt;

use super::policy::ErrorKind;

/// Error from one listing or transfer request.
/// Kept concrete so it can be classified before converting to anyhow.
#[derive(Debug)]
pub enum TransportError {
    /// Curl reported an error (timeout, connection, etc.).
    Curl(curl::Error),
    /// HTTP response had a non-2xx status.
    Http(u32),
    /// Listing body was not the expected JSON.
    Listing(serde_json::Error),
    /// Writing the destination failed (disk full, permission denied). Not retried.
    Storage(anyhow::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Curl(e) => write!(f, "{}", e),
            TransportError::Http(code) => write!(f, "HTTP {}", code),
            TransportError::Listing(e) => write!(f, "invalid listing: {}", e),
            TransportError::Storage(e) => write!(f, "storage: {:#}", e),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::Curl(e) => Some(e),
            TransportError::Listing(e) => Some(e),
            TransportError::Storage(e) => Some(&**e),
            TransportError::Http(_) => None,
        }
    }
}

impl From<curl::Error> for TransportError {
    fn from(e: curl::Error) -> Self {
        TransportError::Curl(e)
    }
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

pub fn classify(e: &TransportError) -> ErrorKind {
    match e {
        TransportError::Curl(ce) => classify_curl_error(ce),
        TransportError::Http(code) => ErrorKind::Status(*code),
        TransportError::Listing(_) | TransportError::Storage(_) => ErrorKind::Other,
    }
}
