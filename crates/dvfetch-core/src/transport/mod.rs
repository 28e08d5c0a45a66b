//! HTTP transport seam.
//!
//! The crawler lists directories and the downloader fetches files through a
//! [`Transport`]; concurrent passes build one session per worker thread from a
//! [`SessionFactory`]. [`CurlSession`] is the production implementation.

mod curl_session;

pub use curl_session::{CurlSession, CurlSessionFactory};

use std::path::Path;

use crate::crawler::ListingNode;
use crate::retry::TransportError;

/// One authenticated connection to the listing API.
pub trait Transport {
    /// Downloads `url` to `dest` and returns the number of bytes written.
    /// `dest` only appears once the body is complete.
    fn fetch(&mut self, url: &str, dest: &Path) -> Result<u64, TransportError>;

    /// Fetches one listing page.
    fn list(&mut self, url: &str) -> Result<Vec<ListingNode>, TransportError>;
}

/// Builds sessions; shared by reference across worker threads.
pub trait SessionFactory: Sync {
    type Session: Transport;

    fn create(&self) -> anyhow::Result<Self::Session>;
}

#[cfg(test)]
pub(crate) mod fake;
