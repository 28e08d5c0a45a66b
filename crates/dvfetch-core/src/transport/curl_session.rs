//! libcurl-backed session: one reused Easy handle, basic auth, streamed bodies.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;

use super::{SessionFactory, Transport};
use crate::config::TransportConfig;
use crate::crawler::ListingNode;
use crate::credentials::ValidCredentials;
use crate::retry::{run_with_retry, RetryPolicy, TransportError};
use crate::storage::{self, StorageWriter};

pub struct CurlSession {
    easy: curl::easy::Easy,
    policy: RetryPolicy,
}

impl CurlSession {
    pub fn new(credentials: &ValidCredentials, cfg: &TransportConfig) -> Result<Self> {
        let mut easy = curl::easy::Easy::new();
        easy.username(credentials.username())?;
        easy.password(credentials.password())?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))?;
        easy.low_speed_limit(cfg.low_speed_limit_bytes)
            .context("curl: low_speed_limit")?;
        easy.low_speed_time(Duration::from_secs(cfg.low_speed_time_secs))?;
        easy.timeout(Duration::from_secs(cfg.timeout_secs))?;
        Ok(Self {
            easy,
            policy: RetryPolicy::from(cfg),
        })
    }
}

impl Transport for CurlSession {
    fn fetch(&mut self, url: &str, dest: &Path) -> Result<u64, TransportError> {
        let easy = &mut self.easy;
        run_with_retry(&self.policy, url, || fetch_once(easy, url, dest))
    }

    fn list(&mut self, url: &str) -> Result<Vec<ListingNode>, TransportError> {
        let easy = &mut self.easy;
        let body = run_with_retry(&self.policy, url, || get_body(easy, url))?;
        serde_json::from_slice(&body).map_err(TransportError::Listing)
    }
}

fn check_status(easy: &mut curl::easy::Easy) -> Result<(), TransportError> {
    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(TransportError::Http(code));
    }
    Ok(())
}

fn get_body(easy: &mut curl::easy::Easy, url: &str) -> Result<Vec<u8>, TransportError> {
    easy.url(url)?;
    easy.get(true)?;
    let mut body = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }
    check_status(easy)?;
    Ok(body)
}

fn fetch_once(easy: &mut curl::easy::Easy, url: &str, dest: &Path) -> Result<u64, TransportError> {
    easy.url(url)?;
    easy.get(true)?;
    let mut writer = StorageWriter::create(dest).map_err(TransportError::Storage)?;
    let mut write_err: Option<anyhow::Error> = None;
    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match writer.write_all(data) {
            Ok(()) => Ok(data.len()),
            Err(e) => {
                write_err = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };
    if let Some(e) = write_err {
        drop(writer);
        storage::discard_temp(dest);
        return Err(TransportError::Storage(e));
    }
    if let Err(e) = performed.map_err(TransportError::from).and_then(|()| check_status(easy)) {
        drop(writer);
        storage::discard_temp(dest);
        return Err(e);
    }
    writer.finalize().map_err(TransportError::Storage)
}

/// Builds [`CurlSession`]s sharing one set of credentials and transport settings.
#[derive(Debug, Clone)]
pub struct CurlSessionFactory {
    credentials: ValidCredentials,
    config: TransportConfig,
}

impl CurlSessionFactory {
    pub fn new(credentials: ValidCredentials, config: TransportConfig) -> Self {
        Self { credentials, config }
    }
}

impl SessionFactory for CurlSessionFactory {
    type Session = CurlSession;

    fn create(&self) -> Result<CurlSession> {
        CurlSession::new(&self.credentials, &self.config)
    }
}
