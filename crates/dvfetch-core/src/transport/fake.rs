//! In-memory transport for tests: serves fixed bodies, can fail chosen URLs.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{SessionFactory, Transport};
use crate::crawler::ListingNode;
use crate::retry::TransportError;
use crate::storage;

#[derive(Default)]
struct Shared {
    bodies: HashMap<String, Vec<u8>>,
    /// URL -> remaining failures before it starts succeeding.
    failures: Mutex<HashMap<String, usize>>,
    requests: Mutex<Vec<String>>,
    sessions: AtomicUsize,
    threads: Mutex<HashSet<std::thread::ThreadId>>,
}

#[derive(Clone, Default)]
pub struct FakeFactory {
    shared: Arc<Shared>,
}

impl FakeFactory {
    pub fn new(bodies: HashMap<String, Vec<u8>>) -> Self {
        Self {
            shared: Arc::new(Shared {
                bodies,
                ..Shared::default()
            }),
        }
    }

    /// `url` fails its next `times` fetches.
    pub fn fail(self, url: &str, times: usize) -> Self {
        self.shared
            .failures
            .lock()
            .unwrap()
            .insert(url.to_string(), times);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.shared.requests.lock().unwrap().clone()
    }

    pub fn sessions_created(&self) -> usize {
        self.shared.sessions.load(Ordering::SeqCst)
    }

    pub fn session_threads(&self) -> usize {
        self.shared.threads.lock().unwrap().len()
    }
}

pub struct FakeSession {
    shared: Arc<Shared>,
}

impl Transport for FakeSession {
    fn fetch(&mut self, url: &str, dest: &Path) -> Result<u64, TransportError> {
        self.shared.requests.lock().unwrap().push(url.to_string());
        {
            let mut failures = self.shared.failures.lock().unwrap();
            if let Some(left) = failures.get_mut(url) {
                if *left > 0 {
                    *left -= 1;
                    return Err(TransportError::Http(503));
                }
            }
        }
        let body = self.shared.bodies.get(url).ok_or(TransportError::Http(404))?;
        storage::write_atomic(dest, body).map_err(TransportError::Storage)?;
        Ok(body.len() as u64)
    }

    fn list(&mut self, _url: &str) -> Result<Vec<ListingNode>, TransportError> {
        Ok(Vec::new())
    }
}

impl SessionFactory for FakeFactory {
    type Session = FakeSession;

    fn create(&self) -> anyhow::Result<FakeSession> {
        self.shared.sessions.fetch_add(1, Ordering::SeqCst);
        self.shared
            .threads
            .lock()
            .unwrap()
            .insert(std::thread::current().id());
        Ok(FakeSession {
            shared: Arc::clone(&self.shared),
        })
    }
}
