//! Minimal HTTP/1.1 server imitating the listing API for integration tests.
//!
//! Serves fixed bodies by path. Data routes honour `?start=<s>&end=<e>` as an
//! inclusive byte range clamped to the body. Every request must carry the
//! configured `Authorization` header, and every response closes the connection.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

/// `Basic base64("user:secret")`.
pub const USER: &str = "user";
pub const PASSWORD: &str = "secret";
const AUTHORIZATION: &str = "Basic dXNlcjpzZWNyZXQ=";

#[derive(Default)]
struct State {
    routes: HashMap<String, Vec<u8>>,
    /// Path -> remaining 503 responses.
    failures: Mutex<HashMap<String, usize>>,
    hits: Mutex<Vec<String>>,
}

#[derive(Default)]
pub struct ListingServer {
    state: State,
}

pub struct RunningServer {
    pub base_url: String,
    state: Arc<State>,
}

impl ListingServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listing(mut self, path: &str, nodes: serde_json::Value) -> Self {
        self.state.routes.insert(path.to_string(), nodes.to_string().into_bytes());
        self
    }

    pub fn data(mut self, path: &str, body: Vec<u8>) -> Self {
        self.state.routes.insert(path.to_string(), body);
        self
    }

    /// The next `times` requests for `path` answer 503.
    pub fn flaky(self, path: &str, times: usize) -> Self {
        self.state.failures.lock().unwrap().insert(path.to_string(), times);
        self
    }

    /// Starts serving in a background thread until the process exits.
    pub fn start(self) -> RunningServer {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(self.state);
        let serving = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&serving);
                thread::spawn(move || handle(stream, &state));
            }
        });
        RunningServer {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
        }
    }
}

impl RunningServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request targets (path and query) in arrival order.
    pub fn hits(&self) -> Vec<String> {
        self.state.hits.lock().unwrap().clone()
    }
}

fn respond(stream: &mut std::net::TcpStream, status: &str, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}

fn handle(mut stream: std::net::TcpStream, state: &State) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];
    while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => raw.extend_from_slice(&buf[..n]),
        }
    }
    let request = match std::str::from_utf8(&raw) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut lines = request.lines();
    let target = match lines.next().and_then(|l| l.split_whitespace().nth(1)) {
        Some(t) => t.to_string(),
        None => return,
    };
    let authorized = lines
        .filter_map(|l| l.split_once(':'))
        .any(|(k, v)| k.trim().eq_ignore_ascii_case("authorization") && v.trim() == AUTHORIZATION);
    state.hits.lock().unwrap().push(target.clone());

    if !authorized {
        respond(&mut stream, "401 Unauthorized", br#"{"error":"unauthorized"}"#);
        return;
    }
    let (path, query) = match target.split_once('?') {
        Some((p, q)) => (p.to_string(), Some(q.to_string())),
        None => (target.clone(), None),
    };
    {
        let mut failures = state.failures.lock().unwrap();
        if let Some(left) = failures.get_mut(&path) {
            if *left > 0 {
                *left -= 1;
                respond(&mut stream, "503 Service Unavailable", b"");
                return;
            }
        }
    }
    let body = match state.routes.get(&path) {
        Some(b) => b,
        None => {
            respond(&mut stream, "404 Not Found", b"");
            return;
        }
    };
    match query.as_deref().and_then(parse_range) {
        Some((start, end)) => {
            let len = body.len() as u64;
            let end_excl = end.saturating_add(1).min(len) as usize;
            let start = (start.min(len) as usize).min(end_excl);
            respond(&mut stream, "200 OK", &body[start..end_excl]);
        }
        _ => respond(&mut stream, "200 OK", body),
    }
}

/// `start=<s>&end=<e>`, both required.
fn parse_range(query: &str) -> Option<(u64, u64)> {
    let mut start = None;
    let mut end = None;
    for kv in query.split('&') {
        match kv.split_once('=')? {
            ("start", v) => start = v.parse().ok(),
            ("end", v) => end = v.parse().ok(),
            _ => {}
        }
    }
    Some((start?, end?))
}
