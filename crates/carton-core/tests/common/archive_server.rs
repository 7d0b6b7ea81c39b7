//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves one static body at `/static.zip`, optionally behind a redirect from
//! `/`, and counts every request it receives.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Copy)]
pub struct ArchiveServerOptions {
    /// Status line code sent with the body.
    pub status: u16,
    /// If true, `/` answers 302 to `/static.zip`.
    pub redirect_root: bool,
}

impl Default for ArchiveServerOptions {
    fn default() -> Self {
        Self {
            status: 200,
            redirect_root: false,
        }
    }
}

pub struct ArchiveServer {
    /// URL of the archive (e.g. "http://127.0.0.1:12345/static.zip").
    pub url: String,
    /// Base URL ending in "/".
    pub base: String,
    hits: Arc<AtomicUsize>,
}

impl ArchiveServer {
    /// Number of HTTP requests served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread serving `body`. Runs until the process exits.
pub fn start(body: Vec<u8>) -> ArchiveServer {
    start_with_options(body, ArchiveServerOptions::default())
}

pub fn start_with_options(body: Vec<u8>, opts: ArchiveServerOptions) -> ArchiveServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_srv = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let hits = Arc::clone(&hits_srv);
            thread::spawn(move || {
                hits.fetch_add(1, Ordering::SeqCst);
                handle(stream, &body, opts);
            });
        }
    });
    let base = format!("http://127.0.0.1:{}/", port);
    ArchiveServer {
        url: format!("{}static.zip", base),
        base,
        hits,
    }
}

fn handle(mut stream: TcpStream, body: &[u8], opts: ArchiveServerOptions) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("");

    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(
            b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        return;
    }
    if opts.redirect_root && path == "/" {
        let _ = stream.write_all(
            b"HTTP/1.1 302 Found\r\nLocation: /static.zip\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        return;
    }
    if path != "/static.zip" {
        let _ = stream.write_all(
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        return;
    }

    let head = format!(
        "HTTP/1.1 {} X\r\nContent-Type: application/zip\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        opts.status,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}
