//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a single static body to every GET. Can be told to answer the
//! first N requests with 503 to simulate a path that is provisioned but
//! not yet healthy.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Copy)]
pub struct MarkerServerOptions {
    /// Answer this many requests with 503 before serving the body.
    pub fail_first: usize,
}

impl Default for MarkerServerOptions {
    fn default() -> Self {
        Self { fail_first: 0 }
    }
}

/// Starts a server in a background thread serving `body`. Returns the
/// address ("127.0.0.1:port"). The server runs until the process exits.
pub fn start(body: &str) -> String {
    start_with_options(body, MarkerServerOptions::default())
}

pub fn start_with_options(body: &str, opts: MarkerServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().unwrap();
    let body = Arc::new(body.to_string());
    let served = Arc::new(AtomicUsize::new(0));
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let served = Arc::clone(&served);
            thread::spawn(move || handle(stream, &body, &served, opts));
        }
    });
    addr.to_string()
}

fn handle(
    mut stream: std::net::TcpStream,
    body: &str,
    served: &AtomicUsize,
    opts: MarkerServerOptions,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(_) => {}
    }

    let n = served.fetch_add(1, Ordering::SeqCst);
    let response = if n < opts.fail_first {
        "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            .to_string()
    } else {
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        )
    };
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
