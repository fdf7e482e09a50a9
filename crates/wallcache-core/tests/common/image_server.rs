//! Minimal HTTP/1.1 server for probe integration tests.
//!
//! One request per connection. Routes by path:
//! - `/live.jpg`: 200 `image/jpeg`
//! - `/page.html`: 200 `text/html`
//! - `/missing.jpg`: 404
//! - `/head-blocked.png`: HEAD 405, GET 200 `image/png`
//! - `/head-html.jpg`: HEAD 200 `text/html`, GET 200 `image/jpeg`
//! - `/redirect.jpg`: 302 to `/live.jpg`
//! - `/slow.jpg`: sleeps 3 s, then 200 `image/jpeg`
//! - `/paced.jpg`: sleeps 50 ms, then 200 `image/jpeg`

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const BODY: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

/// Connection counters shared with the test.
#[derive(Debug, Default)]
pub struct ServerStats {
    pub requests: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

/// Starts the server in a background thread. Returns the base URL
/// (e.g. "http://127.0.0.1:12345") and the shared counters.
pub fn start() -> (String, Arc<ServerStats>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let stats = Arc::new(ServerStats::default());
    let server_stats = Arc::clone(&stats);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let stats = Arc::clone(&server_stats);
            thread::spawn(move || {
                let now = stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                stats.max_in_flight.fetch_max(now, Ordering::SeqCst);
                stats.requests.fetch_add(1, Ordering::SeqCst);
                handle(stream);
                stats.in_flight.fetch_sub(1, Ordering::SeqCst);
            });
        }
    });
    (format!("http://127.0.0.1:{}", port), stats)
}

/// A URL on a port nothing listens on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/gone.jpg", port)
}

fn handle(mut stream: TcpStream) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("").to_ascii_uppercase();
    let target = parts.next().unwrap_or("/");
    let path = target.split('?').next().unwrap_or("/").to_string();
    let is_head = method == "HEAD";

    let (status, content_type, extra) = match path.as_str() {
        "/live.jpg" => ("200 OK", "image/jpeg", String::new()),
        "/page.html" => ("200 OK", "text/html; charset=utf-8", String::new()),
        "/missing.jpg" => ("404 Not Found", "text/html", String::new()),
        "/head-blocked.png" if is_head => ("405 Method Not Allowed", "text/plain", String::new()),
        "/head-blocked.png" => ("200 OK", "image/png", String::new()),
        "/head-html.jpg" if is_head => ("200 OK", "text/html", String::new()),
        "/head-html.jpg" => ("200 OK", "image/jpeg", String::new()),
        "/redirect.jpg" => ("302 Found", "text/html", "Location: /live.jpg\r\n".to_string()),
        "/slow.jpg" => {
            thread::sleep(Duration::from_secs(3));
            ("200 OK", "image/jpeg", String::new())
        }
        "/paced.jpg" => {
            thread::sleep(Duration::from_millis(50));
            ("200 OK", "image/jpeg", String::new())
        }
        _ => ("404 Not Found", "text/plain", String::new()),
    };

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        status,
        content_type,
        BODY.len(),
        extra
    );
    let _ = stream.write_all(response.as_bytes());
    if !is_head {
        let _ = stream.write_all(BODY);
    }
}
