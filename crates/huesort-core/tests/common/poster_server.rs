//! Minimal HTTP/1.1 server standing in for Letterboxd in integration tests.
//!
//! Serves film pages at `/film/<slug>/`. A film registered with a poster gets
//! a page whose JSON-LD script links `/resized/film-poster/<slug>-0-230-0-345-crop.jpg`
//! on the same server, and that path serves the image bytes. Anything else is 404.
//! A stalling server sends half of each poster, calls a hook, then goes quiet.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Called once a stalling poster response has sent its first half.
pub type StallHook = Arc<dyn Fn() + Send + Sync>;

struct Route {
    content_type: &'static str,
    body: Vec<u8>,
    stall: Option<StallHook>,
}

pub struct PosterServer {
    base: String,
    requests: Arc<AtomicUsize>,
}

impl PosterServer {
    /// Starts a server in a background thread. Each entry is a film slug and
    /// its poster image, or `None` for a page without a poster. The server
    /// runs until the process exits.
    pub fn start(films: &[(&str, Option<Vec<u8>>)]) -> Self {
        Self::start_inner(films, None)
    }

    /// Like `start`, but poster responses stop halfway and call `on_stall`.
    pub fn start_stalling(films: &[(&str, Option<Vec<u8>>)], on_stall: StallHook) -> Self {
        Self::start_inner(films, Some(on_stall))
    }

    fn start_inner(films: &[(&str, Option<Vec<u8>>)], stall: Option<StallHook>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let base = format!("http://127.0.0.1:{}", port);

        let mut routes = HashMap::new();
        for (slug, poster) in films {
            let script = match poster {
                Some(bytes) => {
                    let path = format!("/resized/film-poster/{}-0-230-0-345-crop.jpg", slug);
                    routes.insert(
                        path.clone(),
                        Route {
                            content_type: "image/jpeg",
                            body: bytes.clone(),
                            stall: stall.clone(),
                        },
                    );
                    format!(r#"{{"@type":"Movie","image":"{}{}"}}"#, base, path)
                }
                None => r#"{"@type":"Movie"}"#.to_string(),
            };
            let html = format!(
                "<!DOCTYPE html><html><head><title>{slug}</title>\
                 <script type=\"application/ld+json\">{script}</script>\
                 </head><body><h1>{slug}</h1></body></html>"
            );
            routes.insert(
                format!("/film/{}/", slug),
                Route {
                    content_type: "text/html; charset=utf-8",
                    body: html.into_bytes(),
                    stall: None,
                },
            );
        }

        let routes = Arc::new(routes);
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                counter.fetch_add(1, Ordering::SeqCst);
                let routes = Arc::clone(&routes);
                thread::spawn(move || handle(stream, &routes));
            }
        });
        Self { base, requests }
    }

    pub fn film_url(&self, slug: &str) -> String {
        format!("{}/film/{}/", self.base, slug)
    }

    /// Regex matching this server's poster URLs.
    pub fn poster_pattern(&self) -> String {
        format!(r"{}/resized/film-poster.*?\.jpg", regex::escape(&self.base))
    }

    /// Connections accepted so far (one per request; responses close the connection).
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

/// A URL on a local port with nothing listening.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/film/gone/", port)
}

fn handle(mut stream: std::net::TcpStream, routes: &HashMap<String, Route>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut first = request.lines().next().unwrap_or("").split_whitespace();
    let method = first.next().unwrap_or("");
    let path = first.next().unwrap_or("");
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }
    match routes.get(path) {
        Some(route) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                route.content_type,
                route.body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            match &route.stall {
                Some(on_stall) => {
                    let half = route.body.len() / 2;
                    let _ = stream.write_all(&route.body[..half]);
                    let _ = stream.flush();
                    on_stall();
                    thread::sleep(Duration::from_secs(10));
                    let _ = stream.write_all(&route.body[half..]);
                }
                None => {
                    let _ = stream.write_all(&route.body);
                }
            }
        }
        None => {
            let _ = stream.write_all(
                b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
        }
    }
}
