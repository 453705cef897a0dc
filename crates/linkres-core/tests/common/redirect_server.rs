//! Minimal HTTP/1.1 server for resolver integration tests.
//!
//! Serves a fixed set of routes: plain pages, redirect chains, meta-refresh and
//! title pages, error statuses, a slow page, and an edge-proxy emulation for
//! any path that starts with `/http`.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

pub const META_TARGET: &str = "https://c.example/landing";
pub const TITLE_TARGET: &str = "https://d.example/path";
/// Edge emulation maps `https://t.co/<id>` to this prefix plus `<id>`.
pub const SHORT_LINK_DESTINATION: &str = "https://example.com/expanded/";
/// Title served by `/long-body` after `LONG_BODY_PADDING` bytes of filler.
pub const LATE_TITLE_TARGET: &str = "https://late.example/";
pub const LONG_BODY_PADDING: usize = 64 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct ServerOptions {
    /// Header the edge emulation reports the final URL in; None omits it.
    pub edge_header: Option<&'static str>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            edge_header: Some("X-Final-URL"),
        }
    }
}

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
pub fn start() -> String {
    start_with_options(ServerOptions::default())
}

pub fn start_with_options(opts: ServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            thread::spawn(move || handle(stream, opts));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

struct Response {
    status: &'static str,
    headers: Vec<(String, String)>,
    content_type: &'static str,
    body: String,
}

impl Response {
    fn html(body: impl Into<String>) -> Self {
        Self {
            status: "200 OK",
            headers: Vec::new(),
            content_type: "text/html; charset=utf-8",
            body: body.into(),
        }
    }

    fn redirect(location: impl Into<String>) -> Self {
        Self {
            status: "302 Found",
            headers: vec![("Location".to_string(), location.into())],
            content_type: "text/html",
            body: String::new(),
        }
    }

    fn status(status: &'static str) -> Self {
        Self {
            status,
            headers: Vec::new(),
            content_type: "text/plain",
            body: status.to_string(),
        }
    }
}

fn handle(mut stream: std::net::TcpStream, opts: ServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
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
    let (target, user_agent) = parse_request(request);
    if target.contains("t.co/drop") {
        // Close without a response: the client sees an empty reply.
        return;
    }
    let response = route(target, user_agent, opts);

    let mut head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        response.status,
        response.content_type,
        response.body.len()
    );
    for (name, value) in &response.headers {
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    let mut head = head.into_bytes();
    if target == "/latin1-header" {
        // ISO-8859-1 "café": not valid UTF-8.
        head.extend_from_slice(b"X-Note: caf\xe9\r\n");
    }
    head.extend_from_slice(b"\r\n");
    let _ = stream.write_all(&head);
    let _ = stream.write_all(response.body.as_bytes());
}

fn route(target: &str, user_agent: &str, opts: ServerOptions) -> Response {
    if let Some(proxied) = target.strip_prefix('/').filter(|t| t.starts_with("http")) {
        return edge(proxied, opts);
    }
    if let Some(n) = target.strip_prefix("/chain/") {
        return match n.parse::<u32>() {
            Ok(0) | Err(_) => Response::redirect("/plain"),
            Ok(n) => Response::redirect(format!("/chain/{}", n - 1)),
        };
    }
    match target {
        "/plain" => Response::html("<html><head><title>Plain page</title></head><body>hi</body></html>"),
        "/redirect" => Response::redirect("/plain"),
        "/loop" => Response::redirect("/loop"),
        "/meta" => Response::html(format!(
            r#"<html><head><meta http-equiv="refresh" content="0;url={META_TARGET}"><title>Moving</title></head></html>"#
        )),
        "/redirect-to-meta" => Response::redirect("/meta"),
        "/title" => Response::html(format!("<html><head><title>  {TITLE_TARGET}  </title></head></html>")),
        "/both" => Response::html(format!(
            r#"<meta http-equiv="refresh" content="0;url={META_TARGET}"><title>{TITLE_TARGET}</title>"#
        )),
        "/long-body" => Response::html(format!(
            "<html><body>{}<title>{LATE_TITLE_TARGET}</title></body></html>",
            "x".repeat(LONG_BODY_PADDING)
        )),
        "/latin1-header" => Response::html("<html><body>latin1</body></html>"),
        "/json" => Response {
            status: "200 OK",
            headers: Vec::new(),
            content_type: "application/json",
            body: format!(r#"{{"html":"<title>{TITLE_TARGET}</title>"}}"#),
        },
        "/missing" => Response::status("404 Not Found"),
        "/slow" => {
            thread::sleep(Duration::from_secs(3));
            Response::html("<title>late</title>")
        }
        "/browser-only" => {
            if user_agent.contains("Mozilla/5.0") {
                Response::redirect("/plain")
            } else {
                Response::status("403 Forbidden")
            }
        }
        _ => Response::status("404 Not Found"),
    }
}

/// Edge emulation: never redirects locally; reports the destination in a header.
fn edge(proxied: &str, opts: ServerOptions) -> Response {
    let destination = match proxied.strip_prefix("https://t.co/") {
        Some(id) => format!("{SHORT_LINK_DESTINATION}{id}"),
        None => proxied.replace("/absolute-redirect/1", "/get"),
    };
    let mut response = if proxied.contains("edge-status-503") {
        Response::status("503 Service Unavailable")
    } else if proxied.contains("edge-with-meta") {
        Response::html(format!(
            r#"<meta http-equiv="refresh" content="0;url={META_TARGET}">"#
        ))
    } else {
        // A 302 the client must not follow.
        Response::redirect("/missing")
    };
    if let Some(name) = opts.edge_header {
        response.headers.push((name.to_string(), destination));
    }
    response
}

/// Returns (request target, User-Agent value).
fn parse_request(request: &str) -> (&str, &str) {
    let mut target = "";
    let mut user_agent = "";
    for (i, line) in request.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if i == 0 {
            target = line.split_whitespace().nth(1).unwrap_or("");
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("user-agent") {
                user_agent = value.trim();
            }
        }
    }
    (target, user_agent)
}
