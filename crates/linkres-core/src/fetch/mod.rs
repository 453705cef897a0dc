//! HTTP GET for resolution.
//!
//! Uses the curl crate (libcurl) to issue the request, optionally following
//! redirects and tunnelling through a SOCKS5 proxy. Captures the effective URL,
//! the header block of the last response, and a bounded prefix of the body for
//! the HTML heuristics.

mod parse;

pub use parse::{final_response_headers, header_value};

use std::time::Duration;

use curl::easy::{Easy, IpResolve};

use crate::error::ResolveError;

/// Request settings for one GET.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    /// Follow `Location` redirects automatically.
    pub follow_redirects: bool,
    /// Hop limit when following; exceeding it is a curl error.
    pub max_redirects: u32,
    /// Treat non-2xx as an error.
    pub validate_status: bool,
    pub user_agent: String,
    /// SOCKS5 proxy URL; DNS is resolved locally over IPv4.
    pub socks5_proxy: Option<String>,
    pub max_body_bytes: usize,
}

/// What came back from the GET.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u32,
    /// URL curl ended on after redirects, if it reported one.
    pub effective_url: Option<String>,
    /// Header lines of the last response in the chain.
    pub headers: Vec<String>,
    pub content_type: Option<String>,
    /// Body prefix, at most `max_body_bytes` long.
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }

    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Performs a GET request and returns status, effective URL, headers and body.
///
/// Runs in the current thread; call from `spawn_blocking` if used from async code.
pub fn fetch(url: &str, opts: &FetchOptions) -> Result<FetchResponse, ResolveError> {
    let transport = |source: curl::Error| ResolveError::Transport {
        url: url.to_string(),
        source,
    };

    let mut header_lines: Vec<String> = Vec::new();
    let mut body: Vec<u8> = Vec::new();

    let mut easy = Easy::new();
    easy.url(url).map_err(transport)?;
    easy.get(true).map_err(transport)?;
    easy.useragent(&opts.user_agent).map_err(transport)?;
    easy.follow_location(opts.follow_redirects).map_err(transport)?;
    if opts.follow_redirects {
        easy.max_redirections(opts.max_redirects).map_err(transport)?;
    }
    easy.timeout(opts.timeout).map_err(transport)?;
    if let Some(proxy) = &opts.socks5_proxy {
        easy.proxy(proxy).map_err(transport)?;
        // Some tunnels cannot reach IPv6 destinations.
        easy.ip_resolve(IpResolve::V4).map_err(transport)?;
    }

    {
        let cap = opts.max_body_bytes;
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                header_lines.push(String::from_utf8_lossy(data).trim_end().to_string());
                true
            })
            .map_err(transport)?;
        transfer
            .write_function(|data| {
                let room = cap.saturating_sub(body.len());
                body.extend_from_slice(&data[..data.len().min(room)]);
                Ok(data.len())
            })
            .map_err(transport)?;
        transfer.perform().map_err(transport)?;
    }

    let status = easy.response_code().map_err(transport)?;
    if opts.validate_status && !(200..300).contains(&status) {
        return Err(ResolveError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    let effective_url = easy.effective_url().map_err(transport)?.map(String::from);
    let content_type = easy.content_type().map_err(transport)?.map(String::from);

    tracing::debug!(
        url,
        status,
        effective_url = effective_url.as_deref().unwrap_or("-"),
        body_bytes = body.len(),
        "fetch complete"
    );

    Ok(FetchResponse {
        status,
        effective_url,
        headers: final_response_headers(&header_lines),
        content_type,
        body,
    })
}
