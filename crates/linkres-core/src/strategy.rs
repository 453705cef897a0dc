//! Proxy strategy and per-call resolver options.
//!
//! Everything a resolution needs is passed in explicitly, so concurrent calls
//! with different strategies never share client state.

use std::time::Duration;

use crate::error::ResolveError;

/// Browser User-Agent sent on every request; some redirectors short-circuit bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Response header the edge proxy uses to report the resolved destination.
pub const DEFAULT_FINAL_URL_HEADER: &str = "X-Final-URL";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_REDIRECTS: u32 = 10;
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// How the request reaches the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyStrategy {
    /// Direct request, no tunnel.
    None,
    /// Route HTTP and HTTPS through a SOCKS5 tunnel (`socks5://[user:pass@]host:port`).
    Socks5Tunnel(String),
    /// Delegate resolution to a remote edge service at `base + "/" + url`.
    EdgeHttpProxy(String),
}

impl ProxyStrategy {
    /// Builds the edge strategy, rejecting a missing or blank base URL.
    pub fn edge(base_url: Option<&str>) -> Result<Self, ResolveError> {
        match base_url.map(str::trim) {
            Some(base) if !base.is_empty() => Ok(ProxyStrategy::EdgeHttpProxy(base.to_string())),
            _ => Err(ResolveError::Configuration(
                "edge proxy strategy selected but no base URL was supplied".to_string(),
            )),
        }
    }

    /// Builds the SOCKS5 strategy, rejecting a missing, blank or non-SOCKS proxy URL.
    pub fn socks5(proxy_url: Option<&str>) -> Result<Self, ResolveError> {
        let strategy = ProxyStrategy::Socks5Tunnel(proxy_url.unwrap_or("").trim().to_string());
        strategy.validate()?;
        Ok(strategy)
    }

    /// Checks the settings a strategy needs before any request is made.
    ///
    /// libcurl treats an empty proxy as "no proxy" and accepts HTTP proxies,
    /// so both would silently bypass the tunnel.
    pub fn validate(&self) -> Result<(), ResolveError> {
        match self {
            ProxyStrategy::None => Ok(()),
            ProxyStrategy::Socks5Tunnel(proxy) => {
                let proxy = proxy.trim();
                if proxy.is_empty() {
                    return Err(ResolveError::Configuration(
                        "socks5 strategy selected but no proxy URL was supplied".to_string(),
                    ));
                }
                let scheme = proxy
                    .split_once("://")
                    .map(|(s, _)| s.to_ascii_lowercase())
                    .unwrap_or_default();
                if scheme != "socks5" && scheme != "socks5h" {
                    return Err(ResolveError::Configuration(format!(
                        "socks5 proxy URL must use socks5:// or socks5h://, got {proxy:?}"
                    )));
                }
                Ok(())
            }
            ProxyStrategy::EdgeHttpProxy(base) => {
                if base.trim().is_empty() {
                    return Err(ResolveError::Configuration(
                        "edge proxy strategy selected but no base URL was supplied".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProxyStrategy::None => "direct",
            ProxyStrategy::Socks5Tunnel(_) => "socks5",
            ProxyStrategy::EdgeHttpProxy(_) => "edge",
        }
    }
}

/// Per-call request settings.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub timeout: Duration,
    /// Redirect hop limit for the direct and SOCKS5 paths.
    pub max_redirects: u32,
    pub user_agent: String,
    /// Header read in edge mode.
    pub final_url_header: String,
    /// Body bytes kept for the HTML heuristics; the rest is drained.
    pub max_body_bytes: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            final_url_header: DEFAULT_FINAL_URL_HEADER.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}
