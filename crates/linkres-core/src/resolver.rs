//! Final-destination resolution for short and redirecting URLs.
//!
//! Two paths: a local GET that follows redirects (optionally through a SOCKS5
//! tunnel), or a request to an edge proxy that reports the destination in a
//! response header. Both then apply the HTML hints from [`crate::heuristics`].
//! Callers such as the text normalizer depend only on [`LinkResolver`].

use std::future::Future;

use crate::error::ResolveError;
use crate::fetch::{self, FetchOptions, FetchResponse};
use crate::heuristics;
use crate::strategy::{ProxyStrategy, ResolveOptions};

/// Anything that can turn a URL into its final destination.
pub trait LinkResolver {
    fn resolve(&self, url: &str) -> impl Future<Output = Result<String, ResolveError>> + Send;
}

/// Resolver bound to one strategy and option set.
#[derive(Debug, Clone)]
pub struct UrlResolver {
    strategy: ProxyStrategy,
    options: ResolveOptions,
}

impl UrlResolver {
    pub fn new(strategy: ProxyStrategy) -> Self {
        Self::with_options(strategy, ResolveOptions::default())
    }

    pub fn with_options(strategy: ProxyStrategy, options: ResolveOptions) -> Self {
        Self { strategy, options }
    }

    pub fn strategy(&self) -> &ProxyStrategy {
        &self.strategy
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }
}

impl LinkResolver for UrlResolver {
    fn resolve(&self, url: &str) -> impl Future<Output = Result<String, ResolveError>> + Send {
        resolve(url, &self.strategy, &self.options)
    }
}

/// Resolves `url` to the URL a browser would end up on.
///
/// The curl transfer runs on the blocking pool; each call is independent.
pub async fn resolve(
    url: &str,
    strategy: &ProxyStrategy,
    options: &ResolveOptions,
) -> Result<String, ResolveError> {
    let url = url.to_string();
    let strategy = strategy.clone();
    let options = options.clone();
    tokio::task::spawn_blocking(move || resolve_blocking(&url, &strategy, &options)).await?
}

/// Blocking form of [`resolve`].
pub fn resolve_blocking(
    url: &str,
    strategy: &ProxyStrategy,
    options: &ResolveOptions,
) -> Result<String, ResolveError> {
    strategy.validate()?;
    url::Url::parse(url).map_err(|source| ResolveError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    let final_url = match strategy {
        ProxyStrategy::None => resolve_following(url, None, options)?,
        ProxyStrategy::Socks5Tunnel(proxy) => {
            resolve_following(url, Some(proxy.trim()), options)?
        }
        ProxyStrategy::EdgeHttpProxy(base) => resolve_via_edge(url, base, options)?,
    };
    tracing::debug!(url, strategy = strategy.label(), final_url = %final_url, "resolved");
    Ok(final_url)
}

/// Direct or SOCKS5 path: let curl follow redirects, then check the page.
fn resolve_following(
    url: &str,
    socks5_proxy: Option<&str>,
    options: &ResolveOptions,
) -> Result<String, ResolveError> {
    let opts = FetchOptions {
        timeout: options.timeout,
        follow_redirects: true,
        max_redirects: options.max_redirects,
        validate_status: true,
        user_agent: options.user_agent.clone(),
        socks5_proxy: socks5_proxy.map(String::from),
        max_body_bytes: options.max_body_bytes,
    };
    let response = fetch::fetch(url, &opts)?;
    let landed = response
        .effective_url
        .clone()
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| url.to_string());
    Ok(with_html_overrides(landed, &response))
}

/// Edge path: no local redirects, any status accepted, trust the edge header.
fn resolve_via_edge(
    url: &str,
    base: &str,
    options: &ResolveOptions,
) -> Result<String, ResolveError> {
    let request_url = edge_request_url(base, url);
    let opts = FetchOptions {
        timeout: options.timeout,
        follow_redirects: false,
        max_redirects: 0,
        validate_status: false,
        user_agent: options.user_agent.clone(),
        socks5_proxy: None,
        max_body_bytes: options.max_body_bytes,
    };
    let response = fetch::fetch(&request_url, &opts)?;
    let reported = match response.header(&options.final_url_header) {
        Some(v) => v.to_string(),
        None => {
            tracing::debug!(
                url,
                status = response.status,
                header = %options.final_url_header,
                "edge response carried no final URL header"
            );
            url.to_string()
        }
    };
    Ok(with_html_overrides(reported, &response))
}

/// Edge endpoint for `url`: `base + "/" + url`, target left unencoded.
pub fn edge_request_url(base: &str, url: &str) -> String {
    format!("{}/{}", base.trim(), url)
}

fn with_html_overrides(initial: String, response: &FetchResponse) -> String {
    if !heuristics::is_textual(response.content_type.as_deref()) {
        return initial;
    }
    heuristics::apply_html_overrides(initial, &response.body_text())
}
