//! HTML redirect hints.
//!
//! Some interstitial pages finish their redirect with a meta-refresh tag or
//! client-side script instead of an HTTP 3xx, and some only expose the landing
//! URL in the page title. These regex checks recover those cases. They are
//! heuristics: a page whose title happens to be a URL will override the result.

use std::sync::LazyLock;

use regex::Regex;

static META_REFRESH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]*refresh[^>]*url=([^"'>\s]+)"#).expect("meta refresh pattern")
});

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<title[^>]*>([^<]+)</title>").expect("title pattern"));

/// True if the body should be scanned: textual content, or no content type at all.
pub fn is_textual(content_type: Option<&str>) -> bool {
    let Some(ct) = content_type else {
        return true;
    };
    let mime = ct
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime.starts_with("text/") || mime.contains("html") || mime.contains("xml")
}

/// Target of a `<meta ... refresh ... url=VALUE>` tag.
pub fn meta_refresh_target(body: &str) -> Option<&str> {
    META_REFRESH
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Trimmed `<title>` content when it starts with `http`.
pub fn title_url(body: &str) -> Option<&str> {
    let title = TITLE.captures(body)?.get(1)?.as_str().trim();
    title.starts_with("http").then_some(title)
}

/// Applies meta-refresh, then title; a later match overwrites an earlier one.
pub fn apply_html_overrides(initial: String, body: &str) -> String {
    let mut final_url = initial;
    if let Some(target) = meta_refresh_target(body) {
        tracing::debug!(refresh_url = target, "meta refresh override");
        final_url = target.to_string();
    }
    if let Some(title) = title_url(body) {
        tracing::debug!(title, "title override");
        final_url = title.to_string();
    }
    final_url
}
