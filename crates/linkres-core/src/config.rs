use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ResolveError;
use crate::normalize::{LinkNormalizer, DEFAULT_SHORT_LINK_PATTERN, DEFAULT_UNRESOLVABLE_PATTERNS};
use crate::strategy::{
    ProxyStrategy, ResolveOptions, DEFAULT_FINAL_URL_HEADER, DEFAULT_MAX_BODY_BYTES,
    DEFAULT_MAX_REDIRECTS, DEFAULT_USER_AGENT,
};

/// How requests leave this host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyMode {
    #[default]
    None,
    Socks5,
    Edge,
}

/// Proxy section in config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyConfig {
    #[serde(default)]
    pub mode: ProxyMode,
    /// SOCKS5 proxy URL (`socks5`) or edge base URL (`edge`).
    #[serde(default)]
    pub url: Option<String>,
}

/// Short-link patterns for `normalize` (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeConfig {
    pub short_link_pattern: String,
    #[serde(default)]
    pub unresolvable_patterns: Vec<String>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            short_link_pattern: DEFAULT_SHORT_LINK_PATTERN.to_string(),
            unresolvable_patterns: DEFAULT_UNRESOLVABLE_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

/// Global configuration loaded from `~/.config/linkres/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkresConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Redirect hop limit for direct and SOCKS5 requests.
    pub max_redirects: u32,
    pub user_agent: String,
    /// Response header the edge proxy reports the final URL in.
    pub final_url_header: String,
    /// Body bytes kept for HTML redirect hints.
    pub max_body_bytes: usize,
    #[serde(default)]
    pub proxy: ProxyConfig,
    /// Optional link patterns; if missing, built-in defaults are used.
    #[serde(default)]
    pub normalize: Option<NormalizeConfig>,
}

impl Default for LinkresConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            final_url_header: DEFAULT_FINAL_URL_HEADER.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            proxy: ProxyConfig::default(),
            normalize: None,
        }
    }
}

impl LinkresConfig {
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            max_redirects: self.max_redirects,
            user_agent: self.user_agent.clone(),
            final_url_header: self.final_url_header.clone(),
            max_body_bytes: self.max_body_bytes,
        }
    }

    /// Strategy from the `[proxy]` section. A mode without its URL is an error.
    pub fn proxy_strategy(&self) -> Result<ProxyStrategy, ResolveError> {
        let url = self.proxy.url.as_deref();
        match self.proxy.mode {
            ProxyMode::None => Ok(ProxyStrategy::None),
            ProxyMode::Socks5 => ProxyStrategy::socks5(url),
            ProxyMode::Edge => ProxyStrategy::edge(url),
        }
    }

    pub fn link_normalizer(&self) -> Result<LinkNormalizer, ResolveError> {
        match &self.normalize {
            Some(n) => LinkNormalizer::new(&n.short_link_pattern, &n.unresolvable_patterns),
            None => Ok(LinkNormalizer::default()),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("linkres")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<LinkresConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<LinkresConfig> {
    if !path.exists() {
        let default_cfg = LinkresConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: LinkresConfig = toml::from_str(&data)?;
    Ok(cfg)
}
