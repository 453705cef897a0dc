//! Short-link rewriting in free text.
//!
//! Finds short links, resolves each distinct one once, and substitutes every
//! occurrence with its destination. A link that fails to resolve is left as it
//! was; siblings in the same text are still rewritten.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::ResolveError;
use crate::resolver::LinkResolver;

pub const DEFAULT_SHORT_LINK_PATTERN: &str = r"https://t\.co/[a-zA-Z0-9]+";

/// Short links known to sit behind bot challenges; reported, never resolved.
pub const DEFAULT_UNRESOLVABLE_PATTERNS: &[&str] = &[r"https?://buff\.ly/[a-zA-Z0-9]+"];

static DEFAULT_SHORT_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_SHORT_LINK_PATTERN).expect("short link pattern"));

static DEFAULT_UNRESOLVABLE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DEFAULT_UNRESOLVABLE_PATTERNS
        .iter()
        .map(|p| Regex::new(p).expect("unresolvable link pattern"))
        .collect()
});

#[derive(Debug, Clone)]
pub struct LinkNormalizer {
    short_link: Regex,
    unresolvable: Vec<Regex>,
}

impl Default for LinkNormalizer {
    fn default() -> Self {
        Self {
            short_link: DEFAULT_SHORT_LINK.clone(),
            unresolvable: DEFAULT_UNRESOLVABLE.clone(),
        }
    }
}

impl LinkNormalizer {
    /// Builds a normalizer from user-supplied patterns.
    pub fn new(short_link_pattern: &str, unresolvable: &[String]) -> Result<Self, ResolveError> {
        let compile = |p: &str| {
            Regex::new(p).map_err(|e| {
                ResolveError::Configuration(format!("invalid link pattern {p:?}: {e}"))
            })
        };
        Ok(Self {
            short_link: compile(short_link_pattern)?,
            unresolvable: unresolvable
                .iter()
                .map(|p| compile(p))
                .collect::<Result<_, _>>()?,
        })
    }

    /// Distinct short links in order of first appearance.
    pub fn short_links<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let mut seen = Vec::new();
        for m in self.short_link.find_iter(text) {
            if !seen.contains(&m.as_str()) {
                seen.push(m.as_str());
            }
        }
        seen
    }

    /// Links matching the unresolvable patterns.
    pub fn unresolvable_links<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.unresolvable
            .iter()
            .flat_map(|re| re.find_iter(text).map(|m| m.as_str()))
            .collect()
    }

    /// Rewrites every short link in `text` with its resolved destination.
    ///
    /// Returns `text` unchanged when it holds no short links.
    pub async fn normalize_text<R: LinkResolver>(&self, text: &str, resolver: &R) -> String {
        let skipped = self.unresolvable_links(text);
        if !skipped.is_empty() {
            tracing::warn!(
                "found {} short link(s) that cannot be auto-resolved",
                skipped.len()
            );
            for link in &skipped {
                tracing::warn!(link, "left unresolved");
            }
        }

        let links = self.short_links(text);
        if links.is_empty() {
            return text.to_string();
        }

        let mut resolved: HashMap<&str, String> = HashMap::with_capacity(links.len());
        for link in links {
            match resolver.resolve(link).await {
                Ok(final_url) => {
                    tracing::info!("{} -> {}", link, final_url);
                    resolved.insert(link, final_url);
                }
                Err(e) => {
                    tracing::warn!(link, error = %e, "failed to resolve; keeping original link");
                }
            }
        }

        self.short_link
            .replace_all(text, |caps: &Captures<'_>| {
                let link = &caps[0];
                resolved
                    .get(link)
                    .cloned()
                    .unwrap_or_else(|| link.to_string())
            })
            .into_owned()
    }
}
