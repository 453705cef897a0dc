//! `linkres normalize [text]` – rewrite short links in text.

use anyhow::{Context, Result};
use linkres_core::config::LinkresConfig;
use linkres_core::UrlResolver;
use tokio::io::AsyncReadExt;

use crate::cli::StrategyArgs;

pub async fn run_normalize(cfg: &LinkresConfig, args: &StrategyArgs, text: &[String]) -> Result<()> {
    let input = if text.is_empty() {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("read text from stdin")?;
        buf
    } else {
        text.join(" ")
    };

    let normalizer = cfg.link_normalizer()?;
    let output = match args.strategy(cfg) {
        Ok(strategy) => {
            let resolver = UrlResolver::with_options(strategy, cfg.resolve_options());
            normalizer.normalize_text(&input, &resolver).await
        }
        Err(e) => {
            // Without a usable strategy the text passes through untouched.
            tracing::error!("{:#}; leaving links unresolved", e);
            input
        }
    };
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}
