//! `linkres resolve <url>` – print the final destination.

use anyhow::{Context, Result};
use linkres_core::config::LinkresConfig;
use linkres_core::resolve;

use crate::cli::StrategyArgs;

pub async fn run_resolve(cfg: &LinkresConfig, args: &StrategyArgs, url: &str) -> Result<()> {
    let strategy = args.strategy(cfg)?;
    tracing::info!(url, strategy = strategy.label(), "resolve");
    let final_url = resolve(url, &strategy, &cfg.resolve_options())
        .await
        .with_context(|| format!("resolve {url}"))?;
    println!("{final_url}");
    Ok(())
}
