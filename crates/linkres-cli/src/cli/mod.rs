//! CLI for the linkres URL resolver.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use linkres_core::config::{self, LinkresConfig};
use linkres_core::ProxyStrategy;

use commands::{run_normalize, run_resolve};

/// Top-level CLI for linkres.
#[derive(Debug, Parser)]
#[command(name = "linkres")]
#[command(about = "linkres: resolve short and redirecting URLs to their final destination", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Strategy overrides shared by all commands. Without them, `[proxy]` from config.toml applies.
#[derive(Debug, Clone, Args)]
pub struct StrategyArgs {
    /// Route requests through a SOCKS5 tunnel (socks5://[user:pass@]host:port).
    #[arg(long, value_name = "PROXY_URL", conflicts_with_all = ["edge", "direct"])]
    pub socks5: Option<String>,

    /// Delegate resolution to an edge proxy at BASE_URL.
    #[arg(long, value_name = "BASE_URL", conflicts_with = "direct")]
    pub edge: Option<String>,

    /// Ignore the configured proxy and connect directly.
    #[arg(long)]
    pub direct: bool,

    /// Per-request timeout in seconds (overrides config).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl StrategyArgs {
    /// Flags first, config second.
    pub fn strategy(&self, cfg: &LinkresConfig) -> Result<ProxyStrategy> {
        if self.direct {
            return Ok(ProxyStrategy::None);
        }
        if let Some(proxy) = &self.socks5 {
            return Ok(ProxyStrategy::socks5(Some(proxy.as_str()))?);
        }
        if let Some(base) = &self.edge {
            return Ok(ProxyStrategy::edge(Some(base.as_str()))?);
        }
        Ok(cfg.proxy_strategy()?)
    }

    pub fn apply_to(&self, cfg: &mut LinkresConfig) {
        if let Some(secs) = self.timeout {
            cfg.timeout_secs = secs;
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print the final destination of a URL.
    Resolve {
        /// Absolute URL to resolve.
        url: String,

        #[command(flatten)]
        strategy: StrategyArgs,
    },

    /// Rewrite short links in text with their destinations.
    Normalize {
        /// Text to rewrite; read from stdin when omitted.
        text: Vec<String>,

        #[command(flatten)]
        strategy: StrategyArgs,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Resolve { url, strategy } => {
                strategy.apply_to(&mut cfg);
                run_resolve(&cfg, &strategy, &url).await?;
            }
            CliCommand::Normalize { text, strategy } => {
                strategy.apply_to(&mut cfg);
                run_normalize(&cfg, &strategy, &text).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
