use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

use crate::registry::SportRegistry;

/// Spoiler-free "is this game worth watching?" service
#[derive(Parser, Debug, Clone)]
#[command(name = "worth-watching", version, about)]
pub struct Config {
    /// HTTP listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:5000")]
    pub listen_addr: String,

    /// Base URL of the ESPN site API; each sport appends `<sport>/<league>/scoreboard`
    #[arg(
        long,
        env = "ESPN_BASE_URL",
        default_value = "https://site.api.espn.com/apis/site/v2/sports"
    )]
    pub espn_base_url: String,

    /// Upstream request timeout in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value = "10")]
    pub upstream_timeout_secs: u64,

    /// Extra attempts after a transient upstream failure (timeouts, 5xx)
    #[arg(long, env = "UPSTREAM_RETRIES", default_value = "1")]
    pub upstream_retries: u32,

    /// Sport used by /api/games when the request names none
    #[arg(long, env = "DEFAULT_SPORT", default_value = "nba")]
    pub default_sport: String,
}

impl Config {
    pub fn validate(&self, registry: &SportRegistry) -> anyhow::Result<()> {
        self.listen_addr
            .parse::<SocketAddr>()
            .map_err(|e| anyhow::anyhow!("invalid listen_addr '{}': {}", self.listen_addr, e))?;

        let base = url::Url::parse(&self.espn_base_url)
            .map_err(|e| anyhow::anyhow!("invalid espn_base_url '{}': {}", self.espn_base_url, e))?;
        if !matches!(base.scheme(), "http" | "https") {
            anyhow::bail!("espn_base_url must be an http(s) URL");
        }

        if !(1..=120).contains(&self.upstream_timeout_secs) {
            anyhow::bail!("upstream_timeout_secs must be between 1 and 120");
        }
        if self.upstream_retries > 5 {
            anyhow::bail!("upstream_retries must be at most 5");
        }
        if !registry.contains(&self.default_sport) {
            anyhow::bail!("default_sport '{}' is not a registered sport", self.default_sport);
        }
        Ok(())
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}
