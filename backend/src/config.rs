//! Server configuration from command line flags with environment fallbacks.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "chilltrack-pod")]
#[command(about = "Proof-of-delivery photo extraction and scoring service")]
#[command(version)]
pub struct Config {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1", env = "POD_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "POD_PORT")]
    pub port: u16,

    /// SQLite database holding photo assets
    #[arg(long, default_value = "chilltrack.sqlite", env = "POD_DATABASE")]
    pub database: PathBuf,

    /// Base of carrier tracking links, used when only a token is supplied
    #[arg(long, default_value = "https://tracking.axylog.com", env = "POD_TRACKING_BASE_URL")]
    pub tracking_base_url: String,

    /// Timeout for tracking page and asset downloads
    #[arg(long, default_value = "20", env = "POD_FETCH_TIMEOUT_SECS")]
    pub fetch_timeout_secs: u64,

    #[arg(long, default_value = "chilltrack-pod/0.1", env = "POD_USER_AGENT")]
    pub user_agent: String,

    /// Download every classified asset and hash its content before marking it available
    #[arg(long, default_value_t = false, env = "POD_VERIFY_ASSETS")]
    pub verify_assets: bool,

    /// Maximum JSON request body in bytes
    #[arg(long, default_value = "10485760", env = "POD_JSON_LIMIT")]
    pub json_limit: usize,
}

impl Config {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn bind_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "chilltrack-pod",
            "--port",
            "9090",
            "--database",
            "/tmp/pod.sqlite",
            "--verify-assets",
        ])
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.database, PathBuf::from("/tmp/pod.sqlite"));
        assert!(config.verify_assets);
        assert_eq!(config.bind_url(), "http://127.0.0.1:9090");
        assert_eq!(config.fetch_timeout(), Duration::from_secs(20));
    }
}
