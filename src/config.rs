//! Command-line and environment configuration.

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Runtime settings. Each flag can also come from its environment variable.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Address to listen on, as `host:port`.
    #[arg(long, env = "DOCKET_ADDR", default_value = "0.0.0.0:8000")]
    pub addr: String,

    /// Log filter used when `RUST_LOG` is not set (e.g. `info`, `docket=debug`).
    #[arg(long, env = "DOCKET_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// `RUST_LOG` wins; otherwise `--log-level`, falling back to `info` if
    /// that does not parse.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.log_level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}
