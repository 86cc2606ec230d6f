//! netpulse
//!
//! A terminal-resident network health monitor. On a fixed interval it
//! pings two hosts, resolves one hostname, issues a single HTTPS HEAD
//! probe and samples interface throughput, then redraws one status
//! panel summarizing all four signals plus the machine's primary
//! address.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod monitor;
pub mod output;
pub mod platform;
pub mod probes;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
pub use models::{DnsSample, HttpSample, PingSample, Snapshot, ThroughputSample};
pub use monitor::{Monitor, MonitorState};
pub use types::{ProbeOutcome, ProxyMode};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_PING_TARGETS: &[&str] = &[
        "1.1.1.1", // Cloudflare DNS
        "8.8.8.8", // Google DNS
    ];
    pub const DEFAULT_DNS_HOSTNAME: &str = "api.openai.com";
    pub const DEFAULT_HTTP_HOST: &str = "api.openai.com";
    pub const DEFAULT_HTTP_PATH: &str = "/v1/models";

    pub const DEFAULT_INTERVAL_MS: u64 = 2_000;
    /// Lower bound enforced on the polling interval.
    pub const MIN_INTERVAL_MS: u64 = 500;

    pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_millis(1_000);
    pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_DNS_TIMEOUT: Duration = Duration::from_secs(5);

    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
