//! Configuration model, validation and CLI/environment merging

use crate::{
    cli::Cli,
    defaults,
    error::{AppError, Result},
};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IPv4 targets for the ICMP reachability probe
    #[serde(default = "default_ping_targets")]
    pub ping_targets: Vec<String>,

    /// Hostname for the name-resolution probe
    #[serde(default = "default_dns_hostname")]
    pub dns_hostname: String,

    /// Host for the HTTPS endpoint probe
    #[serde(default = "default_http_host")]
    pub http_host: String,

    /// Path for the HTTPS endpoint probe
    #[serde(default = "default_http_path")]
    pub http_path: String,

    /// Scheme for the endpoint probe ("https" normally; "http" is
    /// accepted for local testing)
    #[serde(default = "default_http_scheme")]
    pub http_scheme: String,

    /// Explicit proxy URL for the endpoint probe, if any
    #[serde(default)]
    pub proxy_url: Option<String>,

    /// Polling interval in milliseconds (floored at 500)
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Echo-reply wait bound in milliseconds
    #[serde(default = "default_ping_timeout_ms")]
    pub ping_timeout_ms: u64,

    /// Endpoint probe timeout in seconds (connect and total)
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_seconds: u64,

    /// Name-resolution timeout in seconds
    #[serde(default = "default_dns_timeout_secs")]
    pub dns_timeout_seconds: u64,

    /// Number of ticks to run; 0 means until cancelled
    #[serde(default)]
    pub tick_count: u32,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Skip screen clearing and colors entirely
    #[serde(default)]
    pub plain: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,

    /// Where to write the latest snapshot as JSON, if anywhere
    #[serde(default)]
    pub status_file: Option<String>,

    /// Where to append the run log, if anywhere
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ping_targets: default_ping_targets(),
            dns_hostname: default_dns_hostname(),
            http_host: default_http_host(),
            http_path: default_http_path(),
            http_scheme: default_http_scheme(),
            proxy_url: None,
            interval_ms: default_interval_ms(),
            ping_timeout_ms: default_ping_timeout_ms(),
            http_timeout_seconds: default_http_timeout_secs(),
            dns_timeout_seconds: default_dns_timeout_secs(),
            tick_count: 0,
            enable_color: default_enable_color(),
            plain: false,
            verbose: false,
            debug: false,
            status_file: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Polling interval as a Duration
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Echo-reply wait bound as a Duration
    pub fn ping_timeout(&self) -> Duration {
        Duration::from_millis(self.ping_timeout_ms)
    }

    /// Endpoint probe timeout as a Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    /// Name-resolution timeout as a Duration
    pub fn dns_timeout(&self) -> Duration {
        Duration::from_secs(self.dns_timeout_seconds)
    }

    /// The ping targets parsed as IPv4 addresses.
    ///
    /// The reachability prober takes dotted-decimal IPv4 literals only
    /// (it does not resolve hostnames); validation happens here, on
    /// the caller's side of that contract.
    pub fn ping_addrs(&self) -> Result<Vec<Ipv4Addr>> {
        self.ping_targets
            .iter()
            .map(|target| {
                Ipv4Addr::from_str(target).map_err(|e| {
                    AppError::config(format!("Invalid ping target '{}': {}", target, e))
                })
            })
            .collect()
    }

    /// Enforce the interval floor, returning the pre-clamp value when
    /// a clamp happened so the caller can warn about it.
    pub fn clamp_interval(&mut self) -> Option<u64> {
        if self.interval_ms < defaults::MIN_INTERVAL_MS {
            let requested = self.interval_ms;
            self.interval_ms = defaults::MIN_INTERVAL_MS;
            Some(requested)
        } else {
            None
        }
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.ping_targets.is_empty() {
            return Err(AppError::config("At least one ping target is required"));
        }
        self.ping_addrs()?;

        if self.dns_hostname.is_empty() {
            return Err(AppError::config("DNS hostname cannot be empty"));
        }

        if self.http_host.is_empty() {
            return Err(AppError::config("HTTP host cannot be empty"));
        }

        if !self.http_path.starts_with('/') {
            return Err(AppError::config(format!(
                "HTTP path must start with '/': {}",
                self.http_path
            )));
        }

        match self.http_scheme.as_str() {
            "http" | "https" => {}
            scheme => {
                return Err(AppError::config(format!(
                    "Unsupported probe scheme: {}",
                    scheme
                )))
            }
        }

        if let Some(ref proxy) = self.proxy_url {
            url::Url::parse(proxy)
                .map_err(|e| AppError::config(format!("Invalid proxy URL '{}': {}", proxy, e)))?;
        }

        if self.interval_ms < defaults::MIN_INTERVAL_MS {
            return Err(AppError::config(format!(
                "Polling interval must be at least {} ms",
                defaults::MIN_INTERVAL_MS
            )));
        }

        if self.ping_timeout_ms == 0 {
            return Err(AppError::config("Ping timeout must be greater than 0"));
        }

        if self.http_timeout_seconds == 0 || self.http_timeout_seconds > 300 {
            return Err(AppError::config(
                "HTTP timeout must be between 1 and 300 seconds",
            ));
        }

        if self.dns_timeout_seconds == 0 || self.dns_timeout_seconds > 300 {
            return Err(AppError::config(
                "DNS timeout must be between 1 and 300 seconds",
            ));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(targets) = std::env::var("NETPULSE_TARGETS") {
            self.ping_targets = targets
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(hostname) = std::env::var("NETPULSE_DNS_HOST") {
            self.dns_hostname = hostname;
        }

        if let Ok(host) = std::env::var("NETPULSE_HTTP_HOST") {
            self.http_host = host;
        }

        if let Ok(path) = std::env::var("NETPULSE_HTTP_PATH") {
            self.http_path = path;
        }

        if let Ok(interval) = std::env::var("NETPULSE_INTERVAL_MS") {
            self.interval_ms = interval.parse().map_err(|e| {
                AppError::config(format!("Invalid NETPULSE_INTERVAL_MS '{}': {}", interval, e))
            })?;
        }

        if let Ok(proxy) = std::env::var("NETPULSE_PROXY") {
            self.proxy_url = Some(proxy);
        }

        if let Ok(status_file) = std::env::var("NETPULSE_STATUS_FILE") {
            self.status_file = Some(status_file);
        }

        if let Ok(enable_color) = std::env::var("NETPULSE_COLOR") {
            self.enable_color = enable_color.parse().map_err(|e| {
                AppError::config(format!("Invalid NETPULSE_COLOR '{}': {}", enable_color, e))
            })?;
        }

        Ok(())
    }
}

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration.
    ///
    /// Precedence, lowest to highest: built-in defaults, `.env` file,
    /// process environment, CLI flags. The interval floor is applied
    /// after all overrides, mirroring the original's clamp of its
    /// interval argument.
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        // Load .env if present; absence is not an error
        dotenv::dotenv().ok();

        config.merge_from_env()?;
        self.apply_cli_overrides(&mut config);

        if let Some(requested) = config.clamp_interval() {
            eprintln!(
                "Warning: interval {} ms below the {} ms floor, clamped",
                requested,
                defaults::MIN_INTERVAL_MS
            );
        }

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if !self.cli.targets.is_empty() {
            config.ping_targets = self.cli.targets.clone();
        }

        if let Some(ref hostname) = self.cli.dns_host {
            config.dns_hostname = hostname.clone();
        }

        if let Some(ref host) = self.cli.http_host {
            config.http_host = host.clone();
        }

        if let Some(ref path) = self.cli.http_path {
            config.http_path = path.clone();
        }

        if let Some(ref scheme) = self.cli.http_scheme {
            config.http_scheme = scheme.clone();
        }

        if let Some(ref proxy) = self.cli.proxy {
            config.proxy_url = Some(proxy.clone());
        }

        if let Some(interval) = self.cli.interval {
            config.interval_ms = interval;
        }

        if let Some(timeout) = self.cli.ping_timeout {
            config.ping_timeout_ms = timeout;
        }

        if let Some(timeout) = self.cli.http_timeout {
            config.http_timeout_seconds = timeout;
        }

        if let Some(timeout) = self.cli.dns_timeout {
            config.dns_timeout_seconds = timeout;
        }

        if let Some(count) = self.cli.count {
            config.tick_count = count;
        }

        if self.cli.no_color {
            config.enable_color = false;
        }
        if self.cli.color {
            config.enable_color = true;
        }

        config.plain = self.cli.plain;
        if config.plain {
            config.enable_color = false;
        }

        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if let Some(ref status_file) = self.cli.status_file {
            config.status_file = Some(status_file.clone());
        }

        if let Some(ref log_file) = self.cli.log_file {
            config.log_file = Some(log_file.clone());
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    let parser = ConfigParser::new(cli);
    parser.parse()
}

// Default value functions for serde
fn default_ping_targets() -> Vec<String> {
    crate::defaults::DEFAULT_PING_TARGETS
        .iter()
        .map(|&s| s.to_string())
        .collect()
}

fn default_dns_hostname() -> String {
    crate::defaults::DEFAULT_DNS_HOSTNAME.to_string()
}

fn default_http_host() -> String {
    crate::defaults::DEFAULT_HTTP_HOST.to_string()
}

fn default_http_path() -> String {
    crate::defaults::DEFAULT_HTTP_PATH.to_string()
}

fn default_http_scheme() -> String {
    "https".to_string()
}

fn default_interval_ms() -> u64 {
    crate::defaults::DEFAULT_INTERVAL_MS
}

fn default_ping_timeout_ms() -> u64 {
    crate::defaults::DEFAULT_PING_TIMEOUT.as_millis() as u64
}

fn default_http_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_HTTP_TIMEOUT.as_secs()
}

fn default_dns_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_DNS_TIMEOUT.as_secs()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
