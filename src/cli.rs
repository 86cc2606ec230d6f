//! Command-line interface

use clap::{ArgAction, Parser};

/// netpulse - a terminal-resident network health monitor
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "netpulse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Polling interval in milliseconds (floor 500)
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// IPv4 target for the ICMP probe (can be used multiple times)
    #[arg(short = 't', long = "target", action = ArgAction::Append)]
    pub targets: Vec<String>,

    /// Hostname for the DNS probe
    #[arg(long)]
    pub dns_host: Option<String>,

    /// Host for the HTTPS endpoint probe
    #[arg(long)]
    pub http_host: Option<String>,

    /// Path for the HTTPS endpoint probe
    #[arg(long)]
    pub http_path: Option<String>,

    /// Scheme for the endpoint probe (https or http)
    #[arg(long, value_parser = ["http", "https"])]
    pub http_scheme: Option<String>,

    /// Explicit proxy URL for the endpoint probe
    #[arg(long)]
    pub proxy: Option<String>,

    /// Echo-reply wait bound in milliseconds
    #[arg(long)]
    pub ping_timeout: Option<u64>,

    /// Endpoint probe timeout in seconds
    #[arg(long)]
    pub http_timeout: Option<u64>,

    /// Name-resolution timeout in seconds
    #[arg(long)]
    pub dns_timeout: Option<u64>,

    /// Number of ticks to run before exiting (0 = until Ctrl+C)
    #[arg(short, long)]
    pub count: Option<u32>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// No screen clearing and no colors (log-friendly output)
    #[arg(long)]
    pub plain: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Write the latest snapshot as JSON to this path after every tick
    #[arg(long, value_name = "PATH")]
    pub status_file: Option<String>,

    /// Append a run log (start/stop markers, one STATUS line per tick)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<String>,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if self.color && self.plain {
            return Err("Cannot specify both --color and --plain".to_string());
        }

        if let Some(0) = self.ping_timeout {
            return Err("--ping-timeout must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color || self.plain {
            false
        } else {
            supports_color()
        }
    }
}

/// Detect whether the terminal likely supports colored output
fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    match std::env::var("TERM") {
        Ok(term) => term != "dumb",
        Err(_) => false,
    }
}
