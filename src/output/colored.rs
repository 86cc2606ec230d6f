//! Colored panel formatting

use crate::error::Result;
use crate::models::{Health, Snapshot};
use crate::output::formatter::{FormattingOptions, PlainFormatter};
use crate::output::{human_bytes, SnapshotFormatter};
use colored::Colorize;
use std::fmt::Write as _;

/// Colored formatter: same layout as the plain panel, with the
/// status markers colorized. Padding is applied before coloring so
/// escape sequences never skew column widths.
pub struct ColoredFormatter {
    options: FormattingOptions,
}

impl ColoredFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    fn health_badge(health: Health) -> String {
        let label = PlainFormatter::health_label(health);
        match health {
            Health::Online => label.green().bold().to_string(),
            Health::Degraded => label.yellow().bold().to_string(),
            Health::Offline => label.red().bold().to_string(),
        }
    }

    fn ok_marker() -> String {
        "OK".green().to_string()
    }

    fn fail_marker() -> String {
        "FAIL".red().to_string()
    }
}

impl SnapshotFormatter for ColoredFormatter {
    fn format(&self, snapshot: &Snapshot) -> Result<String> {
        let mut out = String::new();

        writeln!(
            out,
            "{}  {}    interval: {:.1}s    [{}]",
            "NETPULSE".cyan().bold(),
            snapshot.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.options.interval.as_secs_f64(),
            Self::health_badge(snapshot.health()),
        )
        .ok();
        writeln!(
            out,
            "IP: {}",
            snapshot.primary_address.as_deref().unwrap_or("-")
        )
        .ok();
        writeln!(
            out,
            "Throughput:  IN {:<12}  OUT {:<12}",
            human_bytes(snapshot.throughput.in_bps),
            human_bytes(snapshot.throughput.out_bps),
        )
        .ok();

        writeln!(out, "\n{}", "PING:".bold()).ok();
        for ping in &snapshot.pings {
            let target = format!("{:<15}", ping.target);
            match (ping.outcome.value(), ping.outcome.failure()) {
                (Some(reply), _) => {
                    writeln!(
                        out,
                        "  {}: {}    rtt={:>3} ms",
                        target,
                        Self::ok_marker(),
                        reply.rtt_ms
                    )
                    .ok();
                }
                (_, Some(reason)) => {
                    writeln!(out, "  {}: {}  {}", target, Self::fail_marker(), reason).ok();
                }
                _ => unreachable!("outcome is Ok xor Failed"),
            }
        }

        writeln!(out, "\n{}", "DNS:".bold()).ok();
        let hostname = format!("{:<15}", snapshot.dns.hostname);
        match (snapshot.dns.outcome.value(), snapshot.dns.outcome.failure()) {
            (Some(resolved), _) => {
                writeln!(
                    out,
                    "  {}: {}    {}",
                    hostname,
                    Self::ok_marker(),
                    resolved.address
                )
                .ok();
            }
            (_, Some(reason)) => {
                writeln!(out, "  {}: {}  {}", hostname, Self::fail_marker(), reason).ok();
            }
            _ => unreachable!("outcome is Ok xor Failed"),
        }

        writeln!(out, "\n{}", "HTTPS:".bold()).ok();
        match (snapshot.http.outcome.value(), snapshot.http.outcome.failure()) {
            (Some(reply), _) => {
                let status = if reply.is_reachable() {
                    format!("HTTP {}", reply.status).green().to_string()
                } else {
                    format!("HTTP {}", reply.status).red().to_string()
                };
                writeln!(
                    out,
                    "  HEAD https://{}{} -> {}  (proxy: {})",
                    snapshot.http.host, snapshot.http.path, status, reply.proxy
                )
                .ok();
                if reply.status == 401 {
                    writeln!(
                        out,
                        "  Note: HTTP 401 without a token still proves TLS and routing."
                    )
                    .ok();
                }
            }
            (_, Some(reason)) => {
                writeln!(out, "  {} {}", "ERROR:".red().bold(), reason).ok();
            }
            _ => unreachable!("outcome is Ok xor Failed"),
        }

        writeln!(out, "\nPress Ctrl+C to stop.").ok();

        Ok(out)
    }
}
