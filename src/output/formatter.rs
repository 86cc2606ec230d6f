//! Plain-text panel formatting

use crate::error::Result;
use crate::models::{Health, Snapshot};
use crate::output::{human_bytes, SnapshotFormatter};
use std::fmt::Write as _;
use std::time::Duration;

/// Configuration options for panel formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Polling interval, shown in the header
    pub interval: Duration,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(crate::defaults::DEFAULT_INTERVAL_MS),
        }
    }
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    pub(crate) fn health_label(health: Health) -> &'static str {
        match health {
            Health::Online => "ONLINE",
            Health::Degraded => "DEGRADED",
            Health::Offline => "OFFLINE",
        }
    }
}

impl SnapshotFormatter for PlainFormatter {
    fn format(&self, snapshot: &Snapshot) -> Result<String> {
        let mut out = String::new();

        writeln!(
            out,
            "NETPULSE  {}    interval: {:.1}s    [{}]",
            snapshot.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.options.interval.as_secs_f64(),
            Self::health_label(snapshot.health()),
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

        writeln!(out, "\nPING:").ok();
        for ping in &snapshot.pings {
            match (ping.outcome.value(), ping.outcome.failure()) {
                (Some(reply), _) => {
                    writeln!(
                        out,
                        "  {:<15}: OK    rtt={:>3} ms",
                        ping.target, reply.rtt_ms
                    )
                    .ok();
                }
                (_, Some(reason)) => {
                    writeln!(out, "  {:<15}: FAIL  {}", ping.target, reason).ok();
                }
                _ => unreachable!("outcome is Ok xor Failed"),
            }
        }

        writeln!(out, "\nDNS:").ok();
        match (snapshot.dns.outcome.value(), snapshot.dns.outcome.failure()) {
            (Some(resolved), _) => {
                writeln!(
                    out,
                    "  {:<15}: OK    {}",
                    snapshot.dns.hostname, resolved.address
                )
                .ok();
            }
            (_, Some(reason)) => {
                writeln!(out, "  {:<15}: FAIL  {}", snapshot.dns.hostname, reason).ok();
            }
            _ => unreachable!("outcome is Ok xor Failed"),
        }

        writeln!(out, "\nHTTPS:").ok();
        match (snapshot.http.outcome.value(), snapshot.http.outcome.failure()) {
            (Some(reply), _) => {
                writeln!(
                    out,
                    "  HEAD https://{}{} -> HTTP {}  (proxy: {})",
                    snapshot.http.host, snapshot.http.path, reply.status, reply.proxy
                )
                .ok();
                if reply.status == 401 {
                    writeln!(
                        out,
                        "  Note: HTTP 401 without a token still proves TLS and routing."
                    )
                    .ok();
                } else if !reply.is_reachable() {
                    writeln!(out, "  Note: status outside the reachable set.").ok();
                }
            }
            (_, Some(reason)) => {
                writeln!(out, "  ERROR: {}", reason).ok();
            }
            _ => unreachable!("outcome is Ok xor Failed"),
        }

        writeln!(out, "\nPress Ctrl+C to stop.").ok();

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DnsSample, HttpReply, HttpSample, PingReply, PingSample, ResolvedHost, ThroughputSample,
    };
    use crate::types::{ProbeOutcome, ProxyMode};
    use chrono::Local;

    fn snapshot() -> Snapshot {
        Snapshot {
            timestamp: Local::now(),
            primary_address: Some("192.168.1.23".to_string()),
            throughput: ThroughputSample {
                in_bps: 2048.0,
                out_bps: 512.0,
            },
            pings: vec![
                PingSample {
                    target: "1.1.1.1".parse().unwrap(),
                    outcome: ProbeOutcome::Ok(PingReply { rtt_ms: 12 }),
                },
                PingSample {
                    target: "8.8.8.8".parse().unwrap(),
                    outcome: ProbeOutcome::Failed("no reply from 8.8.8.8 within 1000 ms".into()),
                },
            ],
            dns: DnsSample {
                hostname: "api.openai.com".to_string(),
                outcome: ProbeOutcome::Ok(ResolvedHost {
                    address: "104.18.33.45".to_string(),
                }),
            },
            http: HttpSample {
                host: "api.openai.com".to_string(),
                path: "/v1/models".to_string(),
                outcome: ProbeOutcome::Ok(HttpReply {
                    status: 401,
                    proxy: ProxyMode::Direct,
                }),
            },
        }
    }

    #[test]
    fn test_panel_contains_every_section() {
        let formatter = PlainFormatter::new(FormattingOptions::default());
        let panel = formatter.format(&snapshot()).unwrap();

        assert!(panel.contains("NETPULSE"));
        assert!(panel.contains("IP: 192.168.1.23"));
        assert!(panel.contains("Throughput:"));
        assert!(panel.contains("2.0 KB/s"));
        assert!(panel.contains("PING:"));
        assert!(panel.contains("1.1.1.1"));
        assert!(panel.contains("rtt= 12 ms"));
        assert!(panel.contains("FAIL  no reply from 8.8.8.8"));
        assert!(panel.contains("DNS:"));
        assert!(panel.contains("104.18.33.45"));
        assert!(panel.contains("HTTPS:"));
        assert!(panel.contains("HTTP 401"));
        assert!(panel.contains("(proxy: Direct)"));
        assert!(panel.contains("Ctrl+C"));
    }

    #[test]
    fn test_panel_has_no_ansi_sequences() {
        let formatter = PlainFormatter::new(FormattingOptions::default());
        let panel = formatter.format(&snapshot()).unwrap();
        assert!(!panel.contains('\x1b'));
    }

    #[test]
    fn test_missing_primary_address_renders_dash() {
        let formatter = PlainFormatter::new(FormattingOptions::default());
        let mut snap = snapshot();
        snap.primary_address = None;
        let panel = formatter.format(&snap).unwrap();
        assert!(panel.contains("IP: -"));
    }

    #[test]
    fn test_http_failure_renders_error_line() {
        let formatter = PlainFormatter::new(FormattingOptions::default());
        let mut snap = snapshot();
        snap.http.outcome =
            ProbeOutcome::Failed("connect: connection refused (proxy: Direct)".into());
        let panel = formatter.format(&snap).unwrap();
        assert!(panel.contains("ERROR: connect: connection refused"));
    }

    #[test]
    fn test_degraded_health_in_header() {
        let formatter = PlainFormatter::new(FormattingOptions::default());
        let mut snap = snapshot();
        for ping in &mut snap.pings {
            ping.outcome = ProbeOutcome::Failed("filtered".into());
        }
        let panel = formatter.format(&snap).unwrap();
        assert!(panel.contains("[DEGRADED]"));
    }
}
