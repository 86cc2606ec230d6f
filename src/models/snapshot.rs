//! Per-tick sample and snapshot data models

use crate::probes::http::REACHABLE_STATUS;
use crate::types::{ProbeOutcome, ProxyMode};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Successful ICMP echo payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingReply {
    /// Round-trip time in milliseconds as reported by the echo facility
    pub rtt_ms: u64,
}

/// One ICMP reachability sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingSample {
    pub target: Ipv4Addr,
    pub outcome: ProbeOutcome<PingReply>,
}

/// Successful name-resolution payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedHost {
    /// First address returned by the resolver, either family, as text
    pub address: String,
}

/// One name-resolution sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnsSample {
    pub hostname: String,
    pub outcome: ProbeOutcome<ResolvedHost>,
}

/// Successful HTTPS probe payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpReply {
    /// Numeric HTTP status code received
    pub status: u16,
    /// Proxy mode in effect for the session
    pub proxy: ProxyMode,
}

impl HttpReply {
    /// Whether the status code proves the remote answered the
    /// application protocol. 401/403/404 count: the handshake and
    /// routing succeeded even though the request itself was refused.
    pub fn is_reachable(&self) -> bool {
        REACHABLE_STATUS.contains(&self.status)
    }
}

/// One endpoint-health sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpSample {
    pub host: String,
    pub path: String,
    pub outcome: ProbeOutcome<HttpReply>,
}

/// Aggregate interface throughput for one polling interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThroughputSample {
    pub in_bps: f64,
    pub out_bps: f64,
}

impl ThroughputSample {
    pub const ZERO: ThroughputSample = ThroughputSample {
        in_bps: 0.0,
        out_bps: 0.0,
    };
}

impl Default for ThroughputSample {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Overall health classification derived from a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Health {
    /// Everything required is answering
    Online,
    /// Service reachable but ICMP blocked, or vice versa
    Degraded,
    /// DNS or the primary endpoint is failing
    Offline,
}

/// Immutable per-tick value handed to the renderer.
///
/// Fully populated before the handoff; the renderer must not retain
/// references into it past the call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Local>,
    /// Outward-facing IPv4 address, if one could be determined
    pub primary_address: Option<String>,
    pub throughput: ThroughputSample,
    pub pings: Vec<PingSample>,
    pub dns: DnsSample,
    pub http: HttpSample,
}

impl Snapshot {
    /// Classify the overall connection state.
    ///
    /// DNS failure or an unreachable primary endpoint means offline;
    /// an answering endpoint with every ping failing is degraded
    /// (ICMP may simply be filtered).
    pub fn health(&self) -> Health {
        let ping_ok = self.pings.iter().any(|p| p.outcome.is_ok());
        let dns_ok = self.dns.outcome.is_ok();
        let http_ok = self
            .http
            .outcome
            .value()
            .map(|reply| reply.is_reachable())
            .unwrap_or(false);

        if !dns_ok || !http_ok {
            if ping_ok {
                Health::Degraded
            } else {
                Health::Offline
            }
        } else if !ping_ok {
            Health::Degraded
        } else {
            Health::Online
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ping_ok(target: &str, rtt_ms: u64) -> PingSample {
        PingSample {
            target: target.parse().unwrap(),
            outcome: ProbeOutcome::Ok(PingReply { rtt_ms }),
        }
    }

    fn ping_failed(target: &str, reason: &str) -> PingSample {
        PingSample {
            target: target.parse().unwrap(),
            outcome: ProbeOutcome::Failed(reason.to_string()),
        }
    }

    fn sample_snapshot(pings: Vec<PingSample>, dns_ok: bool, http_status: Option<u16>) -> Snapshot {
        Snapshot {
            timestamp: Local::now(),
            primary_address: Some("192.168.1.10".to_string()),
            throughput: ThroughputSample::ZERO,
            pings,
            dns: DnsSample {
                hostname: "api.openai.com".to_string(),
                outcome: if dns_ok {
                    ProbeOutcome::Ok(ResolvedHost {
                        address: "104.18.33.45".to_string(),
                    })
                } else {
                    ProbeOutcome::Failed("resolution timed out after 5s".to_string())
                },
            },
            http: HttpSample {
                host: "api.openai.com".to_string(),
                path: "/v1/models".to_string(),
                outcome: match http_status {
                    Some(status) => ProbeOutcome::Ok(HttpReply {
                        status,
                        proxy: ProxyMode::Direct,
                    }),
                    None => ProbeOutcome::Failed("send: connection refused".to_string()),
                },
            },
        }
    }

    #[test]
    fn test_reachability_classification() {
        let reachable = HttpReply {
            status: 401,
            proxy: ProxyMode::Direct,
        };
        assert!(reachable.is_reachable());

        let unreachable = HttpReply {
            status: 500,
            proxy: ProxyMode::Direct,
        };
        assert!(!unreachable.is_reachable());
    }

    #[test]
    fn test_health_online() {
        let snapshot = sample_snapshot(vec![ping_ok("1.1.1.1", 12)], true, Some(401));
        assert_eq!(snapshot.health(), Health::Online);
    }

    #[test]
    fn test_health_degraded_when_icmp_blocked() {
        let snapshot = sample_snapshot(
            vec![ping_failed("1.1.1.1", "no reply within 1000 ms")],
            true,
            Some(200),
        );
        assert_eq!(snapshot.health(), Health::Degraded);
    }

    #[test]
    fn test_health_offline_on_dns_failure() {
        let snapshot = sample_snapshot(
            vec![ping_failed("1.1.1.1", "no reply within 1000 ms")],
            false,
            Some(200),
        );
        assert_eq!(snapshot.health(), Health::Offline);
    }

    #[test]
    fn test_health_degraded_when_endpoint_down_but_pings_answer() {
        let snapshot = sample_snapshot(vec![ping_ok("8.8.8.8", 9)], true, None);
        assert_eq!(snapshot.health(), Health::Degraded);
    }

    #[test]
    fn test_failed_sample_has_no_payload() {
        let sample = ping_failed("8.8.8.8", "capability unavailable");
        assert!(sample.outcome.value().is_none());
        assert_eq!(sample.outcome.failure(), Some("capability unavailable"));
    }

    #[test]
    fn test_snapshot_serializes() {
        let snapshot = sample_snapshot(vec![ping_ok("1.1.1.1", 3)], true, Some(200));
        let json = serde_json::to_string_pretty(&snapshot).unwrap();
        assert!(json.contains("1.1.1.1"));
        assert!(json.contains("api.openai.com"));
        assert!(json.contains("rtt_ms"));
    }
}
