//! Name-resolution probing.
//!
//! One lookup per call through the system-configured resolver. The
//! original imposed no bound of its own on resolution and inherited
//! whatever the platform resolver did; here the lookup is explicitly
//! bounded so a wedged resolver cannot stall the tick.

use crate::error::{AppError, Result};
use crate::models::ResolvedHost;
use crate::types::ProbeOutcome;
use std::time::Duration;
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::{system_conf, TokioAsyncResolver};

/// Resolves one hostname per call, bounded by an explicit timeout.
pub struct DnsProber {
    resolver: TokioAsyncResolver,
    timeout: Duration,
}

impl DnsProber {
    /// Build a prober over the system resolver configuration
    pub fn new(timeout: Duration) -> Result<Self> {
        let (config, opts) = system_conf::read_system_conf()
            .map_err(|e| AppError::resolver(format!("Failed to read system DNS config: {}", e)))?;
        let resolver = TokioAsyncResolver::tokio(config, opts);
        Ok(Self { resolver, timeout })
    }

    /// Build a prober over a specific resolver (used by tests)
    pub fn with_resolver(resolver: TokioAsyncResolver, timeout: Duration) -> Self {
        Self { resolver, timeout }
    }

    /// Resolve a hostname to its first address, either family.
    pub async fn resolve(&self, hostname: &str) -> ProbeOutcome<ResolvedHost> {
        ProbeOutcome::from_result(self.lookup(hostname).await)
    }

    async fn lookup(&self, hostname: &str) -> Result<ResolvedHost> {
        let lookup = tokio::time::timeout(self.timeout, self.resolver.lookup_ip(hostname))
            .await
            .map_err(|_| {
                AppError::timeout(format!(
                    "resolution of {} timed out after {} s",
                    hostname,
                    self.timeout.as_secs()
                ))
            })?
            .map_err(describe_resolve_error)?;

        // First address returned, regardless of family mix.
        let address = lookup
            .iter()
            .next()
            .ok_or_else(|| AppError::resolver(format!("no usable address for {}", hostname)))?;

        Ok(ResolvedHost {
            address: address.to_string(),
        })
    }
}

/// Keep the resolver's numeric response code visible in the reason
/// string when the error carries one.
fn describe_resolve_error(error: ResolveError) -> AppError {
    match error.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => AppError::resolver(format!(
            "no records found (response code {})",
            response_code
        )),
        _ => AppError::resolver(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use std::time::Instant;
    use trust_dns_resolver::config::{
        NameServerConfig, Protocol, ResolverConfig, ResolverOpts,
    };

    /// Resolver pointed at an unroutable TEST-NET address
    fn blackhole_resolver() -> TokioAsyncResolver {
        let mut config = ResolverConfig::new();
        config.add_name_server(NameServerConfig::new(
            SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)), 53),
            Protocol::Udp,
        ));
        let mut opts = ResolverOpts::default();
        opts.attempts = 1;
        opts.timeout = Duration::from_secs(30);
        TokioAsyncResolver::tokio(config, opts)
    }

    #[tokio::test]
    async fn test_ip_literal_resolves_without_network() {
        let prober = DnsProber::with_resolver(blackhole_resolver(), Duration::from_secs(5));
        let outcome = prober.resolve("127.0.0.1").await;
        assert_eq!(
            outcome.value(),
            Some(&ResolvedHost {
                address: "127.0.0.1".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_ipv6_literal_formats_as_text() {
        let prober = DnsProber::with_resolver(blackhole_resolver(), Duration::from_secs(5));
        let outcome = prober.resolve("::1").await;
        assert_eq!(
            outcome.value(),
            Some(&ResolvedHost {
                address: "::1".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_lookup_is_bounded_by_explicit_timeout() {
        // The resolver's own timeout is set far above ours; the
        // explicit bound has to fire (or the unroutable server fails
        // fast, which is equally acceptable).
        let prober = DnsProber::with_resolver(blackhole_resolver(), Duration::from_millis(500));

        let started = Instant::now();
        let outcome = prober.resolve("host.invalid").await;

        assert!(!outcome.is_ok());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_failure_reason_is_populated() {
        let prober = DnsProber::with_resolver(blackhole_resolver(), Duration::from_millis(500));
        let outcome = prober.resolve("host.invalid").await;
        let reason = outcome.failure().unwrap();
        assert!(!reason.is_empty());
    }
}
