//! ICMP reachability probing via the system `ping` utility.
//!
//! Raw ICMP sockets need elevated privileges; delegating to the
//! platform's `ping` binary sidesteps that, at the cost of an
//! optional capability: the binary may be absent. The capability is
//! resolved once at process start and injected here; when it is
//! missing every probe fails immediately without spending its timeout.

use crate::error::{AppError, Result};
use crate::models::PingReply;
use crate::types::ProbeOutcome;
use regex::Regex;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Extra wait on top of ping's own timeout before the child is
/// declared hung and killed.
const GUARD_GRACE: Duration = Duration::from_millis(500);

/// The echo capability, resolved once at process start.
#[derive(Debug, Clone)]
pub struct IcmpCapability {
    ping_path: Option<PathBuf>,
}

impl IcmpCapability {
    /// Locate the `ping` executable on PATH
    pub fn detect() -> Self {
        Self {
            ping_path: find_ping(),
        }
    }

    /// A capability pointing at a specific executable
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            ping_path: Some(path.into()),
        }
    }

    /// A permanently unavailable capability
    pub fn unavailable() -> Self {
        Self { ping_path: None }
    }

    /// Whether echo probing is possible at all
    pub fn available(&self) -> bool {
        self.ping_path.is_some()
    }

    fn path(&self) -> Option<&Path> {
        self.ping_path.as_deref()
    }
}

fn find_ping() -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join("ping"))
        .find(|candidate| candidate.is_file())
}

/// Sends one echo request per call against one IPv4 target.
///
/// The target must be a dotted-decimal IPv4 literal; the prober does
/// not resolve hostnames (validation is the caller's job). One
/// transient child process per call, reaped on every path; no retry.
pub struct PingProber {
    capability: IcmpCapability,
    timeout: Duration,
    rtt_pattern: Regex,
}

impl PingProber {
    pub fn new(capability: IcmpCapability, timeout: Duration) -> Self {
        Self {
            capability,
            timeout,
            // "time=12.3 ms", "time=23 ms", or the sub-millisecond
            // "time<1 ms" form
            rtt_pattern: Regex::new(r"time[=<]\s*([0-9]+(?:\.[0-9]+)?)\s*ms")
                .expect("static pattern compiles"),
        }
    }

    /// Probe one target, bounded by the configured timeout.
    pub async fn probe(&self, target: Ipv4Addr) -> ProbeOutcome<PingReply> {
        if !self.capability.available() {
            // Fail without spending any timeout.
            return ProbeOutcome::Failed("capability unavailable: no ping executable".to_string());
        }
        ProbeOutcome::from_result(self.run_ping(target).await)
    }

    async fn run_ping(&self, target: Ipv4Addr) -> Result<PingReply> {
        let ping = self
            .capability
            .path()
            .ok_or_else(|| AppError::capability("no ping executable"))?;

        let started = Instant::now();
        let mut command = Command::new(ping);
        self.apply_args(&mut command, target);
        command.kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout + GUARD_GRACE, command.output())
            .await
            .map_err(|_| {
                AppError::timeout(format!(
                    "no reply from {} within {} ms",
                    target,
                    self.timeout.as_millis()
                ))
            })?
            .map_err(|e| AppError::transport(format!("failed to run ping: {}", e)))?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            if stderr.is_empty() {
                return Err(AppError::timeout(format!(
                    "no reply from {} within {} ms (ping exit status {})",
                    target,
                    self.timeout.as_millis(),
                    code
                )));
            }
            return Err(AppError::remote_status(format!(
                "ping exit status {}: {}",
                code, stderr
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let rtt_ms = match self.parse_rtt(&stdout) {
            Some(rtt) => rtt,
            // Reply arrived but the RTT token was unparseable; the
            // wall-clock round trip is the best remaining estimate.
            None => started.elapsed().as_millis() as u64,
        };

        Ok(PingReply { rtt_ms })
    }

    fn apply_args(&self, command: &mut Command, target: Ipv4Addr) {
        // One echo, numeric output, reply wait bounded by the probe
        // timeout. Flag spelling differs per platform: -W takes
        // seconds on Linux, milliseconds on macOS.
        #[cfg(target_os = "macos")]
        command
            .args(["-n", "-c", "1", "-W"])
            .arg(self.timeout.as_millis().to_string())
            .arg(target.to_string());

        #[cfg(not(target_os = "macos"))]
        {
            let secs = self.timeout.as_secs().max(1);
            command
                .args(["-n", "-c", "1", "-W"])
                .arg(secs.to_string())
                .arg(target.to_string());
        }
    }

    fn parse_rtt(&self, output: &str) -> Option<u64> {
        let captures = self.rtt_pattern.captures(output)?;
        let value: f64 = captures.get(1)?.as_str().parse().ok()?;
        Some(value.round() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prober(capability: IcmpCapability) -> PingProber {
        PingProber::new(capability, Duration::from_millis(1000))
    }

    #[tokio::test]
    async fn test_unavailable_capability_fails_immediately() {
        let prober = prober(IcmpCapability::unavailable());
        let started = Instant::now();

        let outcome = prober.probe(Ipv4Addr::new(1, 1, 1, 1)).await;

        assert!(!outcome.is_ok());
        assert!(outcome.failure().unwrap().contains("capability unavailable"));
        // No timeout was spent.
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn test_parse_rtt_linux_format() {
        let prober = prober(IcmpCapability::unavailable());
        let output = "64 bytes from 1.1.1.1: icmp_seq=1 ttl=57 time=12.3 ms";
        assert_eq!(prober.parse_rtt(output), Some(12));
    }

    #[test]
    fn test_parse_rtt_integer_and_submillisecond() {
        let prober = prober(IcmpCapability::unavailable());
        assert_eq!(prober.parse_rtt("time=23 ms"), Some(23));
        assert_eq!(prober.parse_rtt("time<1 ms"), Some(1));
        assert_eq!(prober.parse_rtt("time=0.4 ms"), Some(0));
    }

    #[test]
    fn test_parse_rtt_absent() {
        let prober = prober(IcmpCapability::unavailable());
        assert_eq!(prober.parse_rtt("Request timeout for icmp_seq 0"), None);
        assert_eq!(prober.parse_rtt(""), None);
    }

    #[test]
    fn test_detect_does_not_panic() {
        let capability = IcmpCapability::detect();
        // Whether ping exists depends on the machine; the call itself
        // must be infallible.
        let _ = capability.available();
    }

    #[cfg(unix)]
    mod with_fake_ping {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn fake_ping(dir: &tempfile::TempDir, script: &str) -> PathBuf {
            let path = dir.path().join("ping");
            std::fs::write(&path, script).unwrap();
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
            path
        }

        #[tokio::test]
        async fn test_successful_reply_parses_rtt() {
            let dir = tempfile::TempDir::new().unwrap();
            let path = fake_ping(
                &dir,
                "#!/bin/sh\necho '64 bytes from 1.1.1.1: icmp_seq=1 ttl=57 time=5.0 ms'\nexit 0\n",
            );
            let prober = prober(IcmpCapability::with_path(path));

            let outcome = prober.probe(Ipv4Addr::new(1, 1, 1, 1)).await;
            assert_eq!(outcome.value(), Some(&PingReply { rtt_ms: 5 }));
        }

        #[tokio::test]
        async fn test_silent_nonzero_exit_reports_timeout() {
            let dir = tempfile::TempDir::new().unwrap();
            let path = fake_ping(&dir, "#!/bin/sh\nexit 1\n");
            let prober = prober(IcmpCapability::with_path(path));

            let outcome = prober.probe(Ipv4Addr::new(203, 0, 113, 1)).await;
            let reason = outcome.failure().unwrap();
            assert!(reason.contains("no reply"));
            assert!(reason.contains("exit status 1"));
        }

        #[tokio::test]
        async fn test_nonzero_exit_with_stderr_reports_status() {
            let dir = tempfile::TempDir::new().unwrap();
            let path = fake_ping(&dir, "#!/bin/sh\necho 'Network is unreachable' >&2\nexit 2\n");
            let prober = prober(IcmpCapability::with_path(path));

            let outcome = prober.probe(Ipv4Addr::new(203, 0, 113, 1)).await;
            let reason = outcome.failure().unwrap();
            assert!(reason.contains("exit status 2"));
            assert!(reason.contains("Network is unreachable"));
        }

        #[tokio::test]
        async fn test_hung_ping_is_bounded_by_guard_timeout() {
            let dir = tempfile::TempDir::new().unwrap();
            let path = fake_ping(&dir, "#!/bin/sh\nsleep 30\n");
            let prober = PingProber::new(
                IcmpCapability::with_path(path),
                Duration::from_millis(200),
            );

            let started = Instant::now();
            let outcome = prober.probe(Ipv4Addr::new(1, 1, 1, 1)).await;

            assert!(!outcome.is_ok());
            assert!(outcome.failure().unwrap().contains("no reply"));
            // Bounded by timeout + grace, with scheduling slack.
            assert!(started.elapsed() < Duration::from_secs(3));
        }

        #[tokio::test]
        async fn test_repeated_failing_probes_release_children() {
            let dir = tempfile::TempDir::new().unwrap();
            let path = fake_ping(&dir, "#!/bin/sh\nexit 1\n");
            let prober = prober(IcmpCapability::with_path(path));

            // Each call spawns and reaps one transient child; a leak
            // here would accumulate zombies and eventually fail.
            for _ in 0..100 {
                let outcome = prober.probe(Ipv4Addr::new(203, 0, 113, 1)).await;
                assert!(!outcome.is_ok());
            }
        }
    }
}
