//! Platform-specific access to interface byte counters

use crate::error::Result;
use serde::{Deserialize, Serialize};

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::LinuxCounters;

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "macos")]
pub use macos::MacCounters;

/// Cumulative byte totals summed over all good interfaces.
///
/// Monotonically increasing since interface activation; per-interval
/// rates are derived by differencing two readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterTotals {
    pub bytes_in: u64,
    pub bytes_out: u64,
}

/// Source of cumulative interface counters.
///
/// A "good" interface is operationally up and either backed by
/// hardware or at least not a loopback/tunnel device; implementations
/// apply that filter before summing.
pub trait CounterSource: Send + Sync {
    /// Read the current cumulative totals over all good interfaces
    fn totals(&self) -> Result<CounterTotals>;

    /// Whether this source can function on the current system
    fn is_available(&self) -> bool;
}

/// Create the counter source for the current platform
pub fn create_source() -> Result<Box<dyn CounterSource>> {
    #[cfg(target_os = "linux")]
    return Ok(Box::new(LinuxCounters::new()));

    #[cfg(target_os = "macos")]
    return Ok(Box::new(MacCounters::new()));

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    return Err(crate::error::AppError::enumeration(
        "Unsupported platform for interface counters",
    ));
}

/// Kernel naming conventions for loopback and tunnel devices.
///
/// Used by the good-interface filter: interfaces without a hardware
/// backing are kept unless they are of one of these types.
pub(crate) fn is_loopback_or_tunnel(name: &str) -> bool {
    if name == "lo" || name.starts_with("lo:") {
        return true;
    }
    const TUNNEL_PREFIXES: &[&str] = &["tun", "tap", "wg", "gre", "sit", "ipip", "ip6tnl", "vti"];
    TUNNEL_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

/// The machine's outward-facing IPv4 address.
///
/// Connects an unbound UDP socket to a public resolver address; the
/// routing table picks the outbound interface and `local_addr` reveals
/// its address. No packet is sent. Returns `None` when the lookup
/// fails (interface down, no route).
pub fn primary_ipv4() -> Option<String> {
    let socket = std::net::UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    let addr = socket.local_addr().ok()?;
    Some(addr.ip().to_string())
}
