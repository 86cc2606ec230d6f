//! The four network probes.
//!
//! Each probe is a single bounded-time operation returning a
//! [`ProbeOutcome`](crate::types::ProbeOutcome); failures are
//! contained here and never propagate out of a tick.

pub mod dns;
pub mod http;
pub mod icmp;
pub mod throughput;

pub use dns::DnsProber;
pub use http::{HttpEndpoint, HttpProber, REACHABLE_STATUS};
pub use icmp::{IcmpCapability, PingProber};
pub use throughput::{InterfaceCounterState, ThroughputSampler};
