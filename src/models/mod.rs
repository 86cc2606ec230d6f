//! Data models produced by the probing loop

pub mod snapshot;

pub use snapshot::{
    DnsSample, Health, HttpReply, HttpSample, PingReply, PingSample, ResolvedHost, Snapshot,
    ThroughputSample,
};
