//! Aggregate interface throughput sampling.
//!
//! Rates are derived by differencing cumulative byte counters across
//! ticks: `(current - previous) / elapsed_seconds` per direction.

use crate::models::ThroughputSample;
use crate::platform::{CounterSource, CounterTotals};

/// Cross-tick sampler state: the previously observed cumulative
/// totals and the last computed rates.
///
/// Owned by the caller and threaded through every [`ThroughputSampler::sample`]
/// call, so its lifecycle (and resets, e.g. in tests) is explicit.
/// `prev` doubles as the "has a prior sample been taken" flag.
#[derive(Debug, Clone, Default)]
pub struct InterfaceCounterState {
    prev: Option<CounterTotals>,
    last_sample: ThroughputSample,
}

impl InterfaceCounterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a prior sample has been taken
    pub fn has_prior(&self) -> bool {
        self.prev.is_some()
    }

    /// Forget all prior observations
    pub fn reset(&mut self) {
        self.prev = None;
        self.last_sample = ThroughputSample::ZERO;
    }
}

/// Samples aggregate inbound/outbound bytes per second over all good
/// interfaces.
pub struct ThroughputSampler {
    source: Box<dyn CounterSource>,
}

impl ThroughputSampler {
    pub fn new(source: Box<dyn CounterSource>) -> Self {
        Self { source }
    }

    /// Take one throughput sample.
    ///
    /// Precondition: `elapsed_secs > 0` (the orchestrator substitutes
    /// the configured interval in the degenerate case).
    ///
    /// The very first call has no previous totals to difference
    /// against and reports zero for both directions, but still stores
    /// the observed totals for the next call. The rate is always
    /// computed from the previous totals *before* they are
    /// overwritten. If enumeration fails, the previous sample's rates
    /// are returned unchanged and the state is not mutated.
    pub fn sample(
        &self,
        elapsed_secs: f64,
        state: &mut InterfaceCounterState,
    ) -> ThroughputSample {
        debug_assert!(elapsed_secs > 0.0, "elapsed_secs must be positive");

        let totals = match self.source.totals() {
            Ok(totals) => totals,
            Err(_) => return state.last_sample,
        };

        let sample = match state.prev {
            None => ThroughputSample::ZERO,
            Some(prev) => ThroughputSample {
                // saturating_sub guards against counter resets
                // (interface re-created mid-run); the tick reports
                // zero instead of a huge bogus rate.
                in_bps: totals.bytes_in.saturating_sub(prev.bytes_in) as f64 / elapsed_secs,
                out_bps: totals.bytes_out.saturating_sub(prev.bytes_out) as f64 / elapsed_secs,
            },
        };

        state.prev = Some(totals);
        state.last_sample = sample;
        sample
    }
}
