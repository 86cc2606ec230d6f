//! The tick orchestrator: drives the fixed-interval loop, fans out
//! the probes, assembles one [`Snapshot`] per tick and hands it to
//! the renderer.

use crate::config::Config;
use crate::error::Result;
use crate::logging::Logger;
use crate::models::{DnsSample, HttpReply, HttpSample, PingReply, PingSample, ResolvedHost, Snapshot};
use crate::output::Renderer;
use crate::platform;
use crate::probes::http::HttpEndpoint;
use crate::probes::{
    DnsProber, HttpProber, IcmpCapability, InterfaceCounterState, PingProber, ThroughputSampler,
};
use crate::types::ProbeOutcome;
use async_trait::async_trait;
use chrono::Local;
use std::net::Ipv4Addr;
use std::time::Instant;
use tokio::sync::watch;

/// Orchestrator state: `Idle` between ticks, `Running` inside one,
/// `Stopped` once the loop has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Running,
    Stopped,
}

/// Seam for the ICMP probe
#[async_trait]
pub trait Pinger: Send + Sync {
    async fn probe(&self, target: Ipv4Addr) -> ProbeOutcome<PingReply>;
}

#[async_trait]
impl Pinger for PingProber {
    async fn probe(&self, target: Ipv4Addr) -> ProbeOutcome<PingReply> {
        PingProber::probe(self, target).await
    }
}

/// Seam for the DNS probe
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, hostname: &str) -> ProbeOutcome<ResolvedHost>;
}

#[async_trait]
impl Resolver for DnsProber {
    async fn resolve(&self, hostname: &str) -> ProbeOutcome<ResolvedHost> {
        DnsProber::resolve(self, hostname).await
    }
}

/// Seam for the HTTPS probe
#[async_trait]
pub trait EndpointChecker: Send + Sync {
    async fn check(&self, endpoint: &HttpEndpoint) -> ProbeOutcome<HttpReply>;
}

#[async_trait]
impl EndpointChecker for HttpProber {
    async fn check(&self, endpoint: &HttpEndpoint) -> ProbeOutcome<HttpReply> {
        HttpProber::check(self, endpoint).await
    }
}

/// Fixed-interval monitoring loop.
///
/// No probe depends on another's result; the three network probes of
/// a tick run concurrently and the throughput sampler runs on the
/// loop itself, which is the only place its cross-tick state is
/// touched.
pub struct Monitor {
    config: Config,
    targets: Vec<Ipv4Addr>,
    endpoint: HttpEndpoint,
    pinger: Box<dyn Pinger>,
    resolver: Box<dyn Resolver>,
    checker: Box<dyn EndpointChecker>,
    sampler: ThroughputSampler,
    counters: InterfaceCounterState,
    shutdown: watch::Receiver<bool>,
    logger: Logger,
    state: MonitorState,
}

impl Monitor {
    /// Build a monitor over the real probers.
    pub fn new(config: Config, shutdown: watch::Receiver<bool>, logger: Logger) -> Result<Self> {
        let capability = IcmpCapability::detect();
        if !capability.available() {
            logger.warn("No ping executable found; ICMP probes will report failure");
        }

        let targets = config.ping_addrs()?;
        let endpoint = HttpEndpoint::from_config(&config);
        let pinger = Box::new(PingProber::new(capability, config.ping_timeout()));
        let resolver = Box::new(DnsProber::new(config.dns_timeout())?);
        let checker = Box::new(HttpProber::new(
            config.http_timeout(),
            config.proxy_url.clone(),
        ));
        let sampler = ThroughputSampler::new(platform::create_source()?);

        Ok(Self {
            config,
            targets,
            endpoint,
            pinger,
            resolver,
            checker,
            sampler,
            counters: InterfaceCounterState::new(),
            shutdown,
            logger,
            state: MonitorState::Idle,
        })
    }

    /// Build a monitor with injected probes (tests and embedding).
    #[allow(clippy::too_many_arguments)]
    pub fn with_probes(
        config: Config,
        pinger: Box<dyn Pinger>,
        resolver: Box<dyn Resolver>,
        checker: Box<dyn EndpointChecker>,
        sampler: ThroughputSampler,
        shutdown: watch::Receiver<bool>,
        logger: Logger,
    ) -> Result<Self> {
        let targets = config.ping_addrs()?;
        let endpoint = HttpEndpoint::from_config(&config);
        Ok(Self {
            config,
            targets,
            endpoint,
            pinger,
            resolver,
            checker,
            sampler,
            counters: InterfaceCounterState::new(),
            shutdown,
            logger,
            state: MonitorState::Stopped,
        })
    }

    /// Current orchestrator state
    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Run the loop until cancellation or, when `tick_count` is
    /// nonzero, until that many ticks have completed.
    ///
    /// Probe failures never abort a tick; they are folded into the
    /// snapshot and displayed. Cancellation observed during the
    /// inter-tick wait interrupts it promptly; cancellation arriving
    /// mid-tick takes effect before the next tick begins.
    pub async fn run(&mut self, renderer: &mut dyn Renderer) -> Result<MonitorState> {
        let interval = self.config.interval();
        let mut last_tick = Instant::now();
        let mut ticks_run: u32 = 0;

        self.logger.start_marker();
        self.state = MonitorState::Idle;

        loop {
            if *self.shutdown.borrow() {
                self.state = MonitorState::Stopped;
                break;
            }

            self.state = MonitorState::Running;
            let tick_started = Instant::now();
            let mut elapsed = tick_started.duration_since(last_tick).as_secs_f64();
            if elapsed <= 0.0 {
                // Degenerate clock reading: fall back to the
                // configured cadence, per the sampler's precondition.
                elapsed = interval.as_secs_f64();
            }

            let snapshot = self.collect(elapsed).await;
            renderer.render(&snapshot)?;
            self.write_status_file(&snapshot);
            let correlation = self.logger.status(&snapshot);
            if self.config.debug {
                self.logger.debug(&format!(
                    "tick {} correlation={} health={:?}",
                    ticks_run + 1,
                    correlation,
                    snapshot.health()
                ));
            }

            last_tick = tick_started;
            self.state = MonitorState::Idle;

            ticks_run += 1;
            if self.config.tick_count != 0 && ticks_run >= self.config.tick_count {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                changed = self.shutdown.changed() => {
                    // A dropped sender means no further signal can
                    // arrive; stop rather than spin.
                    if changed.is_err() || *self.shutdown.borrow() {
                        self.state = MonitorState::Stopped;
                        break;
                    }
                }
            }
        }

        self.state = MonitorState::Stopped;
        self.logger.stop_marker();
        Ok(self.state)
    }

    /// Gather all four probe results plus the primary address into
    /// one fully-populated snapshot.
    async fn collect(&mut self, elapsed_secs: f64) -> Snapshot {
        let pinger = self.pinger.as_ref();
        let targets = &self.targets;

        let (pings, dns_outcome, http_outcome) = tokio::join!(
            futures::future::join_all(targets.iter().map(|&target| async move {
                PingSample {
                    target,
                    outcome: pinger.probe(target).await,
                }
            })),
            self.resolver.resolve(&self.config.dns_hostname),
            self.checker.check(&self.endpoint),
        );

        let throughput = self.sampler.sample(elapsed_secs, &mut self.counters);
        let primary_address = platform::primary_ipv4();

        Snapshot {
            timestamp: Local::now(),
            primary_address,
            throughput,
            pings,
            dns: DnsSample {
                hostname: self.config.dns_hostname.clone(),
                outcome: dns_outcome,
            },
            http: HttpSample {
                host: self.endpoint.host.clone(),
                path: self.endpoint.path.clone(),
                outcome: http_outcome,
            },
        }
    }

    /// Persist the latest snapshot as JSON, best-effort.
    fn write_status_file(&self, snapshot: &Snapshot) {
        let Some(path) = self.config.status_file.as_ref() else {
            return;
        };
        match serde_json::to_string_pretty(snapshot) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    self.logger
                        .warn(&format!("Failed to write status file {}: {}", path, e));
                }
            }
            Err(e) => {
                self.logger
                    .warn(&format!("Failed to serialize snapshot: {}", e));
            }
        }
    }
}
