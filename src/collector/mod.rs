//! Collection cycle orchestration
//!
//! One cycle authenticates, fetches every data domain independently, and
//! swaps a complete snapshot into the registry. Domain failures degrade that
//! domain only; authentication and transport failures fail the cycle while
//! the registry keeps serving the previous snapshot.

mod scheduler;
mod snapshot;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::ClientError;
use crate::metrics::MetricsRegistry;
use crate::sagemcom::{
    DeviceLease, PingResult, PortMapping, RouterClient, RouterInfo, SpeedtestResult, WifiChannel,
};

pub use scheduler::start_collection_loop;

/// Bounded backoff for transport errors during authentication
const TRANSPORT_RETRIES: u32 = 2;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Router data domains fetched each cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Devices,
    RouterInfo,
    Wifi,
    PortMappings,
    Speedtest,
    Ping,
    PublicIp,
}

impl Domain {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Devices => "devices",
            Self::RouterInfo => "router_info",
            Self::Wifi => "wifi",
            Self::PortMappings => "port_mappings",
            Self::Speedtest => "speedtest",
            Self::Ping => "ping",
            Self::PublicIp => "public_ip",
        }
    }
}

/// Typed results of one cycle; `None` marks a degraded domain
#[derive(Debug, Default)]
pub(crate) struct CycleData {
    devices: Option<Vec<DeviceLease>>,
    router_info: Option<RouterInfo>,
    wifi: Option<Vec<WifiChannel>>,
    port_mappings: Option<Vec<PortMapping>>,
    speedtest: Option<SpeedtestResult>,
    ping: Option<PingResult>,
    public_ip: Option<String>,
}

struct CachedSpeedtest {
    taken: Instant,
    result: SpeedtestResult,
}

/// Runs collection cycles against a [`RouterClient`] and feeds the registry
pub struct Collector {
    client: Arc<dyn RouterClient>,
    registry: MetricsRegistry,
    ping_target: String,
    speedtest_interval: Duration,
    speedtest_cache: Mutex<Option<CachedSpeedtest>>,
    cycles: AtomicU64,
    skipped_ticks: AtomicU64,
}

impl Collector {
    #[must_use]
    pub fn new(client: Arc<dyn RouterClient>, registry: MetricsRegistry, config: &Config) -> Self {
        Self {
            client,
            registry,
            ping_target: config.ping_target.clone(),
            speedtest_interval: Duration::from_secs(config.speedtest_interval_secs),
            speedtest_cache: Mutex::new(None),
            cycles: AtomicU64::new(0),
            skipped_ticks: AtomicU64::new(0),
        }
    }

    /// Executes one collection cycle and updates the registry
    pub async fn run_cycle(&self) {
        let start = Instant::now();
        match self.collect().await {
            Ok(data) => {
                let duration = start.elapsed();
                let cycles = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
                let skipped = self.skipped_ticks.load(Ordering::Relaxed);
                self.registry
                    .replace(snapshot::build(&data, duration, cycles, skipped));
                tracing::debug!(
                    "Collection cycle {} completed in {:.3}s",
                    cycles,
                    duration.as_secs_f64()
                );
            }
            Err(e) => {
                self.registry.mark_cycle_failed();
                tracing::warn!(
                    "Collection cycle failed in {:.3}s: {}",
                    start.elapsed().as_secs_f64(),
                    e
                );
            }
        }
    }

    /// Called by the scheduler when a tick fires during a running cycle
    pub fn note_skipped_tick(&self) {
        let skipped = self.skipped_ticks.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::warn!(
            "Previous collection cycle still running, skipping tick (total skipped: {})",
            skipped
        );
    }

    /// Skipped ticks so far, for tests and the health endpoint
    #[must_use]
    pub fn skipped_ticks(&self) -> u64 {
        self.skipped_ticks.load(Ordering::Relaxed)
    }

    async fn collect(&self) -> Result<CycleData, ClientError> {
        if let Err(e) = self.authenticate_with_retry().await {
            if matches!(e, ClientError::Auth(_)) {
                self.client.invalidate_session().await;
            }
            return Err(e);
        }

        let devices = self
            .router_domain(Domain::Devices, self.client.device_list())
            .await?;
        let router_info = self
            .router_domain(Domain::RouterInfo, self.client.router_info())
            .await?;
        let wifi = self
            .router_domain(Domain::Wifi, self.client.wifi_info())
            .await?;
        let port_mappings = self
            .router_domain(Domain::PortMappings, self.client.port_mappings())
            .await?;

        let speedtest = self.speedtest().await;
        let ping = probe_domain(Domain::Ping, self.client.run_ping(&self.ping_target)).await;
        let public_ip = probe_domain(Domain::PublicIp, self.client.public_ip()).await;

        Ok(CycleData {
            devices,
            router_info,
            wifi,
            port_mappings,
            speedtest,
            ping,
            public_ip,
        })
    }

    /// Retries transport-class authentication failures with doubling delay
    async fn authenticate_with_retry(&self) -> Result<(), ClientError> {
        let mut attempt = 0;
        let mut delay = RETRY_BASE_DELAY;
        loop {
            match self.client.authenticate().await {
                Ok(()) => return Ok(()),
                Err(ClientError::Transport(msg)) if attempt < TRANSPORT_RETRIES => {
                    attempt += 1;
                    tracing::warn!(
                        "Router unreachable during authentication (attempt {}/{}): {}",
                        attempt,
                        TRANSPORT_RETRIES,
                        msg
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Fetches one router-backed domain
    ///
    /// A fetch error degrades the domain; an auth error invalidates the
    /// session and fails the cycle; a transport error fails the cycle.
    async fn router_domain<T>(
        &self,
        domain: Domain,
        fetch: impl Future<Output = Result<T, ClientError>>,
    ) -> Result<Option<T>, ClientError> {
        match fetch.await {
            Ok(value) => Ok(Some(value)),
            Err(ClientError::Fetch(msg)) => {
                tracing::warn!("Domain '{}' degraded: {}", domain.as_str(), msg);
                Ok(None)
            }
            Err(ClientError::Auth(msg)) => {
                self.client.invalidate_session().await;
                Err(ClientError::Auth(msg))
            }
            Err(e) => Err(e),
        }
    }

    /// Runs the speedtest at most once per configured interval
    ///
    /// Between runs the cached result is re-exported and the domain counts
    /// as up.
    async fn speedtest(&self) -> Option<SpeedtestResult> {
        let mut cache = self.speedtest_cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if cached.taken.elapsed() < self.speedtest_interval {
                return Some(cached.result.clone());
            }
        }
        match self.client.run_speedtest().await {
            Ok(result) => {
                tracing::info!(
                    "Speedtest: {:.2} Mbps down, {:.2} Mbps up",
                    result.download_mbps,
                    result.upload_mbps
                );
                *cache = Some(CachedSpeedtest {
                    taken: Instant::now(),
                    result: result.clone(),
                });
                Some(result)
            }
            Err(e) => {
                tracing::warn!("Domain '{}' degraded: {}", Domain::Speedtest.as_str(), e);
                None
            }
        }
    }
}

/// Fetches a host-side probe domain; probe failures never fail the cycle
async fn probe_domain<T>(
    domain: Domain,
    fetch: impl Future<Output = Result<T, ClientError>>,
) -> Option<T> {
    match fetch.await {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Domain '{}' degraded: {}", domain.as_str(), e);
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support;
