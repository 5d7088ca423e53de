//! Host-side network probes: latency, bandwidth, public IP
//!
//! These do not talk to the router. ICMP would need raw sockets, so the
//! latency probe times a TCP connect instead; the bandwidth probe times an
//! HTTP transfer against a well-known speed endpoint.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use futures_util::StreamExt;
use serde::Deserialize;

use super::types::{PingResult, SpeedtestResult};
use crate::error::ClientError;

const PING_PORT: u16 = 443;
const PING_TIMEOUT: Duration = Duration::from_secs(1);

const DOWNLOAD_URL: &str = "https://speed.cloudflare.com/__down?bytes=10000000";
const UPLOAD_URL: &str = "https://speed.cloudflare.com/__up";
const UPLOAD_BYTES: usize = 2_000_000;
const SPEEDTEST_TIMEOUT: Duration = Duration::from_secs(60);

const PUBLIC_IP_URL: &str = "https://api.ipify.org?format=json";

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Measures the TCP connect round trip to `target:443`
pub async fn tcp_ping(target: &str) -> PingResult {
    let addr = format!("{target}:{PING_PORT}");
    let start = Instant::now();
    let connect = tokio::net::TcpStream::connect(&addr);

    match tokio::time::timeout(PING_TIMEOUT, connect).await {
        Ok(Ok(_stream)) => PingResult {
            target: target.to_string(),
            latency_ms: start.elapsed().as_secs_f64() * 1000.0,
            success: true,
        },
        Ok(Err(e)) => {
            tracing::debug!("Ping to {} failed: {}", target, e);
            PingResult {
                target: target.to_string(),
                latency_ms: f64::NAN,
                success: false,
            }
        }
        Err(_) => {
            tracing::debug!("Ping to {} timed out", target);
            PingResult {
                target: target.to_string(),
                latency_ms: f64::NAN,
                success: false,
            }
        }
    }
}

/// Times an HTTP download and upload and reports throughput in Mbps
pub async fn http_speedtest(http: &reqwest::Client) -> Result<SpeedtestResult, ClientError> {
    let download_mbps = measure_download(http).await?;
    let upload_mbps = measure_upload(http).await?;

    Ok(SpeedtestResult {
        download_mbps,
        upload_mbps,
        measured_at: unix_now(),
    })
}

async fn measure_download(http: &reqwest::Client) -> Result<f64, ClientError> {
    let start = Instant::now();
    let response = http
        .get(DOWNLOAD_URL)
        .timeout(SPEEDTEST_TIMEOUT)
        .send()
        .await?
        .error_for_status()?;

    let mut bytes: u64 = 0;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        bytes += chunk?.len() as u64;
    }

    Ok(throughput_mbps(bytes, start.elapsed()))
}

async fn measure_upload(http: &reqwest::Client) -> Result<f64, ClientError> {
    let payload = vec![0u8; UPLOAD_BYTES];
    let start = Instant::now();
    http.post(UPLOAD_URL)
        .timeout(SPEEDTEST_TIMEOUT)
        .body(payload)
        .send()
        .await?
        .error_for_status()?;

    Ok(throughput_mbps(UPLOAD_BYTES as u64, start.elapsed()))
}

fn throughput_mbps(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs == 0.0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let bits = (bytes * 8) as f64;
    bits / secs / 1_000_000.0
}

#[derive(Deserialize)]
struct IpifyResponse {
    ip: String,
}

/// Fetches the public IP via ipify
pub async fn fetch_public_ip(http: &reqwest::Client) -> Result<String, ClientError> {
    let response: IpifyResponse = http
        .get(PUBLIC_IP_URL)
        .timeout(Duration::from_secs(5))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(response.ip)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput_mbps() {
        // 12.5 MB in one second is 100 Mbit/s
        let mbps = throughput_mbps(12_500_000, Duration::from_secs(1));
        assert!((mbps - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_throughput_zero_duration() {
        assert_eq!(throughput_mbps(1000, Duration::ZERO), 0.0);
    }

    #[test]
    fn test_unix_now_is_recent() {
        // After 2023-01-01
        assert!(unix_now() > 1_672_531_200);
    }

    #[tokio::test]
    async fn test_tcp_ping_unreachable_target() {
        // Reserved TEST-NET-1 address, nothing listens there
        let result = tcp_ping("192.0.2.1").await;
        assert!(!result.success);
        assert!(result.latency_ms.is_nan());
        assert_eq!(result.target, "192.0.2.1");
    }
}
