//! Direct liveness probe oracle.
//!
//! Opens a short-lived connection to the predecessor node's Galera
//! health endpoint on its fixed agent port and treats anything but a
//! positive answer — connection refused, timeout, unhealthy status —
//! as not-yet-ready.  No connection is reused across polls.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use anyhow::Context;
use tracing::debug;

use crate::readiness::ReadinessOracle;

/// Well-known port of the node agent's health endpoint.
pub const AGENT_PROBE_PORT: u16 = 5555;

/// Per-probe timeout; keeps a wedged predecessor from stalling the
/// 1-second poll cadence indefinitely.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Galera health probe against the predecessor's agent endpoint.
pub struct DirectProbeOracle {
    http: reqwest::Client,
    endpoint: String,
}

impl DirectProbeOracle {
    /// Probe the node at `address` on the fixed agent port.
    pub fn new(address: &str) -> anyhow::Result<Self> {
        Ok(DirectProbeOracle {
            http: reqwest::Client::builder()
                .timeout(PROBE_TIMEOUT)
                .build()
                .context("building probe client")?,
            endpoint: format!("http://{address}:{AGENT_PROBE_PORT}/health"),
        })
    }

    /// Probe an explicit endpoint URL.  Used in tests.
    #[cfg(test)]
    fn with_endpoint(endpoint: impl Into<String>) -> Self {
        DirectProbeOracle {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl ReadinessOracle for DirectProbeOracle {
    fn check(&self) -> Pin<Box<dyn Future<Output = anyhow::Result<bool>> + Send + '_>> {
        Box::pin(async move {
            match self.http.get(&self.endpoint).send().await {
                Ok(response) => Ok(response.status().is_success()),
                Err(err) => {
                    debug!(endpoint = %self.endpoint, "Probe connection failed: {err:#}");
                    Ok(false)
                }
            }
        })
    }
}
