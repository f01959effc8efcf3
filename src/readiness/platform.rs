//! Platform readiness oracle.
//!
//! Asks the orchestration platform whether the predecessor pod is
//! marked Ready.  Not-found and transient query failures are reported
//! as not-ready and retried on the next tick — mid-loop API hiccups
//! must never kill a join that would have succeeded a second later.

use std::future::Future;
use std::pin::Pin;

use tracing::debug;

use crate::kube::KubeClient;
use crate::readiness::ReadinessOracle;

/// Pod Ready-condition query against the orchestration API.
pub struct PlatformOracle {
    kube: KubeClient,
    pod: String,
    namespace: String,
}

impl PlatformOracle {
    pub fn new(kube: KubeClient, pod: impl Into<String>, namespace: impl Into<String>) -> Self {
        PlatformOracle {
            kube,
            pod: pod.into(),
            namespace: namespace.into(),
        }
    }
}

impl ReadinessOracle for PlatformOracle {
    fn check(&self) -> Pin<Box<dyn Future<Output = anyhow::Result<bool>> + Send + '_>> {
        Box::pin(async move {
            match self.kube.pod_ready(&self.pod, &self.namespace).await {
                Ok(ready) => Ok(ready),
                Err(err) => {
                    debug!(pod = %self.pod, "Transient pod status query failure: {err:#}");
                    Ok(false)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_api_server_is_not_ready() {
        // Port 1 on localhost: connection refused.  A mid-loop API
        // failure must read as not-ready so the poll retries, never as
        // a fatal oracle error.
        let kube = KubeClient::with_base_url("http://127.0.0.1:1", None).unwrap();
        let oracle = PlatformOracle::new(kube, "mariadb-galera-0", "default");
        assert!(!oracle.check().await.unwrap());
    }
}
