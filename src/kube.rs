//! Minimal in-cluster orchestration API client.
//!
//! The coordinator needs exactly two read-only queries: fetch the
//! MariaDB resource that declares the cluster topology, and ask whether
//! a named pod is Ready.  A thin reqwest client over the REST paths is
//! enough; no watch machinery, no reconciliation.

use anyhow::Context;
use serde::Deserialize;

use crate::errors::InitError;
use crate::topology::MariaDbResource;

const SERVICEACCOUNT_TOKEN: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";
const SERVICEACCOUNT_CA: &str = "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt";

/// Read-only client for the orchestration API.
#[derive(Debug, Clone)]
pub struct KubeClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl KubeClient {
    /// Build a client from the in-cluster environment: API server
    /// address from the well-known env vars, bearer token and CA bundle
    /// from the mounted service account.
    pub fn in_cluster() -> anyhow::Result<Self> {
        let host = std::env::var("KUBERNETES_SERVICE_HOST")
            .map_err(|_| InitError::MissingEnv {
                name: "KUBERNETES_SERVICE_HOST",
            })?;
        let port = std::env::var("KUBERNETES_SERVICE_PORT")
            .map_err(|_| InitError::MissingEnv {
                name: "KUBERNETES_SERVICE_PORT",
            })?;
        let token = std::fs::read_to_string(SERVICEACCOUNT_TOKEN)
            .context("reading service account token")?;
        let ca = std::fs::read(SERVICEACCOUNT_CA).context("reading service account CA bundle")?;
        let http = reqwest::Client::builder()
            .add_root_certificate(
                reqwest::Certificate::from_pem(&ca).context("parsing service account CA bundle")?,
            )
            .build()
            .context("building API client")?;
        Ok(KubeClient {
            http,
            base_url: format!("https://{host}:{port}"),
            token: Some(token.trim().to_string()),
        })
    }

    /// Build a client against an explicit API endpoint.  Used in tests
    /// and for out-of-cluster runs against a proxied API server.
    pub fn with_base_url(base_url: impl Into<String>, token: Option<String>) -> anyhow::Result<Self> {
        Ok(KubeClient {
            http: reqwest::Client::builder()
                .build()
                .context("building API client")?,
            base_url: base_url.into(),
            token,
        })
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let request = self.http.get(format!("{}{path}", self.base_url));
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Fetch the MariaDB resource declaring the cluster topology.
    pub async fn mariadb(&self, name: &str, namespace: &str) -> Result<MariaDbResource, InitError> {
        let path =
            format!("/apis/mariadb.mmontes.io/v1alpha1/namespaces/{namespace}/mariadbs/{name}");
        let response = self
            .get(&path)
            .send()
            .await
            .with_context(|| format!("requesting '{name}' MariaDB in namespace '{namespace}'"))
            .map_err(InitError::Lookup)?;
        let response = response
            .error_for_status()
            .with_context(|| format!("requesting '{name}' MariaDB in namespace '{namespace}'"))
            .map_err(InitError::Lookup)?;
        response
            .json::<MariaDbResource>()
            .await
            .context("decoding MariaDB resource")
            .map_err(InitError::Lookup)
    }

    /// Whether the named pod currently reports the Ready condition.
    ///
    /// A missing pod is simply not ready; transport failures bubble up
    /// so the caller can decide whether they are retryable.
    pub async fn pod_ready(&self, name: &str, namespace: &str) -> anyhow::Result<bool> {
        let path = format!("/api/v1/namespaces/{namespace}/pods/{name}");
        let response = self.get(&path).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        let pod: Pod = response.error_for_status()?.json().await?;
        Ok(is_ready(&pod))
    }
}

// ── Pod status shape ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Pod {
    #[serde(default)]
    status: PodStatus,
}

#[derive(Debug, Default, Deserialize)]
struct PodStatus {
    #[serde(default)]
    conditions: Vec<PodCondition>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PodCondition {
    #[serde(rename = "type")]
    condition_type: String,
    status: String,
}

fn is_ready(pod: &Pod) -> bool {
    pod.status
        .conditions
        .iter()
        .any(|c| c.condition_type == "Ready" && c.status == "True")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_condition_true() {
        let pod: Pod = serde_json::from_str(
            r#"{"status": {"conditions": [
                {"type": "Initialized", "status": "True"},
                {"type": "Ready", "status": "True"}
            ]}}"#,
        )
        .unwrap();
        assert!(is_ready(&pod));
    }

    #[test]
    fn test_ready_condition_false() {
        let pod: Pod = serde_json::from_str(
            r#"{"status": {"conditions": [{"type": "Ready", "status": "False"}]}}"#,
        )
        .unwrap();
        assert!(!is_ready(&pod));
    }

    #[test]
    fn test_missing_status_is_not_ready() {
        let pod: Pod = serde_json::from_str("{}").unwrap();
        assert!(!is_ready(&pod));
    }
}
