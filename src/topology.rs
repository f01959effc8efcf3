//! Topology descriptor and the API resource it is built from.
//!
//! The orchestration platform stores the cluster's declared topology as
//! a custom resource.  [`MariaDbResource`] mirrors the JSON shape of
//! that resource; [`TopologyDescriptor`] is the flattened, validated
//! view the rest of the coordinator works with.  The root credential is
//! not part of the resource — it arrives through the environment and is
//! folded in here so that rendering never touches ambient process state.

use serde::Deserialize;

use crate::errors::InitError;

/// State Snapshot Transfer method declared for the cluster.
///
/// The method determines whether a `root:<password>` credential must be
/// embedded in the rendered config: the physical-backup methods
/// authenticate against the donor, plain rsync does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SstMethod {
    Rsync,
    MariaBackup,
    Mysqldump,
}

impl SstMethod {
    /// Parse the resource's declared method into a known engine keyword.
    pub fn parse(method: &str) -> Result<Self, InitError> {
        match method {
            "rsync" => Ok(SstMethod::Rsync),
            "mariabackup" => Ok(SstMethod::MariaBackup),
            "mysqldump" => Ok(SstMethod::Mysqldump),
            other => Err(InitError::UnsupportedSstMethod {
                method: other.to_string(),
            }),
        }
    }

    /// The keyword the database engine expects in `wsrep_sst_method`.
    pub fn keyword(self) -> &'static str {
        match self {
            SstMethod::Rsync => "rsync",
            SstMethod::MariaBackup => "mariabackup",
            SstMethod::Mysqldump => "mysqldump",
        }
    }

    /// Whether this method needs `wsrep_sst_auth` in the config.
    pub fn requires_auth(self) -> bool {
        matches!(self, SstMethod::MariaBackup | SstMethod::Mysqldump)
    }
}

/// Immutable cluster topology, fetched once per run.
#[derive(Debug, Clone)]
pub struct TopologyDescriptor {
    /// Declared size of the replica group.
    pub replica_count: u32,
    /// Whether Galera clustering is enabled on the resource.
    pub enabled: bool,
    /// State Snapshot Transfer method.
    pub sst_method: SstMethod,
    /// Number of replication applier threads.
    pub replica_threads: i32,
    /// Root credential for SST methods that authenticate.
    pub root_credential: String,
    /// Name of the replica group (StatefulSet name).
    pub group_name: String,
    /// Namespace the group runs in.
    pub namespace: String,
}

impl TopologyDescriptor {
    /// Build the descriptor from a decoded API resource plus the
    /// environment-sourced root credential.
    pub fn from_resource(
        resource: MariaDbResource,
        root_credential: String,
    ) -> Result<Self, InitError> {
        let galera = resource.spec.galera.unwrap_or_default();
        let sst_method = SstMethod::parse(galera.sst.as_deref().unwrap_or("rsync"))?;
        Ok(TopologyDescriptor {
            replica_count: resource.spec.replicas,
            enabled: galera.enabled,
            sst_method,
            replica_threads: galera.replica_threads.unwrap_or(1),
            root_credential,
            group_name: resource.metadata.name,
            namespace: resource.metadata.namespace,
        })
    }
}

// ── API resource shape ─────────────────────────────────────────────

/// The orchestration API's MariaDB resource, reduced to the fields the
/// coordinator reads.
#[derive(Debug, Deserialize)]
pub struct MariaDbResource {
    pub metadata: ObjectMeta,
    pub spec: MariaDbSpec,
}

#[derive(Debug, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MariaDbSpec {
    #[serde(default)]
    pub replicas: u32,
    #[serde(default)]
    pub galera: Option<GaleraSpec>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaleraSpec {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub sst: Option<String>,
    #[serde(default)]
    pub replica_threads: Option<i32>,
}

// ── Tests ──────────────────────────────────────────────────────────
