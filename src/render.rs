//! Galera config rendering.
//!
//! [`render`] is a pure function from (topology, identity, addresses)
//! to the exact bytes of the engine's cluster config file.  Identical
//! inputs always produce byte-identical output; persisting the bytes is
//! the caller's job.  The fixed-content bootstrap marker that forces
//! new-cluster formation on the founder node also lives here.

use crate::address::ClusterAddressSet;
use crate::errors::InitError;
use crate::identity::NodeIdentity;
use crate::topology::TopologyDescriptor;

/// File name of the rendered cluster config.
pub const CONFIG_FILE_NAME: &str = "0-galera.cnf";

/// File name of the bootstrap marker, per the engine's include-file convention.
pub const BOOTSTRAP_FILE_NAME: &str = "1-bootstrap.cnf";

/// Marker content that forces the engine to form a brand-new cluster
/// instead of attempting to join one.
pub const BOOTSTRAP_FILE: &str = "[galera]
wsrep_new_cluster=\"ON\"";

/// Fixed cluster name shared by every member.
const CLUSTER_NAME: &str = "mariadb-operator";

/// Path of the Galera replication provider library inside the image.
const GALERA_PROVIDER: &str = "/usr/lib/galera/libgalera_smm.so";

/// Render the cluster config file.
///
/// Refuses to produce a config when clustering is disabled on the
/// descriptor.  The `wsrep_sst_auth` line is a conditional section: it
/// appears exactly once for SST methods that authenticate and is omitted
/// entirely — not emitted empty — for the rest.
pub fn render(
    topology: &TopologyDescriptor,
    identity: &NodeIdentity,
    addresses: &ClusterAddressSet,
) -> Result<String, InitError> {
    if !topology.enabled {
        return Err(InitError::FeatureDisabled {
            group: topology.group_name.clone(),
        });
    }
    let mut config = format!(
        r#"[mariadb]
bind-address=0.0.0.0
default_storage_engine=InnoDB
binlog_format=row
innodb_autoinc_lock_mode=2

# Cluster configuration
wsrep_on=ON
wsrep_provider={provider}
wsrep_cluster_address="{cluster_address}"
wsrep_cluster_name={cluster_name}
wsrep_slave_threads={threads}

# Node configuration
wsrep_node_address="{node_address}"
wsrep_node_name="{node_name}"
wsrep_sst_method="{sst}"
"#,
        provider = GALERA_PROVIDER,
        cluster_address = addresses.gcomm(),
        cluster_name = CLUSTER_NAME,
        threads = topology.replica_threads,
        node_address = addresses.self_address,
        node_name = identity.name,
        sst = topology.sst_method.keyword(),
    );
    if topology.sst_method.requires_auth() {
        config.push_str(&format!(
            "wsrep_sst_auth=\"root:{}\"\n",
            topology.root_credential
        ));
    }
    Ok(config)
}

// ── Tests ──────────────────────────────────────────────────────────
