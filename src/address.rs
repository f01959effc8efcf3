//! Cluster address building.
//!
//! Maps the topology descriptor onto the fixed StatefulSet naming
//! convention: each member is reachable at
//! `<group>-<ordinal>.<group>-internal.<namespace>.svc.cluster.local`.
//! Member order is ordinal order — the membership string's order decides
//! the engine's connection attempt order.

use crate::errors::InitError;
use crate::identity::pod_name;
use crate::topology::TopologyDescriptor;

/// The ordered cluster membership plus this node's own address.
#[derive(Debug, Clone)]
pub struct ClusterAddressSet {
    /// One address per ordinal, in ordinal order.
    pub members: Vec<String>,
    /// The member at this node's own ordinal.  Taken from `members` by
    /// construction so self-identification and membership always come
    /// from the same snapshot.
    pub self_address: String,
}

impl ClusterAddressSet {
    /// Enumerate all member addresses for the topology.
    ///
    /// A zero-replica topology cannot describe a cluster and is
    /// rejected rather than silently producing an empty list; an
    /// ordinal outside the replica range is rejected for the same
    /// reason.
    pub fn build(topology: &TopologyDescriptor, ordinal: u32) -> Result<Self, InitError> {
        if topology.replica_count == 0 || ordinal >= topology.replica_count {
            return Err(InitError::InvalidTopology);
        }
        let members: Vec<String> = (0..topology.replica_count)
            .map(|i| pod_fqdn(topology, i))
            .collect();
        let self_address = members[ordinal as usize].clone();
        Ok(ClusterAddressSet {
            members,
            self_address,
        })
    }

    /// The engine's cluster membership string.
    pub fn gcomm(&self) -> String {
        format!("gcomm://{}", self.members.join(","))
    }
}

/// Fully qualified domain name of the group's headless internal service.
pub fn service_fqdn(topology: &TopologyDescriptor) -> String {
    format!(
        "{}-internal.{}.svc.cluster.local",
        topology.group_name, topology.namespace
    )
}

/// Fully qualified domain name of one member pod.
pub fn pod_fqdn(topology: &TopologyDescriptor, ordinal: u32) -> String {
    format!(
        "{}.{}",
        pod_name(&topology.group_name, ordinal),
        service_fqdn(topology)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::SstMethod;

    fn test_topology(replica_count: u32) -> TopologyDescriptor {
        TopologyDescriptor {
            replica_count,
            enabled: true,
            sst_method: SstMethod::Rsync,
            replica_threads: 1,
            root_credential: "mariadb".to_string(),
            group_name: "mariadb-galera".to_string(),
            namespace: "default".to_string(),
        }
    }

    #[test]
    fn test_members_in_ordinal_order() {
        let set = ClusterAddressSet::build(&test_topology(3), 0).unwrap();
        assert_eq!(
            set.members,
            vec![
                "mariadb-galera-0.mariadb-galera-internal.default.svc.cluster.local",
                "mariadb-galera-1.mariadb-galera-internal.default.svc.cluster.local",
                "mariadb-galera-2.mariadb-galera-internal.default.svc.cluster.local",
            ]
        );
    }

    #[test]
    fn test_self_address_is_member_at_own_ordinal() {
        let topology = test_topology(5);
        for ordinal in 0..5 {
            let set = ClusterAddressSet::build(&topology, ordinal).unwrap();
            assert_eq!(set.self_address, set.members[ordinal as usize]);
        }
    }

    #[test]
    fn test_zero_replicas_rejected() {
        let err = ClusterAddressSet::build(&test_topology(0), 0).unwrap_err();
        assert!(matches!(err, InitError::InvalidTopology));
    }

    #[test]
    fn test_ordinal_out_of_range_rejected() {
        let err = ClusterAddressSet::build(&test_topology(3), 3).unwrap_err();
        assert!(matches!(err, InitError::InvalidTopology));
    }

    #[test]
    fn test_gcomm_membership_string() {
        let set = ClusterAddressSet::build(&test_topology(2), 1).unwrap();
        assert_eq!(
            set.gcomm(),
            "gcomm://mariadb-galera-0.mariadb-galera-internal.default.svc.cluster.local,\
             mariadb-galera-1.mariadb-galera-internal.default.svc.cluster.local"
        );
    }
}
