//! Node identity and ordinal resolution.
//!
//! StatefulSet pods are named `<group>-<ordinal>`; the ordinal is this
//! node's zero-based position in the replica group and drives the
//! bootstrap decision.

use crate::errors::InitError;

/// This node's identity within the replica group, derived once per run.
#[derive(Debug, Clone)]
pub struct NodeIdentity {
    /// Zero-based position in the replica group.
    pub ordinal: u32,
    /// The pod's own name, as supplied by the environment.
    pub name: String,
}

impl NodeIdentity {
    pub fn from_pod_name(name: &str) -> Result<Self, InitError> {
        Ok(NodeIdentity {
            ordinal: pod_ordinal(name)?,
            name: name.to_string(),
        })
    }
}

/// Extract the zero-based ordinal from a pod name.
///
/// The ordinal is the integer suffix after the last `-`.  Pure; a name
/// without such a suffix is a [`InitError::MalformedName`].
pub fn pod_ordinal(name: &str) -> Result<u32, InitError> {
    name.rsplit_once('-')
        .and_then(|(_, suffix)| suffix.parse::<u32>().ok())
        .ok_or_else(|| InitError::MalformedName {
            name: name.to_string(),
        })
}

/// Compose the pod name for a given ordinal of the group.
pub fn pod_name(group: &str, ordinal: u32) -> String {
    format!("{group}-{ordinal}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal_from_valid_names() {
        assert_eq!(pod_ordinal("mariadb-galera-0").unwrap(), 0);
        assert_eq!(pod_ordinal("mariadb-galera-2").unwrap(), 2);
        assert_eq!(pod_ordinal("db-12").unwrap(), 12);
    }

    #[test]
    fn test_ordinal_rejects_malformed_names() {
        for name in ["mariadb", "mariadb-galera-", "mariadb-galera-x", ""] {
            let err = pod_ordinal(name).unwrap_err();
            assert!(matches!(err, InitError::MalformedName { .. }), "{name}");
        }
    }

    #[test]
    fn test_identity_round_trip() {
        let identity = NodeIdentity::from_pod_name("mariadb-galera-1").unwrap();
        assert_eq!(identity.ordinal, 1);
        assert_eq!(pod_name("mariadb-galera", identity.ordinal), identity.name);
    }
}
