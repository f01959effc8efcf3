//! Initialization-state inspection.
//!
//! Classifies the node's local state directory as Fresh or
//! AlreadyInitialized.  Two detection policies exist in the wild and
//! both are supported; the policy is an explicit setting, not an
//! ambient default.  An absent directory is the Fresh case — only a
//! genuine I/O failure (permissions, bad mount) is an error.

use std::io::ErrorKind;
use std::path::Path;

use crate::errors::InitError;

/// Cluster-state marker file written by the engine on first start.
pub const GRASTATE_FILE: &str = "grastate.dat";

/// Observed initialization status of this node, re-derived every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializationState {
    Fresh,
    AlreadyInitialized,
}

/// How to detect an already-initialized state directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InitPolicy {
    /// Any entry in the state directory counts as initialized.
    DirNonEmpty,
    /// Only a non-empty `grastate.dat` marker counts as initialized.
    /// Survives stray entries (lost+found) on a freshly provisioned volume.
    MarkerFile,
}

/// Inspect the state directory under the given policy.
pub fn inspect(state_dir: &Path, policy: InitPolicy) -> Result<InitializationState, InitError> {
    let entries = match std::fs::read_dir(state_dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(InitializationState::Fresh),
        Err(err) => {
            return Err(InitError::StateRead {
                path: state_dir.to_path_buf(),
                source: err,
            })
        }
    };
    match policy {
        InitPolicy::DirNonEmpty => {
            let non_empty = entries
                .into_iter()
                .next()
                .transpose()
                .map_err(|err| InitError::StateRead {
                    path: state_dir.to_path_buf(),
                    source: err,
                })?
                .is_some();
            if non_empty {
                Ok(InitializationState::AlreadyInitialized)
            } else {
                Ok(InitializationState::Fresh)
            }
        }
        InitPolicy::MarkerFile => {
            let marker = state_dir.join(GRASTATE_FILE);
            match std::fs::metadata(&marker) {
                Ok(meta) if meta.len() > 0 => Ok(InitializationState::AlreadyInitialized),
                Ok(_) => Ok(InitializationState::Fresh),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(InitializationState::Fresh),
                Err(err) => Err(InitError::StateRead {
                    path: marker,
                    source: err,
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_directory_is_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        for policy in [InitPolicy::DirNonEmpty, InitPolicy::MarkerFile] {
            assert_eq!(inspect(&missing, policy).unwrap(), InitializationState::Fresh);
        }
    }

    #[test]
    fn test_empty_directory_is_fresh() {
        let dir = tempfile::tempdir().unwrap();
        for policy in [InitPolicy::DirNonEmpty, InitPolicy::MarkerFile] {
            assert_eq!(inspect(dir.path(), policy).unwrap(), InitializationState::Fresh);
        }
    }

    #[test]
    fn test_stray_entry_differs_by_policy() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("lost+found")).unwrap();
        assert_eq!(
            inspect(dir.path(), InitPolicy::DirNonEmpty).unwrap(),
            InitializationState::AlreadyInitialized
        );
        assert_eq!(
            inspect(dir.path(), InitPolicy::MarkerFile).unwrap(),
            InitializationState::Fresh
        );
    }

    #[test]
    fn test_empty_marker_is_fresh_under_marker_policy() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(GRASTATE_FILE), b"").unwrap();
        assert_eq!(
            inspect(dir.path(), InitPolicy::MarkerFile).unwrap(),
            InitializationState::Fresh
        );
    }

    #[test]
    fn test_non_empty_marker_is_initialized() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(GRASTATE_FILE), b"version: 2.1\n").unwrap();
        for policy in [InitPolicy::DirNonEmpty, InitPolicy::MarkerFile] {
            assert_eq!(
                inspect(dir.path(), policy).unwrap(),
                InitializationState::AlreadyInitialized
            );
        }
    }
}
