//! Run settings and environment-sourced identity.
//!
//! Everything externally sourced is collected here, once, before any
//! work begins: an immutable [`Settings`] built from command-line flags
//! and an [`Environment`] holding the mandatory process-environment
//! values.  No component reads ambient process state after this point.

use std::path::PathBuf;

use crate::errors::InitError;
use crate::state::InitPolicy;

/// Which readiness oracle gates the join path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReadinessStrategy {
    /// Ask the orchestration platform for the predecessor pod's Ready condition.
    Platform,
    /// Probe the predecessor's Galera health endpoint directly.
    Probe,
}

/// Immutable per-run settings, built once in `main` from the CLI.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory the rendered config artifacts are written to.
    pub config_dir: PathBuf,
    /// Directory holding the engine's persisted local state.
    pub state_dir: PathBuf,
    /// Name of the MariaDB resource to initialize.
    pub mariadb_name: String,
    /// Namespace of the MariaDB resource.
    pub mariadb_namespace: String,
    /// Already-initialized detection policy.
    pub init_policy: InitPolicy,
    /// Readiness oracle for the join path.
    pub readiness: ReadinessStrategy,
}

/// Mandatory values supplied through the process environment.
#[derive(Debug, Clone)]
pub struct Environment {
    /// This pod's own name.
    pub pod_name: String,
    /// Root credential embedded in the config for authenticating SST methods.
    pub root_password: String,
}

impl Environment {
    /// Read and validate the environment before any work begins.
    pub fn from_process() -> Result<Self, InitError> {
        Ok(Environment {
            pod_name: require_env("POD_NAME")?,
            root_password: require_env("MARIADB_ROOT_PASSWORD")?,
        })
    }
}

fn require_env(name: &'static str) -> Result<String, InitError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(InitError::MissingEnv { name }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test covering presence, absence, and emptiness: the process
    // environment is shared across test threads, so the cases run
    // sequentially within a single test.
    #[test]
    fn test_environment_from_process() {
        std::env::set_var("POD_NAME", "mariadb-galera-1");
        std::env::set_var("MARIADB_ROOT_PASSWORD", "mariadb");
        let env = Environment::from_process().unwrap();
        assert_eq!(env.pod_name, "mariadb-galera-1");
        assert_eq!(env.root_password, "mariadb");

        std::env::set_var("MARIADB_ROOT_PASSWORD", "");
        let err = Environment::from_process().unwrap_err();
        assert!(matches!(
            err,
            InitError::MissingEnv {
                name: "MARIADB_ROOT_PASSWORD"
            }
        ));

        std::env::remove_var("POD_NAME");
        let err = Environment::from_process().unwrap_err();
        assert!(matches!(err, InitError::MissingEnv { name: "POD_NAME" }));
        std::env::remove_var("MARIADB_ROOT_PASSWORD");
    }
}
