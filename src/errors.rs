//! Init error taxonomy.
//!
//! Every variant maps to one failure class of the coordinator.  All of
//! them are fatal for the current run: the process logs the cause and
//! exits non-zero, leaving the orchestration platform to re-invoke it.
//! Transient readiness-oracle failures are not represented here; they
//! are absorbed by the poll loop and retried on the next tick.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal outcomes of a single coordinator run.
#[derive(Debug, Error)]
pub enum InitError {
    /// A mandatory environment variable is absent or empty.
    #[error("required environment variable {name} is not set")]
    MissingEnv { name: &'static str },

    /// Galera is not enabled on the fetched resource; rendering a
    /// cluster config for a non-clustered deployment would be misleading.
    #[error("Galera is not enabled on '{group}'")]
    FeatureDisabled { group: String },

    /// The declared SST method does not map to a known engine keyword.
    #[error("unsupported SST method '{method}'")]
    UnsupportedSstMethod { method: String },

    /// The topology cannot describe a cluster (zero replicas, or an
    /// ordinal outside the replica range).
    #[error("at least one replica is required to build a cluster address list")]
    InvalidTopology,

    /// Fetching or decoding the topology descriptor failed.
    #[error("error fetching topology descriptor: {0:#}")]
    Lookup(anyhow::Error),

    /// The pod name carries no trailing ordinal.
    #[error("pod name '{name}' has no trailing ordinal")]
    MalformedName { name: String },

    /// The join branch was reached by the first pod.  Unreachable when
    /// the decision rules are applied in order; kept as a guard.
    #[error("pod '{name}' is the first pod and has no predecessor")]
    NoPredecessor { name: String },

    /// Genuine I/O failure while inspecting the state directory.  An
    /// absent directory is the Fresh case, not an error.
    #[error("error reading state directory {path}: {source}")]
    StateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The readiness oracle reported a non-retryable failure.
    #[error("readiness oracle failed: {0:#}")]
    Oracle(anyhow::Error),

    /// The run was cancelled by an external shutdown signal.  A distinct
    /// terminal outcome, logged at info rather than as an application error.
    #[error("cancelled by shutdown signal")]
    Cancelled,
}
