//! Readiness oracles.
//!
//! A readiness oracle answers one question: is the predecessor node
//! healthy enough to be joined against?  The poller depends only on
//! the [`ReadinessOracle`] trait; two interchangeable implementations
//! exist — a platform pod-status query and a direct liveness probe.

use std::future::Future;
use std::pin::Pin;

pub mod platform;
pub mod probe;

/// Async readiness contract.
///
/// `Ok(false)` covers both "not yet ready" and transient query
/// failures — implementations retry those by reporting not-ready.
/// `Err` is reserved for non-retryable failures that should tear the
/// poll loop down.
pub trait ReadinessOracle: Send + Sync {
    /// One readiness check against the oracle's target.
    fn check(&self) -> Pin<Box<dyn Future<Output = anyhow::Result<bool>> + Send + '_>>;
}
