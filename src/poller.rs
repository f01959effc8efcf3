//! Predecessor readiness polling.
//!
//! The coordinator's single long-lived suspension point: a fixed
//! 1-second cadence over a [`ReadinessOracle`] until the target reports
//! ready, the run is cancelled, or the oracle fails non-retryably.
//! All file writes happen before this loop starts, so cancellation can
//! never leave a partially written artifact behind.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::InitError;
use crate::readiness::ReadinessOracle;

/// Fixed interval between readiness checks.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Block until the oracle reports ready.
///
/// The first check happens immediately.  Termination is exact: the loop
/// returns on the first `Ok(true)`, never earlier.  Cancellation is a
/// distinct [`InitError::Cancelled`] outcome, checked both before each
/// poll and while sleeping between polls.
pub async fn wait_until_ready(
    oracle: &dyn ReadinessOracle,
    cancel: &CancellationToken,
) -> Result<(), InitError> {
    loop {
        if cancel.is_cancelled() {
            return Err(InitError::Cancelled);
        }
        match oracle.check().await {
            Ok(true) => return Ok(()),
            Ok(false) => debug!("Not ready yet, retrying"),
            Err(err) => return Err(InitError::Oracle(err)),
        }
        tokio::select! {
            _ = cancel.cancelled() => return Err(InitError::Cancelled),
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Oracle scripted with a fixed sequence of responses; anything
    /// past the script repeats the final entry.
    struct ScriptedOracle {
        responses: Vec<anyhow::Result<bool>>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedOracle {
        fn new(responses: Vec<anyhow::Result<bool>>) -> Self {
            ScriptedOracle {
                responses,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl ReadinessOracle for ScriptedOracle {
        fn check(&self) -> Pin<Box<dyn Future<Output = anyhow::Result<bool>> + Send + '_>> {
            let index = self.calls.fetch_add(1, Ordering::SeqCst);
            let index = index.min(self.responses.len() - 1);
            let response = match &self.responses[index] {
                Ok(ready) => Ok(*ready),
                Err(err) => Err(anyhow::anyhow!("{err}")),
            };
            Box::pin(async move { response })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_tick_never_earlier() {
        let oracle = ScriptedOracle::new(vec![Ok(false), Ok(false), Ok(true)]);
        let cancel = CancellationToken::new();
        wait_until_ready(&oracle, &cancel).await.unwrap();
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediately_ready_polls_once() {
        let oracle = ScriptedOracle::new(vec![Ok(true)]);
        let cancel = CancellationToken::new();
        wait_until_ready(&oracle, &cancel).await.unwrap();
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_mid_wait_is_cancelled_not_ready() {
        let oracle = Arc::new(ScriptedOracle::new(vec![Ok(false)]));
        let cancel = CancellationToken::new();
        let waiter = {
            let oracle = Arc::clone(&oracle);
            let cancel = cancel.clone();
            tokio::spawn(async move { wait_until_ready(oracle.as_ref(), &cancel).await })
        };
        // Let a few polls happen, then pull the plug mid-sleep.
        tokio::time::sleep(Duration::from_millis(2500)).await;
        cancel.cancel();
        let outcome = waiter.await.unwrap();
        assert!(matches!(outcome, Err(InitError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_cancelled_never_polls() {
        let oracle = ScriptedOracle::new(vec![Ok(true)]);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = wait_until_ready(&oracle, &cancel).await;
        assert!(matches!(outcome, Err(InitError::Cancelled)));
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_oracle_error_surfaces() {
        let oracle = ScriptedOracle::new(vec![Ok(false), Err(anyhow::anyhow!("bad credentials"))]);
        let cancel = CancellationToken::new();
        let outcome = wait_until_ready(&oracle, &cancel).await;
        assert!(matches!(outcome, Err(InitError::Oracle(_))));
    }
}
