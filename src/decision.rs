//! Bootstrap decision engine.
//!
//! The one real state machine in the coordinator.  Rules are evaluated
//! in strict order: an already-initialized node short-circuits before
//! any bootstrap/join consideration (idempotency across restarts), and
//! only ordinal 0 may ever bootstrap (exactly one founder per group —
//! every other ordinal joins against its immediate predecessor).

use crate::errors::InitError;
use crate::identity::NodeIdentity;
use crate::state::InitializationState;

/// Terminal decision for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapDecision {
    /// Local state already carries a cluster; nothing to do.
    SkipAlreadyInitialized,
    /// This node founds a brand-new cluster.
    Bootstrap,
    /// This node joins once its predecessor is ready.
    Join { predecessor_ordinal: u32 },
}

/// Apply the transition rules to the observed state and identity.
pub fn decide(
    state: InitializationState,
    identity: &NodeIdentity,
) -> Result<BootstrapDecision, InitError> {
    if state == InitializationState::AlreadyInitialized {
        return Ok(BootstrapDecision::SkipAlreadyInitialized);
    }
    if identity.ordinal == 0 {
        return Ok(BootstrapDecision::Bootstrap);
    }
    Ok(BootstrapDecision::Join {
        predecessor_ordinal: predecessor_ordinal(identity)?,
    })
}

/// The ordinal of the node that must be healthy before this one joins.
///
/// Guard for an invariant violation in the surrounding topology: the
/// first pod has no predecessor and never takes the join branch.
pub fn predecessor_ordinal(identity: &NodeIdentity) -> Result<u32, InitError> {
    if identity.ordinal == 0 {
        return Err(InitError::NoPredecessor {
            name: identity.name.clone(),
        });
    }
    Ok(identity.ordinal - 1)
}
