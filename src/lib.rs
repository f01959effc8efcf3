//! galera-init — startup coordinator for Galera cluster nodes.
//!
//! Runs once per node boot inside a StatefulSet pod group and decides
//! whether this node founds the cluster or joins it: fetch the declared
//! topology, render the cluster config, classify local state, then
//! either write the bootstrap marker (ordinal 0, first boot) or block
//! until the predecessor node reports ready.

pub mod address;
pub mod config;
pub mod decision;
pub mod errors;
pub mod files;
pub mod identity;
pub mod kube;
pub mod poller;
pub mod readiness;
pub mod render;
pub mod state;
pub mod topology;
