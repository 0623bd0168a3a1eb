//! Usage: Pure decision logic (no tauri state, no IO): link routing,
//! permission policy, update state machine.

pub(crate) mod link_policy;
pub(crate) mod permissions;
pub(crate) mod update;
