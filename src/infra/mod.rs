//! Usage: Side-effectful services (paths, asset injection sources, self-update).

pub(crate) mod app_paths;
pub(crate) mod assets;
#[cfg(desktop)]
pub(crate) mod updater;
