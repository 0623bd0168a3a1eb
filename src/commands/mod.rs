//! Usage: Tauri command handlers reachable from webview contexts.

pub(crate) mod notifications;

pub(crate) use notifications::*;
