//! Usage: Notification bridge (page → native notification).
//!
//! The only host capability exposed to the loaded page. Delivery failures
//! are logged and swallowed; the bridge never surfaces an error to the page
//! and never retries.

#[cfg(desktop)]
use tauri_plugin_notification::NotificationExt;

/// Logs whether the OS notification surface answers at all. Runs once at
/// startup; an unavailable surface is non-fatal.
#[cfg(desktop)]
pub(crate) fn probe_support(app: &tauri::AppHandle) {
    match app.notification().permission_state() {
        Ok(state) => tracing::debug!(state = ?state, "notification surface available"),
        Err(err) => tracing::error!("notifications are not supported: {err}"),
    }
}

#[tauri::command]
pub(crate) fn create_notification(
    app: tauri::AppHandle,
    title: String,
    body: Option<String>,
    icon: Option<String>,
) {
    #[cfg(desktop)]
    if let Err(err) = show(&app, &title, body.as_deref(), icon.as_deref()) {
        tracing::warn!("notification delivery failed: {err}");
    }

    #[cfg(not(desktop))]
    let _ = (app, title, body, icon);
}

#[cfg(desktop)]
fn show(
    app: &tauri::AppHandle,
    title: &str,
    body: Option<&str>,
    icon: Option<&str>,
) -> Result<(), String> {
    let mut builder = app
        .notification()
        .builder()
        .title(title)
        .body(body.unwrap_or_default());
    if let Some(icon) = icon {
        builder = builder.icon(icon);
    }

    builder
        .show()
        .map_err(|e| format!("failed to show notification: {e}"))
}

/// Background-side notice helper used by the updater for its progress and
/// completion toasts. Same delivery path as the page bridge.
#[cfg(desktop)]
pub(crate) fn notify(app: &tauri::AppHandle, title: &str, body: &str) {
    if let Err(err) = show(app, title, Some(body), None) {
        tracing::warn!("notice delivery failed: {err}");
    }
}
