//! Usage: Main window construction and per-webview policy wiring
//! (navigation routing, notification shim injection, permission gate).

use std::sync::atomic::{AtomicU64, Ordering};

use tauri::{WebviewUrl, WebviewWindowBuilder};

use crate::link_policy::{self, LinkAction};

pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
pub(crate) const EITAA_WEB_URL: &str = "https://web.eitaa.com/";
pub(crate) const EITAA_WEB_HOST: &str = "web.eitaa.com";

const MAIN_WINDOW_WIDTH: f64 = 1200.0;
const MAIN_WINDOW_HEIGHT: f64 = 800.0;
const VIEWER_WINDOW_WIDTH: f64 = 900.0;
const VIEWER_WINDOW_HEIGHT: f64 = 650.0;

static VIEWER_WINDOW_SEQ: AtomicU64 = AtomicU64::new(0);

/// Injected into the page before any of its own script runs. Replaces the
/// web `Notification` constructor with a bridge into `create_notification`,
/// and logs the page's own permission request outcome without acting on it
/// (granting is the permission gate's job, not the bridge's).
const NOTIFICATION_BRIDGE_INIT: &str = r#"
(() => {
  if (window.__EITAA_DESKTOP__) return;
  window.__EITAA_DESKTOP__ = true;

  const invoke =
    (window.__TAURI__ && window.__TAURI__.core && window.__TAURI__.core.invoke) ||
    (window.__TAURI_INTERNALS__ && window.__TAURI_INTERNALS__.invoke);

  function createNotification(title, options = {}) {
    if (!invoke) return;
    invoke("create_notification", {
      title: String(title),
      body: options.body ? String(options.body) : null,
      icon: options.icon ? String(options.icon) : null,
    }).catch((err) => console.warn("[eitaa-desktop] notification bridge:", err));
  }

  const NativeNotification = window.Notification;

  function BridgedNotification(title, options) {
    createNotification(title, options || {});
    this.close = () => {};
    this.onclick = null;
    this.onshow = null;
    this.onerror = null;
    this.onclose = null;
  }
  BridgedNotification.permission = "granted";
  BridgedNotification.requestPermission = function (callback) {
    const result = Promise.resolve("granted");
    if (typeof callback === "function") result.then(callback);
    return result;
  };
  window.Notification = BridgedNotification;

  window.eitaaDesktop = { createNotification };

  if (NativeNotification && NativeNotification.requestPermission) {
    NativeNotification.requestPermission().then((permission) => {
      console.log("[eitaa-desktop] notification permission:", permission);
    });
  }
})();
"#;

/// Creates the single main window. The remote page runs isolated: no host
/// API is reachable from page script except the notification bridge command
/// granted through the remote capability.
pub(crate) fn create_main_window(app: &tauri::AppHandle) -> Result<(), String> {
    let url: tauri::Url = EITAA_WEB_URL
        .parse()
        .map_err(|e| format!("invalid web client url: {e}"))?;

    let handle = app.clone();
    let window = WebviewWindowBuilder::new(app, MAIN_WINDOW_LABEL, WebviewUrl::External(url))
        .title("Eitaa")
        .inner_size(MAIN_WINDOW_WIDTH, MAIN_WINDOW_HEIGHT)
        .initialization_script(NOTIFICATION_BRIDGE_INIT)
        .on_navigation(move |url| route_navigation(&handle, url))
        .build()
        .map_err(|e| format!("failed to create main window: {e}"))?;

    #[cfg(target_os = "linux")]
    attach_permission_gate(&window);
    #[cfg(not(target_os = "linux"))]
    drop(window);

    Ok(())
}

/// Navigation hook for the main window. Returns `true` to let the webview
/// navigate in place, `false` to suppress it after routing elsewhere.
fn route_navigation(app: &tauri::AppHandle, url: &tauri::Url) -> bool {
    // The shell's own origin always navigates in place: initial load and
    // in-app links must not bounce to the system browser.
    if link_policy::stays_in_app(url, EITAA_WEB_HOST) {
        return true;
    }

    match link_policy::route(url.as_str()) {
        LinkAction::OpenViewer => {
            tracing::debug!(url = %url, "opening object url in viewer window");
            let app = app.clone();
            let url = url.clone();
            tauri::async_runtime::spawn(async move {
                if let Err(err) = open_viewer_window(&app, url) {
                    tracing::warn!("viewer window failed: {err}");
                }
            });
            false
        }
        LinkAction::OpenExternal => {
            tracing::debug!(url = %url, "handing link to the OS default handler");
            let app = app.clone();
            let url = url.to_string();
            tauri::async_runtime::spawn(async move {
                use tauri_plugin_opener::OpenerExt;

                if let Err(err) = app.opener().open_url(&url, None::<&str>) {
                    tracing::warn!("failed to open external link: {err}");
                }
            });
            false
        }
        LinkAction::Navigate => true,
    }
}

/// Non-modal secondary viewer, smaller than the main window, with the same
/// isolation constraints (no bridge script, no capability grants).
fn open_viewer_window(app: &tauri::AppHandle, url: tauri::Url) -> Result<(), String> {
    let label = format!("viewer-{}", VIEWER_WINDOW_SEQ.fetch_add(1, Ordering::Relaxed));

    WebviewWindowBuilder::new(app, &label, WebviewUrl::External(url))
        .title("Eitaa Viewer")
        .inner_size(VIEWER_WINDOW_WIDTH, VIEWER_WINDOW_HEIGHT)
        .build()
        .map_err(|e| format!("failed to open viewer window: {e}"))?;

    Ok(())
}

/// Wires the pure permission policy into the platform webview. Only the
/// Linux webview surfaces page permission requests to the embedder.
#[cfg(target_os = "linux")]
fn attach_permission_gate(window: &tauri::WebviewWindow) {
    let result = window.with_webview(|webview| {
        use webkit2gtk::WebViewExt;

        webview.inner().connect_permission_request(|_, request| {
            use webkit2gtk::PermissionRequestExt;

            let name = permission_name(request);
            if crate::permissions::allow(name) {
                tracing::debug!(permission = name, "permission granted");
                request.allow();
            } else {
                tracing::debug!(permission = name, "permission denied");
                request.deny();
            }
            true
        });
    });

    if let Err(err) = result {
        tracing::warn!("permission gate not attached: {err}");
    }
}

#[cfg(target_os = "linux")]
fn permission_name(request: &webkit2gtk::PermissionRequest) -> &'static str {
    use gtk::glib::prelude::*;

    if request.is::<webkit2gtk::NotificationPermissionRequest>() {
        crate::permissions::NOTIFICATIONS
    } else if request.is::<webkit2gtk::GeolocationPermissionRequest>() {
        "geolocation"
    } else if request.is::<webkit2gtk::UserMediaPermissionRequest>() {
        "media"
    } else if request.is::<webkit2gtk::PointerLockPermissionRequest>() {
        "pointer-lock"
    } else if request.is::<webkit2gtk::DeviceInfoPermissionRequest>() {
        "device-info"
    } else {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_init_script_exposes_only_the_notification_surface() {
        assert!(NOTIFICATION_BRIDGE_INIT.contains("create_notification"));
        assert!(NOTIFICATION_BRIDGE_INIT.contains("window.Notification"));
        // The shim guards against double injection on in-app navigation.
        assert!(NOTIFICATION_BRIDGE_INIT.contains("__EITAA_DESKTOP__"));
    }

    #[test]
    fn app_origin_matches_only_the_eitaa_host() {
        let in_app: tauri::Url = "https://web.eitaa.com/#chat".parse().unwrap();
        let elsewhere: tauri::Url = "https://example.com/".parse().unwrap();

        assert!(link_policy::stays_in_app(&in_app, EITAA_WEB_HOST));
        assert!(!link_policy::stays_in_app(&elsewhere, EITAA_WEB_HOST));
    }
}
