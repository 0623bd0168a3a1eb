//! Usage: Desktop resident mode (tray icon + window lifecycle hooks).
//!
//! Closing the main window while the app is not quitting hides it instead,
//! so tray-driven show/hide keeps the loaded page state alive.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::window::MAIN_WINDOW_LABEL;

const TRAY_ID: &str = "main-tray";
const TRAY_MENU_SHOW_ID: &str = "tray.show";
const TRAY_MENU_AUTOSTART_ID: &str = "tray.autostart";
const TRAY_MENU_QUIT_ID: &str = "tray.quit";

#[derive(Default)]
pub(crate) struct QuitState {
    quitting: AtomicBool,
}

impl QuitState {
    pub(crate) fn set_quitting(&self) {
        self.quitting.store(true, Ordering::Relaxed);
    }

    pub(crate) fn is_quitting(&self) -> bool {
        self.quitting.load(Ordering::Relaxed)
    }
}

// Menu labels follow the product locale (Persian).
fn autostart_label(enabled: bool) -> &'static str {
    if enabled {
        "اجرای خودکار: روشن"
    } else {
        "اجرای خودکار: خاموش"
    }
}

#[cfg(not(desktop))]
pub(crate) fn setup_tray(_app: &tauri::AppHandle) -> Result<(), String> {
    Ok(())
}

#[cfg(not(desktop))]
pub(crate) fn show_main_window(_app: &tauri::AppHandle) {}

#[cfg(not(desktop))]
pub(crate) fn request_quit(app: &tauri::AppHandle) {
    use tauri::Manager;

    app.state::<QuitState>().set_quitting();
    app.exit(0);
}

#[cfg(not(desktop))]
pub(crate) fn on_window_event(_window: &tauri::Window, _event: &tauri::WindowEvent) {}

#[cfg(desktop)]
use tauri::menu::{Menu, MenuItem, PredefinedMenuItem};
#[cfg(desktop)]
use tauri::tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent};
#[cfg(desktop)]
use tauri::Manager;
#[cfg(desktop)]
use tauri_plugin_autostart::ManagerExt;

/// Builds the tray from scratch. Any existing tray with the same id is
/// removed first, so the auto-launch label always reflects the persisted
/// login-item state.
#[cfg(desktop)]
pub(crate) fn setup_tray(app: &tauri::AppHandle) -> Result<(), String> {
    drop(app.remove_tray_by_id(TRAY_ID));

    let autostart_enabled = app.autolaunch().is_enabled().unwrap_or(false);

    let show_item = MenuItem::with_id(app, TRAY_MENU_SHOW_ID, "نمایش", true, None::<&str>)
        .map_err(|e| format!("failed to create tray show menu item: {e}"))?;
    let autostart_item = MenuItem::with_id(
        app,
        TRAY_MENU_AUTOSTART_ID,
        autostart_label(autostart_enabled),
        true,
        None::<&str>,
    )
    .map_err(|e| format!("failed to create tray autostart menu item: {e}"))?;
    let quit_item = MenuItem::with_id(app, TRAY_MENU_QUIT_ID, "خروج", true, None::<&str>)
        .map_err(|e| format!("failed to create tray quit menu item: {e}"))?;
    let separator = PredefinedMenuItem::separator(app)
        .map_err(|e| format!("failed to create tray menu separator: {e}"))?;

    let menu = Menu::with_items(app, &[&show_item, &autostart_item, &separator, &quit_item])
        .map_err(|e| format!("failed to create tray menu: {e}"))?;

    let show_id = show_item.id().clone();
    let autostart_id = autostart_item.id().clone();
    let quit_id = quit_item.id().clone();

    #[cfg(target_os = "macos")]
    let icon_bytes = include_bytes!("../../icons/trayTemplate.png");
    #[cfg(not(target_os = "macos"))]
    let icon_bytes = include_bytes!("../../icons/32x32.png");

    let icon = tauri::image::Image::from_bytes(icon_bytes)
        .map_err(|e| format!("failed to load tray icon: {e}"))?;

    let tray_builder = TrayIconBuilder::with_id(TRAY_ID)
        .icon(icon)
        .tooltip("Eitaa")
        .menu(&menu);

    #[cfg(target_os = "macos")]
    let tray_builder = tray_builder.icon_as_template(true);

    tray_builder
        .show_menu_on_left_click(false)
        .on_menu_event(move |app, event| {
            if event.id == quit_id {
                request_quit(app);
                return;
            }
            if event.id == show_id {
                show_main_window(app);
                return;
            }
            if event.id == autostart_id {
                toggle_autostart(app);
            }
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button,
                button_state,
                ..
            } = event
            {
                if button == MouseButton::Left && button_state == MouseButtonState::Up {
                    toggle_main_window(tray.app_handle());
                }
            }
        })
        .build(app)
        .map_err(|e| format!("failed to build tray icon: {e}"))?;

    Ok(())
}

/// Flips the OS login-item setting, then rebuilds the tray so the menu
/// label matches the new state.
#[cfg(desktop)]
fn toggle_autostart(app: &tauri::AppHandle) {
    let autolaunch = app.autolaunch();
    let enabled = autolaunch.is_enabled().unwrap_or(false);

    let result = if enabled {
        autolaunch.disable()
    } else {
        autolaunch.enable()
    };
    match result {
        Ok(()) => tracing::info!(enabled = !enabled, "auto-launch at login toggled"),
        Err(err) => tracing::error!("failed to toggle auto-launch: {err}"),
    }

    if let Err(err) = setup_tray(app) {
        tracing::error!("tray rebuild failed: {err}");
    }
}

#[cfg(desktop)]
pub(crate) fn show_main_window(app: &tauri::AppHandle) {
    let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) else {
        return;
    };

    let _ = window.show();
    let _ = window.unminimize();
    let _ = window.set_focus();
}

#[cfg(desktop)]
fn toggle_main_window(app: &tauri::AppHandle) {
    let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) else {
        return;
    };

    let is_visible = window.is_visible().unwrap_or(false);
    let is_minimized = window.is_minimized().unwrap_or(false);

    if !is_visible || is_minimized {
        show_main_window(app);
        return;
    }

    let _ = window.hide();
}

#[cfg(desktop)]
pub(crate) fn request_quit(app: &tauri::AppHandle) {
    app.state::<QuitState>().set_quitting();
    app.exit(0);
}

#[cfg(desktop)]
pub(crate) fn on_window_event(window: &tauri::Window, event: &tauri::WindowEvent) {
    if window.label() != MAIN_WINDOW_LABEL {
        return;
    }

    let tauri::WindowEvent::CloseRequested { api, .. } = event else {
        return;
    };

    if window.state::<QuitState>().is_quitting() {
        return;
    }

    api.prevent_close();
    let _ = window.hide();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autostart_menu_label_encodes_each_state() {
        assert!(autostart_label(true).ends_with("روشن"));
        assert!(autostart_label(false).ends_with("خاموش"));
        assert_ne!(autostart_label(true), autostart_label(false));
    }

    #[test]
    fn quit_state_starts_false_and_latches() {
        let state = QuitState::default();
        assert!(!state.is_quitting());
        state.set_quitting();
        assert!(state.is_quitting());
        state.set_quitting();
        assert!(state.is_quitting());
    }
}
