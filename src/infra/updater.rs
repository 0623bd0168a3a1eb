//! Usage: One-shot startup self-update check against the remote release
//! manifest.
//!
//! Network and parse failures are logged and abandoned silently; only a
//! failed download gets a user-visible error dialog. The check is never
//! rescheduled within a process lifetime.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use tokio::io::AsyncWriteExt;

use crate::commands::notifications;
use crate::resident;
use crate::update::{self, UpdateEvent, UpdateManifest, UpdateState};

const UPDATE_MANIFEST_URL: &str = "https://eitaa-desktop.github.io/releases/latest.json";
const FALLBACK_INSTALLER_NAME: &str = "eitaa-desktop-installer";
const DIALOG_TITLE: &str = "Eitaa Desktop Update";

pub(crate) async fn run_startup_check(app: &tauri::AppHandle) {
    let current = env!("CARGO_PKG_VERSION");
    let mut state = update::transition(UpdateState::Idle, current, UpdateEvent::CheckStarted);

    let event = match fetch_manifest().await {
        Ok(manifest) => UpdateEvent::ManifestFetched(manifest),
        Err(err) => {
            tracing::warn!("update check failed: {err}");
            UpdateEvent::CheckFailed
        }
    };
    state = update::transition(state, current, event);

    let manifest = match state {
        UpdateState::UpdateOffered(ref manifest) => manifest.clone(),
        UpdateState::UpToDate => {
            tracing::info!(version = current, "already running the latest version");
            return;
        }
        _ => return,
    };

    let event = if offer_update(app, &manifest).await {
        UpdateEvent::Accepted
    } else {
        tracing::info!(version = %manifest.version, "update declined");
        UpdateEvent::DeclinedByUser
    };
    state = update::transition(state, current, event);

    let UpdateState::Downloading { ref url } = state else {
        return;
    };
    let url = url.clone();

    notifications::notify(app, DIALOG_TITLE, "Downloading the update in the background.");

    let destination = std::env::temp_dir().join(installer_file_name(&url));
    let event = match download(&url, &destination).await {
        Ok(()) => UpdateEvent::DownloadFinished(destination),
        Err(err) => {
            tracing::error!("update download failed: {err}");
            show_error(app, "The update could not be downloaded. Please try again later.").await;
            UpdateEvent::DownloadFailed
        }
    };
    state = update::transition(state, current, event);

    if let UpdateState::Launching { installer } = state {
        notifications::notify(app, DIALOG_TITLE, "Download finished, starting the installer.");
        launch_installer(app, &installer);
    }
}

async fn fetch_manifest() -> Result<UpdateManifest, String> {
    let response = reqwest::get(UPDATE_MANIFEST_URL)
        .await
        .map_err(|e| format!("manifest request failed: {e}"))?
        .error_for_status()
        .map_err(|e| format!("manifest request rejected: {e}"))?;

    response
        .json::<UpdateManifest>()
        .await
        .map_err(|e| format!("manifest parse failed: {e}"))
}

/// Modal yes/no prompt. Runs on a blocking thread so the checker task never
/// parks a runtime worker on the dialog.
async fn offer_update(app: &tauri::AppHandle, manifest: &UpdateManifest) -> bool {
    let dialog = app
        .dialog()
        .message(format!(
            "Version {} is available (you have {}).\nDownload and install it now?",
            manifest.version,
            env!("CARGO_PKG_VERSION"),
        ))
        .title(DIALOG_TITLE)
        .kind(MessageDialogKind::Info)
        .buttons(MessageDialogButtons::YesNo);

    tauri::async_runtime::spawn_blocking(move || dialog.blocking_show())
        .await
        .unwrap_or(false)
}

async fn show_error(app: &tauri::AppHandle, message: &str) {
    let dialog = app
        .dialog()
        .message(message)
        .title(DIALOG_TITLE)
        .kind(MessageDialogKind::Error)
        .buttons(MessageDialogButtons::Ok);

    let _ = tauri::async_runtime::spawn_blocking(move || dialog.blocking_show()).await;
}

async fn download(url: &str, destination: &Path) -> Result<(), String> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| format!("download request failed: {e}"))?
        .error_for_status()
        .map_err(|e| format!("download request rejected: {e}"))?;

    let mut file = tokio::fs::File::create(destination)
        .await
        .map_err(|e| format!("failed to create {}: {e}", destination.display()))?;

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| format!("download stream failed: {e}"))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| format!("failed to write {}: {e}", destination.display()))?;
    }
    file.flush()
        .await
        .map_err(|e| format!("failed to flush {}: {e}", destination.display()))?;

    Ok(())
}

/// Hands the downloaded installer to the OS shell, then exits so the
/// installer can replace the running binary.
fn launch_installer(app: &tauri::AppHandle, installer: &Path) {
    use tauri_plugin_opener::OpenerExt;

    tracing::info!(installer = %installer.display(), "launching installer and exiting");
    if let Err(err) = app
        .opener()
        .open_path(installer.to_string_lossy(), None::<&str>)
    {
        tracing::error!("failed to launch installer: {err}");
        return;
    }

    resident::request_quit(app);
}

fn installer_file_name(url: &str) -> PathBuf {
    let name = url
        .rsplit('/')
        .next()
        .map(|segment| segment.split(['?', '#']).next().unwrap_or(segment))
        .filter(|name| !name.is_empty() && name.chars().all(is_safe_file_name_char))
        .unwrap_or(FALLBACK_INSTALLER_NAME);
    PathBuf::from(name)
}

fn is_safe_file_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installer_name_comes_from_the_last_url_segment() {
        assert_eq!(
            installer_file_name("https://x/y/eitaa-setup-1.0.1.exe"),
            PathBuf::from("eitaa-setup-1.0.1.exe")
        );
        assert_eq!(
            installer_file_name("https://x/y.AppImage?token=abc"),
            PathBuf::from("y.AppImage")
        );
    }

    #[test]
    fn unusable_url_segments_fall_back_to_a_fixed_name() {
        assert_eq!(
            installer_file_name("https://x/"),
            PathBuf::from(FALLBACK_INSTALLER_NAME)
        );
        assert_eq!(
            installer_file_name("https://x/a%20b.exe"),
            PathBuf::from(FALLBACK_INSTALLER_NAME)
        );
        assert_eq!(
            installer_file_name(""),
            PathBuf::from(FALLBACK_INSTALLER_NAME)
        );
    }
}
