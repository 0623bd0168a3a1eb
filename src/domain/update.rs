//! Usage: Update manifest model, semantic-version comparison and the
//! checker state machine.
//!
//! `Idle → Checking → {UpToDate | UpdateOffered → {Downloading → Launching}
//! | Declined} → Idle`. The driver in `infra::updater` feeds events through
//! `transition`; stray events leave the state unchanged, which pins down
//! re-entrancy if the checker were ever invoked twice.

use std::path::PathBuf;

use semver::Version;
use serde::Deserialize;

/// Remote release manifest, discarded after the check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct UpdateManifest {
    /// Semantic version of the latest release.
    pub version: String,
    /// Download URL for the latest installer.
    pub latest: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UpdateState {
    Idle,
    Checking,
    UpToDate,
    UpdateOffered(UpdateManifest),
    Declined,
    Downloading { url: String },
    Launching { installer: PathBuf },
}

#[derive(Debug)]
pub(crate) enum UpdateEvent {
    CheckStarted,
    ManifestFetched(UpdateManifest),
    CheckFailed,
    Accepted,
    DeclinedByUser,
    DownloadFinished(PathBuf),
    DownloadFailed,
}

/// Strict semantic-version precedence: remote must be greater than current.
pub(crate) fn is_newer(remote: &str, current: &str) -> Result<bool, String> {
    let remote =
        Version::parse(remote).map_err(|e| format!("invalid remote version {remote:?}: {e}"))?;
    let current =
        Version::parse(current).map_err(|e| format!("invalid current version {current:?}: {e}"))?;
    Ok(remote > current)
}

pub(crate) fn transition(
    state: UpdateState,
    current_version: &str,
    event: UpdateEvent,
) -> UpdateState {
    match (state, event) {
        (UpdateState::Idle, UpdateEvent::CheckStarted) => UpdateState::Checking,
        (UpdateState::Checking, UpdateEvent::ManifestFetched(manifest)) => {
            match is_newer(&manifest.version, current_version) {
                Ok(true) => UpdateState::UpdateOffered(manifest),
                Ok(false) => UpdateState::UpToDate,
                Err(err) => {
                    tracing::warn!("update manifest rejected: {err}");
                    UpdateState::Idle
                }
            }
        }
        (UpdateState::Checking, UpdateEvent::CheckFailed) => UpdateState::Idle,
        (UpdateState::UpdateOffered(manifest), UpdateEvent::Accepted) => UpdateState::Downloading {
            url: manifest.latest,
        },
        (UpdateState::UpdateOffered(_), UpdateEvent::DeclinedByUser) => UpdateState::Declined,
        (UpdateState::Downloading { .. }, UpdateEvent::DownloadFinished(installer)) => {
            UpdateState::Launching { installer }
        }
        (UpdateState::Downloading { .. }, UpdateEvent::DownloadFailed) => UpdateState::Idle,
        (state, event) => {
            tracing::debug!(state = ?state, event = ?event, "update event ignored in this state");
            state
        }
    }
}
