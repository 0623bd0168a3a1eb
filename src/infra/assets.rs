//! Usage: Supplementary asset injection (CSS into the page cascade, JS into
//! the page context) on every finished page load.
//!
//! Both files are optional; a missing file is not an error, and a failed
//! read or eval is logged per occurrence without aborting anything else.

use std::path::{Path, PathBuf};

use tauri::webview::{PageLoadEvent, PageLoadPayload};

use crate::window::MAIN_WINDOW_LABEL;

pub(crate) const ASSETS_DIR_NAME: &str = "assets";
pub(crate) const STYLE_FILE_NAME: &str = "style.css";
pub(crate) const SCRIPT_FILE_NAME: &str = "script.js";

/// `Builder::on_page_load` hook. Fires repeatedly per session (in-app
/// navigation reloads the document), so injection must be re-run each time.
pub(crate) fn on_page_load<R: tauri::Runtime>(
    webview: &tauri::Webview<R>,
    payload: &PageLoadPayload<'_>,
) {
    if webview.label() != MAIN_WINDOW_LABEL {
        return;
    }
    if !matches!(payload.event(), PageLoadEvent::Finished) {
        return;
    }

    let Some(dir) = assets_dir(webview) else {
        return;
    };

    let webview = webview.clone();
    tauri::async_runtime::spawn(async move {
        for script in injection_scripts(&dir).await {
            if let Err(err) = webview.eval(&script) {
                tracing::warn!("asset injection failed: {err}");
            }
        }
    });
}

fn assets_dir<R: tauri::Runtime>(webview: &tauri::Webview<R>) -> Option<PathBuf> {
    use tauri::Manager;

    match webview.app_handle().path().resource_dir() {
        Ok(dir) => Some(dir.join(ASSETS_DIR_NAME)),
        Err(err) => {
            tracing::warn!("asset dir unresolved, skipping injection: {err}");
            None
        }
    }
}

/// Loads whichever supplementary assets exist and returns the scripts to
/// evaluate: a style-tag wrapper for the CSS, then the raw script.
pub(crate) async fn injection_scripts(dir: &Path) -> Vec<String> {
    let mut scripts = Vec::new();

    if let Some(css) = read_optional(&dir.join(STYLE_FILE_NAME)).await {
        scripts.push(css_inject_script(&css));
    }
    if let Some(js) = read_optional(&dir.join(SCRIPT_FILE_NAME)).await {
        scripts.push(js);
    }

    scripts
}

async fn read_optional(path: &Path) -> Option<String> {
    if !path.exists() {
        return None;
    }
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Some(contents),
        Err(err) => {
            tracing::warn!(path = %path.display(), "failed to read asset: {err}");
            None
        }
    }
}

/// Wraps stylesheet contents in a script that appends (or replaces) a
/// dedicated style tag. JSON-encoding the CSS yields a valid JS string
/// literal.
fn css_inject_script(css: &str) -> String {
    let encoded = serde_json::to_string(css).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        r#"(() => {{
  const id = "__eitaa_desktop_css__";
  let el = document.getElementById(id);
  if (!el) {{
    el = document.createElement("style");
    el.id = id;
    (document.head || document.documentElement).appendChild(el);
  }}
  el.textContent = {encoded};
}})();"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_assets_inject_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(injection_scripts(dir.path()).await.is_empty());
    }

    #[tokio::test]
    async fn present_assets_inject_css_then_js() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(STYLE_FILE_NAME), "body { color: red; }").unwrap();
        std::fs::write(dir.path().join(SCRIPT_FILE_NAME), "console.log('hi');").unwrap();

        let scripts = injection_scripts(dir.path()).await;
        assert_eq!(scripts.len(), 2);
        assert!(scripts[0].contains("__eitaa_desktop_css__"));
        assert!(scripts[0].contains("body { color: red; }"));
        assert_eq!(scripts[1], "console.log('hi');");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unreadable_assets_are_skipped_not_fatal() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STYLE_FILE_NAME);
        std::fs::write(&path, "body { color: red; }").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged test environments ignore permission bits; nothing to
        // observe there.
        if std::fs::read(&path).is_ok() {
            return;
        }

        assert!(injection_scripts(dir.path()).await.is_empty());
    }

    #[tokio::test]
    async fn one_asset_alone_still_injects() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SCRIPT_FILE_NAME), "1;").unwrap();

        let scripts = injection_scripts(dir.path()).await;
        assert_eq!(scripts, vec!["1;".to_string()]);
    }

    #[test]
    fn css_wrapper_escapes_into_a_js_string_literal() {
        let script = css_inject_script("a::before { content: \"x\"; }\n");
        assert!(script.contains(r#"\"x\""#));
        assert!(script.contains(r#"\n"#));
        assert!(!script.contains("content: \"x\"; }\n}"));
    }
}
