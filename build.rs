fn main() {
    // Generate an inline `allow-create-notification` permission so the
    // remote capability can expose the bridge command to the web client.
    tauri_build::try_build(
        tauri_build::Attributes::new()
            .app_manifest(tauri_build::AppManifest::new().commands(&["create_notification"])),
    )
    .expect("failed to run tauri-build");
}
