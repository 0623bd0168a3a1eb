mod app;
mod commands;
mod domain;
mod infra;

pub(crate) use app::{resident, window};
pub(crate) use domain::{link_policy, permissions, update};
#[cfg(desktop)]
pub(crate) use infra::updater;
pub(crate) use infra::{app_paths, assets};

use commands::*;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let builder = tauri::Builder::default()
        .manage(resident::QuitState::default())
        .plugin(tauri_plugin_opener::init());

    #[cfg(desktop)]
    let builder = builder
        .plugin(tauri_plugin_autostart::Builder::new().build())
        .plugin(tauri_plugin_notification::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            resident::show_main_window(app);
        }));

    let app = builder
        .on_window_event(resident::on_window_event)
        .on_page_load(assets::on_page_load)
        .setup(|app| {
            app::logging::init(app.handle());

            window::create_main_window(app.handle())?;

            #[cfg(desktop)]
            {
                commands::notifications::probe_support(app.handle());

                if let Err(err) = resident::setup_tray(app.handle()) {
                    tracing::error!("tray setup failed: {err}");
                }

                let app_handle = app.handle().clone();
                tauri::async_runtime::spawn(async move {
                    updater::run_startup_check(&app_handle).await;
                });
            }

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![create_notification])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|app_handle, event| {
        let _ = (&app_handle, &event);

        #[cfg(target_os = "macos")]
        if let tauri::RunEvent::Reopen {
            has_visible_windows,
            ..
        } = event
        {
            if !has_visible_windows {
                resident::show_main_window(app_handle);
            }
        }
    });
}
