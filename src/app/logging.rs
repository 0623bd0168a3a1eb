//! Usage: tracing initialisation (stderr output plus a rolling file in the app data dir).

use std::sync::OnceLock;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_FILTER_ENV: &str = "EITAA_DESKTOP_LOG";
const DEFAULT_LOG_FILTER: &str = "info";
const LOG_DIR_NAME: &str = "logs";
const LOG_FILE_PREFIX: &str = "eitaa-desktop.log";

// The non-blocking appender stops flushing once its guard drops, so the guard
// lives for the whole process.
static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

pub(crate) fn init(app: &tauri::AppHandle) {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let file_layer = match crate::app_paths::app_data_dir(app) {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir.join(LOG_DIR_NAME), LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = LOG_GUARD.set(guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false),
            )
        }
        Err(err) => {
            eprintln!("file logging disabled: {err}");
            None
        }
    };

    if tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        // Already initialised (second `run()` in-process, e.g. under tests).
        return;
    }

    // Route `log` records from tauri and its plugins into tracing.
    let _ = tracing_log::LogTracer::init();
}
