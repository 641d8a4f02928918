//! Logging initialization for hosts embedding the adapter

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global subscriber with optional daily-rolling file output.
///
/// Returns a guard that must be kept alive while logs should be flushed.
/// Calling this twice is harmless: the second registration is ignored.
pub fn init_logging(log_dir: Option<PathBuf>) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sftp_adapter=info,security=info"));

    let console_layer = fmt::layer().with_target(true).with_thread_ids(false);

    match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(&dir, "sftp-adapter.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let file_layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true);

            let installed = tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .try_init();
            if installed.is_err() {
                tracing::debug!("Subscriber already installed, file logging skipped");
            }

            Some(guard)
        }
        None => {
            let installed = tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .try_init();
            if installed.is_err() {
                tracing::debug!("Subscriber already installed, console logging unchanged");
            }

            None
        }
    }
}
