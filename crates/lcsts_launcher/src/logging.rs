//! Logging - stderr plus an optional daily log file
//!
//! A log directory that cannot be created only disables the file layer;
//! it never stops the trainer from starting.

use anyhow::{Context, Result};
use std::any::Any;
use std::path::Path;
use std::sync::Mutex;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_FILE_PREFIX: &str = "lcsts_launcher.log";

/// Held here rather than in `main` so `flush` can run before `process::exit`.
static FILE_GUARD: Mutex<Option<WorkerGuard>> = Mutex::new(None);

/// Daily-rotating appender in `log_dir`, created on demand.
pub fn file_appender(log_dir: &Path) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(log_dir)
        .with_context(|| format!("Cannot log to {}", log_dir.display()))
}

pub fn init(log_dir: Option<&Path>) {
    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    let (file_layer, failure) = match log_dir.map(file_appender) {
        Some(Ok(appender)) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            if let Ok(mut slot) = FILE_GUARD.lock() {
                *slot = Some(guard);
            }
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false);
            (Some(layer), None)
        }
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };

    // stdout is kept for command output
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    if let Some(e) = failure {
        warn!("File logging disabled: {:#}", e);
    }
}

/// Write out buffered file-log lines. Safe to call more than once.
pub fn flush() {
    if let Ok(mut slot) = FILE_GUARD.lock() {
        slot.take();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Log panics with the subcommand that was running.
pub fn install_panic_hook(command: &'static str) {
    std::panic::set_hook(Box::new(move |panic_info| {
        let msg = panic_message(panic_info.payload());
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        tracing::error!(target: "lcsts_launcher", "🔥 `{}` panicked at {}: {}", command, location, msg);
        // abort follows; nothing else will drop the guard
        flush();
    }));
}
