//! Logging Infrastructure
//!
//! `RUST_LOG` wins when set; otherwise `ye_server=<level>,tower_http=<level>`.
//! With a log directory, output also goes to a daily rolling file.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

fn default_filter(level: &str) -> String {
    format!("ye_server={level},tower_http={level}")
}

/// Initialize the logger
///
/// Keep the returned guard alive for the life of the process so buffered
/// file output is flushed on exit.
pub fn init_logger(log_level: &str, log_dir: Option<&str>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(log_level)));

    let stdout_layer = fmt::layer().with_target(false);

    let file = log_dir.filter(|dir| Path::new(dir).is_dir()).map(|dir| {
        let appender = tracing_appender::rolling::daily(dir, "ye-server.log");
        tracing_appender::non_blocking(appender)
    });

    match file {
        Some((writer, guard)) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            if let Some(dir) = log_dir {
                eprintln!("Log directory {dir} does not exist, logging to stdout only");
            }
            tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .init();
            None
        }
    }
}
