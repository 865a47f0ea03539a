//! Logging setup
//!
//! `RUST_LOG` wins when set; otherwise `LOG_LEVEL` applies to this crate
//! and to tower-http. With `LOG_DIR` output goes to a daily rolling file.

use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::core::LogConfig;

fn default_filter(level: &str) -> String {
    format!("storefront_server={level},tower_http={level}")
}

/// Initialize the global subscriber; a second call is a no-op
pub fn init_logger(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&config.level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false);

    let appender = config.dir.as_deref().and_then(|dir| {
        let log_path = Path::new(dir);
        if let Err(e) = std::fs::create_dir_all(log_path) {
            eprintln!("Cannot create log directory {dir}: {e}, logging to stdout");
            return None;
        }
        Some(tracing_appender::rolling::daily(log_path, "storefront-server"))
    });

    let result = match (appender, config.json) {
        (Some(file), true) => builder.json().with_writer(file).try_init(),
        (Some(file), false) => builder.with_ansi(false).with_writer(file).try_init(),
        (None, true) => builder.json().try_init(),
        (None, false) => builder.try_init(),
    };

    if result.is_err() {
        tracing::debug!("Logger already initialized");
    }
}
