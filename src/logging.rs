use std::path::PathBuf;

use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Env var naming a log file. Overrides `logging.file` from the config.
pub const LOG_FILE_ENV: &str = "NAVSYNC_LOG";

/// Initialize tracing for the binary.
///
/// `RUST_LOG` wins over `logging.level`. Output goes to the file named by
/// `NAVSYNC_LOG` or `logging.file`, and to stderr otherwise, so stdout
/// stays reserved for command output.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let log_path = std::env::var_os(LOG_FILE_ENV)
        .map(PathBuf::from)
        .or_else(|| config.file.clone());

    let file = log_path.and_then(|path| match std::fs::File::create(&path) {
        Ok(file) => Some(file),
        Err(err) => {
            eprintln!("Warning: Failed to create log file {}: {}", path.display(), err);
            None
        }
    });

    let registry = tracing_subscriber::registry().with(filter);
    match file {
        Some(file) => registry
            .with(
                fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false)
                    .with_target(true)
                    .with_timer(UtcTime::rfc_3339()),
            )
            .init(),
        None => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_timer(UtcTime::rfc_3339()),
            )
            .init(),
    }
}
