//! Tracing subscriber setup.

use std::path::Path;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber.
///
/// Logs go to stderr; with `log_dir` set they are also written to
/// `<log_dir>/client.log`.
pub fn setup_logging(log_dir: Option<&Path>) -> Result<()> {
    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;

            let file_appender = tracing_appender::rolling::never(dir, "client.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

            // Leak the guard to keep file writer alive
            std::mem::forget(guard);

            Some(fmt::layer().with_writer(non_blocking_file).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
