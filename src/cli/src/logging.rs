use anyhow::{Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, time::SystemTime},
    prelude::*,
    EnvFilter,
};

pub const LOG_FILE_NAME: &str = "forwarder.log";

pub fn setup_logging(log_dir: Option<&str>) -> Result<()> {
    // RUST_LOG wins over the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = log_dir.map(|dir| {
        let file_appender = RollingFileAppender::new(Rotation::NEVER, dir, LOG_FILE_NAME);
        fmt::layer()
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(true)
            .with_target(true)
            .with_level(true)
            .with_timer(SystemTime)
            .with_ansi(false)
            .with_writer(file_appender)
    });

    let stderr_layer = log_dir.is_none().then(|| {
        fmt::layer()
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_writer(std::io::stderr)
    });

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    tracing::debug!("Logging system initialized");

    Ok(())
}
