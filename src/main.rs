//! Pomodoro Timer - A single-screen terminal focus timer
//!
//! This is the main entry point for the pomodoro-timer application.

use std::path::Path;

use anyhow::Context;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use pomodoro_timer::{app, config::Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // The terminal belongs to the UI, so logs only go to a file
    let _log_guard = init_logging(&config)?;

    info!("Starting pomodoro-timer v1.0.0");
    info!(
        "Configuration: minutes={}, max_minutes={}, mute={}, player={:?}",
        config.minutes, config.max_minutes, config.mute, config.player
    );

    app::run(config).await
}

fn init_logging(config: &Config) -> anyhow::Result<Option<WorkerGuard>> {
    let Some(path) = &config.log_file else {
        return Ok(None);
    };

    let directory = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path {} has no file name", path.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));

    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_timer={}", config.log_level()))
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(Some(guard))
}
