//! Subscriber setup for the `tracing` events emitted by the core.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use classify_core::config::LogSettings;
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber for this process.
///
/// `RUST_LOG` takes precedence over the resolved level when set. Logs go to
/// stderr unless a log file is configured, so stdout only ever carries the
/// report. Nothing is installed when logging is switched off.
pub fn init_logging(settings: &LogSettings) -> Result<()> {
    if settings.level == LevelFilter::OFF {
        return Ok(());
    }

    let filter =
        EnvFilter::builder().with_default_directive(settings.level.into()).from_env_lossy();

    let (writer, ansi) = match &settings.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(io::stderr), true),
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer);
    let installed = if settings.structured {
        builder.json().try_init()
    } else {
        builder.with_ansi(ansi).with_target(false).try_init()
    };
    installed.map_err(|err| anyhow!("Failed to initialize logging: {err}"))?;

    debug!(level = %settings.level, structured = settings.structured, "Logging initialized");
    Ok(())
}
