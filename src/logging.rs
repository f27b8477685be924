//! File logging. The terminal belongs to the UI, so events go to
//! `<data_dir>/logs/lesson-planner.log` instead of stderr.

use std::io;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

pub const LOG_FILE: &str = "lesson-planner.log";

/// Install the global subscriber. Keep the guard alive for the whole run
/// or buffered lines are lost on exit.
///
/// `RUST_LOG` wins over the configured level.
pub fn init(config: &Config) -> io::Result<WorkerGuard> {
    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_log_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_toml_str(&format!(
            "data_dir = {:?}\nlog_level = \"debug\"\n",
            dir.path().display().to_string()
        ))
        .unwrap();

        let guard = init(&config).unwrap();
        tracing::info!("hello from the test");
        drop(guard);

        assert!(config.log_dir().is_dir());
        assert!(config.log_dir().join(LOG_FILE).exists());
    }
}
