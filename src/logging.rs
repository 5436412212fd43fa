// Copyright (c) 2026 rezky_nightky

use std::io;
use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

/// The screen belongs to the rain, so logs only ever go to a file, and only
/// when a directory is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: Level,
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            log_dir: None,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("GLYPHFALL_LOG_DIR").ok(),
            std::env::var("GLYPHFALL_LOG_LEVEL").ok(),
        )
    }

    fn from_vars(dir: Option<String>, level: Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(parsed) = level.and_then(|l| l.parse::<Level>().ok()) {
            config.level = parsed;
        }
        config.log_dir = dir.filter(|d| !d.is_empty()).map(PathBuf::from);
        config
    }
}

pub fn init_logging(config: &LoggingConfig) -> io::Result<Option<WorkerGuard>> {
    let Some(log_dir) = &config.log_dir else {
        return Ok(None);
    };
    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "glyphfall.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::builder()
        .with_default_directive(config.level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_filter(filter),
        )
        .init();

    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_is_off_without_a_directory() {
        let config = LoggingConfig::from_vars(None, Some("info".into()));
        assert_eq!(config.log_dir, None);
        assert_eq!(config.level, Level::INFO);
        assert!(init_logging(&config).unwrap().is_none());
    }

    #[test]
    fn bad_level_falls_back_to_debug() {
        let config = LoggingConfig::from_vars(Some("/tmp/rain".into()), Some("loud".into()));
        assert_eq!(config.level, Level::DEBUG);
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/rain")));
        assert_eq!(LoggingConfig::from_vars(Some(String::new()), None).log_dir, None);
    }
}
