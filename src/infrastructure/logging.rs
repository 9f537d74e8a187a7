use std::io;

use anyhow::Result;
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{config::AppConfig, infrastructure::directories::ResolvedPaths};

pub const LOG_FILE_PREFIX: &str = "classifier.log";

// HTTP plumbing is chatty at debug; keep it at warn unless RUST_LOG asks otherwise.
const DEPENDENCY_DIRECTIVES: &[&str] = &[
    "hyper=warn",
    "hyper_util=warn",
    "h2=warn",
    "reqwest=warn",
    "tower_http=warn",
];

static INIT: OnceCell<()> = OnceCell::new();
static GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

fn default_directives(level: &str) -> String {
    let level = match level.trim() {
        "" => "info",
        level => level,
    };
    std::iter::once(level)
        .chain(DEPENDENCY_DIRECTIVES.iter().copied())
        .collect::<Vec<_>>()
        .join(",")
}

/// `RUST_LOG` wins; otherwise `LOG_LEVEL` plus the dependency caps; otherwise `info`.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(level)))
        .unwrap_or_else(|_| EnvFilter::new(default_directives("info")))
}

pub fn init_tracing(config: &AppConfig, paths: &ResolvedPaths) -> Result<()> {
    INIT.get_or_try_init::<_, anyhow::Error>(|| {
        let file_appender = tracing_appender::rolling::daily(&paths.logs_dir, LOG_FILE_PREFIX);
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        let _ = GUARD.set(guard);

        tracing_subscriber::registry()
            .with(build_filter(&config.logging.level))
            .with(fmt::layer().with_writer(io::stdout).with_target(true))
            .with(
                fmt::layer()
                    .with_writer(file_writer)
                    .with_target(true)
                    .with_ansi(false),
            )
            .try_init()?;

        tracing::info!(
            logs = %paths.logs_dir.display(),
            file = LOG_FILE_PREFIX,
            level = %config.logging.level,
            "tracing initialized"
        );
        Ok(())
    })?;
    Ok(())
}
