//! Tracing setup shared by the binaries.

use std::path::Path;

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;

/// Install the global subscriber at `RUST_LOG`'s level, or `default_level` when unset.
///
/// Logs go to stderr, or to a daily rolling file under `log_dir` when one is
/// given. The returned guard flushes the file writer and must be kept alive
/// until the program exits.
pub fn init_logging(
    log_dir: Option<&Path>,
    default_level: LevelFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let level = resolve_log_level(std::env::var("RUST_LOG").ok().as_deref(), default_level);

    let guard = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                anyhow::anyhow!("Failed to create log directory {}: {}", dir.display(), e)
            })?;
            let file_appender = tracing_appender::rolling::daily(dir, "shooters");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            // Already installed (e.g. by a test harness) is not fatal.
            let _ = tracing_subscriber::fmt()
                .with_max_level(level)
                .with_ansi(false)
                .with_writer(non_blocking)
                .try_init();
            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .try_init();
            None
        }
    };

    tracing::debug!("Shooter recipes v{}", crate::VERSION);
    Ok(guard)
}

fn resolve_log_level(value: Option<&str>, default_level: LevelFilter) -> LevelFilter {
    match value.map(|v| v.trim().to_lowercase()).as_deref() {
        Some("trace") => LevelFilter::TRACE,
        Some("debug") => LevelFilter::DEBUG,
        Some("warn") | Some("warning") => LevelFilter::WARN,
        Some("error") => LevelFilter::ERROR,
        Some("info") => LevelFilter::INFO,
        Some("off") => LevelFilter::OFF,
        _ => default_level,
    }
}
