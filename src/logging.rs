//! File logging through `tracing`.
//!
//! The terminal belongs to the UI, so log output only ever goes to a file, and
//! only when one was requested on the command line.

use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const DEFAULT_LOG_LEVEL: &str = "pokeinfo=info,warn";

/// Installs the global subscriber writing to `path`. Returns `None` when `path` is `None`.
///
/// Keep the returned guard alive for the life of the process; dropping it flushes
/// and stops the background writer.
pub fn init(path: Option<&Path>, level: &str) -> io::Result<Option<WorkerGuard>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "log path has no file name"))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let filter = EnvFilter::try_new(level)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        dir, file_name,
    ));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(|err| io::Error::other(err.to_string()))?;

    tracing::info!(log_file = %path.display(), "pokeinfo starting");
    Ok(Some(guard))
}
