//! Logging Infrastructure
//!
//! Structured logging setup for development (pretty) and production (JSON,
//! optional daily rolling file).

use std::path::Path;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "flashdrop_server=info,tower_http=info";

/// Initialize the global subscriber
///
/// `RUST_LOG` overrides the default filter. A `log_dir` that does not exist
/// is ignored and logs go to stdout.
pub fn init_logger(json: bool, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let file_dir = log_dir.map(Path::new).filter(|p| p.exists());

    match (json, file_dir) {
        (true, Some(dir)) => builder
            .json()
            .with_writer(tracing_appender::rolling::daily(dir, "flashdrop-server"))
            .init(),
        (true, None) => builder.json().init(),
        (false, Some(dir)) => builder
            .with_writer(tracing_appender::rolling::daily(dir, "flashdrop-server"))
            .init(),
        (false, None) => builder.init(),
    }
}
