//! Tracing subscriber setup for the command line tool

use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable overriding the log filter
pub const LOG_ENV: &str = "MOBILE_VERSION_LOG";

/// Filter used when `MOBILE_VERSION_LOG` is unset
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "mobile_version=warn",
        1 => "mobile_version=info",
        _ => "mobile_version=debug",
    }
}

/// Install the global subscriber.
///
/// Human readable output goes to stderr so stdout only carries versions.
/// With `log_file`, events are also written there as JSON; keep the returned
/// guard alive until exit so buffered lines get flushed.
pub fn init(verbosity: u8, log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let stderr_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("log file path has no file name: {}", path.display()))?;

            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "mobile_version=warn")]
    #[case(1, "mobile_version=info")]
    #[case(2, "mobile_version=debug")]
    #[case(5, "mobile_version=debug")]
    fn default_directive_returns_expected(#[case] verbosity: u8, #[case] expected: &str) {
        assert_eq!(default_directive(verbosity), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(2)]
    fn default_directive_parses_as_filter(#[case] verbosity: u8) {
        assert!(EnvFilter::try_new(default_directive(verbosity)).is_ok());
    }
}
