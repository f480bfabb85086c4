use sfukit_common::config::{LogConfig, ObservabilityConfig};
use std::fs;
use tracing::{Dispatch, Subscriber};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::error::Result;

/// Keeps the non-blocking log writer alive
#[derive(Default)]
pub struct ObservabilityGuard {
    _log_guard: Option<WorkerGuard>,
}

/// Initialize logging based on the assembled configuration
pub fn init_observability(config: &ObservabilityConfig) -> Result<ObservabilityGuard> {
    let mut guard = ObservabilityGuard::default();

    if config.is_console_logging() {
        init_subscriber_with_writer(std::io::stdout, true, config);
    } else {
        fs::create_dir_all(&config.log.path)?;
        let (non_blocking, worker_guard) =
            build_file_writer(&config.log, config.should_rotate_logs())?;
        guard._log_guard = Some(worker_guard);
        init_subscriber_with_writer(non_blocking, false, config);
    }

    Ok(guard)
}

/// Logging for one-shot commands: stderr only, stdout stays machine-readable
pub fn init_command_logging(config: &ObservabilityConfig) {
    init_subscriber_with_writer(std::io::stderr, false, config);
}

/// Create an EnvFilter from config, with RUST_LOG taking precedence
fn create_env_filter(config: &ObservabilityConfig) -> EnvFilter {
    let directive = config.get_filter_level();

    EnvFilter::try_new(&directive).unwrap_or_else(|_| {
        eprintln!(
            "Failed to parse filter directive: {}. Falling back to default: info",
            directive
        );
        EnvFilter::new("info")
    })
}

/// Scoped stderr logging for the window before the configured subscriber exists
///
/// Assembly decides where logs go, so its own events are routed here instead.
pub fn bootstrap_dispatch() -> Dispatch {
    Dispatch::new(build_subscriber(
        std::io::stderr,
        false,
        &ObservabilityConfig::default(),
    ))
}

fn build_subscriber<W>(
    writer: W,
    use_ansi: bool,
    config: &ObservabilityConfig,
) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(use_ansi)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(create_env_filter(config))
        .with(fmt_layer)
}

fn init_subscriber_with_writer<W>(writer: W, use_ansi: bool, config: &ObservabilityConfig)
where
    W: for<'a> fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    build_subscriber(writer, use_ansi, config).try_init().ok();
}

fn build_file_writer(log_config: &LogConfig, rotate: bool) -> Result<(NonBlocking, WorkerGuard)> {
    if rotate {
        eprintln!(
            "Logging to {} (daily rotation)",
            std::path::Path::new(&log_config.path).join("sfukit.log").display()
        );
        let file_appender = tracing_appender::rolling::daily(&log_config.path, "sfukit.log");
        Ok(tracing_appender::non_blocking(file_appender))
    } else {
        let log_file_path = std::path::Path::new(&log_config.path).join("sfukit.log");
        eprintln!("Logging to {}", log_file_path.display());
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file_path)?;
        Ok(tracing_appender::non_blocking(file))
    }
}
