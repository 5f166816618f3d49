use crate::config::LoggingConfig;
use log::LevelFilter;
use std::sync::{Once, OnceLock};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_log::LogTracer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize console logging from `RUST_LOG` (defaults to `info`).
/// Safe to call more than once; only the first call has an effect.
pub fn init_logger_with_env() {
    let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    init_logger_with_config(&level, &LoggingConfig::default());
}

/// Initialize logging with an explicit filter and optional daily-rotated file output
pub fn init_logger_with_config(level: &str, config: &LoggingConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

        let file_layer = if config.enable_file_logging {
            let appender =
                tracing_appender::rolling::daily(&config.log_dir, &config.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(fmt::layer().with_writer(writer).with_ansi(false).with_target(true))
        } else {
            None
        };

        let console_layer = fmt::layer()
            .with_target(false)
            .with_thread_names(true)
            .with_level(true);

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(file_layer);

        if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("Warning: Failed to initialize tracing subscriber: {}", e);
            return;
        }

        // Bridge `log` records (reqwest, hyper) into tracing
        if let Err(e) = LogTracer::init() {
            eprintln!("Warning: Failed to initialize LogTracer: {:?}", e);
        }

        log::set_max_level(level_filter(level));
    });
}

/// Map a filter string to the `log` crate's max level
fn level_filter(level: &str) -> LevelFilter {
    let base = level.split(',').next().unwrap_or("info").trim();
    // Directives like "endpoint_health=debug" carry the level after '='
    let base = base.rsplit('=').next().unwrap_or(base);
    base.parse::<LevelFilter>().unwrap_or(LevelFilter::Info)
}
