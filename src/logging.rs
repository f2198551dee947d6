use std::sync::OnceLock;
use std::time::{Duration, Instant};

use crate::constants::{LOG_PREFIX_ERROR, LOG_PREFIX_SUCCESS};

pub struct LogConfig {
    pub debug_enabled: bool,
}

static LOG_CONFIG: OnceLock<LogConfig> = OnceLock::new();

impl LogConfig {
    pub fn init(debug: bool) {
        LOG_CONFIG.get_or_init(|| LogConfig {
            debug_enabled: debug,
        });
    }

    pub fn get() -> &'static LogConfig {
        LOG_CONFIG.get().unwrap_or_else(|| {
            static FALLBACK: LogConfig = LogConfig {
                debug_enabled: false,
            };
            &FALLBACK
        })
    }
}

pub fn setup_logging(log_level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let level = log_level
        .to_lowercase()
        .parse::<log::LevelFilter>()
        .unwrap_or(log::LevelFilter::Info);

    fern::Dispatch::new()
        .format(|out, message, record| {
            let level_str = match record.level() {
                log::Level::Error => "\x1b[1;31merror:\x1b[0m",
                log::Level::Warn => "\x1b[1;33mwarn:\x1b[0m",
                log::Level::Info => "\x1b[1;32minfo:\x1b[0m",
                log::Level::Debug => "\x1b[1;34mdebug:\x1b[0m",
                log::Level::Trace => "\x1b[1;35mtrace:\x1b[0m",
            };
            out.finish(format_args!("{} {}", level_str, message))
        })
        .level(level)
        // hyper and reqwest are chatty at debug
        .level_for("hyper", log::LevelFilter::Warn)
        .level_for("reqwest", log::LevelFilter::Warn)
        .chain(std::io::stdout())
        .apply()?;

    Ok(())
}

pub fn log_request(method: &str, path: &str, task: Option<&str>) {
    match task {
        Some(t) => log::info!(
            "{} {} (task: {})",
            method,
            sanitize_log_message(path),
            sanitize_log_message(t)
        ),
        None => log::info!("{} {}", method, sanitize_log_message(path)),
    }
}

pub fn log_timed(prefix: &str, operation: &str, start: Instant) {
    let formatted_duration = format_duration(start.elapsed());

    match prefix {
        LOG_PREFIX_SUCCESS => log::info!("{} | {}", operation, formatted_duration),
        LOG_PREFIX_ERROR => log::error!("{} | {}", operation, formatted_duration),
        _ => log::info!("{} | {}", operation, formatted_duration),
    }
}

pub fn format_duration(duration: Duration) -> String {
    let total_nanos = duration.as_nanos();

    if total_nanos < 1_000_000 {
        format!("{:.1}µs", total_nanos as f64 / 1_000.0)
    } else if total_nanos < 1_000_000_000 {
        format!("{:.2}ms", total_nanos as f64 / 1_000_000.0)
    } else {
        format!("{:.2}s", total_nanos as f64 / 1_000_000_000.0)
    }
}

pub fn sanitize_log_message(message: &str) -> String {
    message
        .chars()
        .map(|c| {
            if c.is_control() && !matches!(c, '\t' | '\n' | '\r') {
                '?'
            } else {
                c
            }
        })
        .collect()
}

/// Dumps handler input/output when running at debug level.
pub fn log_handler_io(stage: &str, body: &str) {
    if LogConfig::get().debug_enabled {
        log::debug!("{}: {}", stage, sanitize_log_message(body));
    }
}

#[cfg(test)]
mod logging_tests {
    use std::time::Duration;

    use super::{format_duration, sanitize_log_message};

    #[test]
    fn formats_each_duration_scale() {
        assert_eq!(format_duration(Duration::from_nanos(1_500)), "1.5µs");
        assert_eq!(format_duration(Duration::from_micros(2_500)), "2.50ms");
        assert_eq!(format_duration(Duration::from_millis(3_250)), "3.25s");
    }

    #[test]
    fn replaces_control_characters_but_keeps_whitespace() {
        assert_eq!(
            sanitize_log_message("/api/\u{1b}[31mx\tok\n"),
            "/api/?[31mx\tok\n"
        );
    }
}
