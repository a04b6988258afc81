//! Navbar logging bootstrap.
//!
//! # Responsibility
//! - Start the rolling file logger once per host process.
//! - Keep every navbar diagnostic line metadata-only (`key=value`).
//!
//! # Invariants
//! - Repeated init with the same level and directory is a no-op.
//! - A second init that changes level or directory is rejected.
//! - Init never panics, and neither does the installed panic hook.
//! - Session payloads are never written to logs.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "navbar";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static ACTIVE_LOGGER: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    level: &'static str,
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

/// Starts navbar logging at `level`, writing rolling files into `log_dir`.
///
/// # Errors
/// - `level` is not one of `trace|debug|info|warn|error`.
/// - `log_dir` is empty, relative, or cannot be created.
/// - Logging is already active with a different level or directory.
/// - The `flexi_logger` backend refuses to start.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let level = parse_level(level)?;
    let log_dir = parse_log_dir(log_dir)?;

    if let Some(active) = ACTIVE_LOGGER.get() {
        return ensure_same_config(active, level, &log_dir);
    }

    let active = ACTIVE_LOGGER.get_or_try_init(|| start_logger(level, &log_dir))?;
    ensure_same_config(active, level, &log_dir)
}

/// Returns `(level, log_dir)` of the active logger, or `None` before init.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE_LOGGER
        .get()
        .map(|active| (active.level, active.log_dir.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(level: &'static str, log_dir: &Path) -> Result<ActiveLogger, String> {
    std::fs::create_dir_all(log_dir).map_err(|err| {
        format!(
            "failed to create log directory `{}`: {err}",
            log_dir.display()
        )
    })?;

    let handle = Logger::try_with_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    install_panic_hook();

    info!(
        "event=logging_init module=navbar status=ok level={} log_dir={} version={}",
        level,
        log_dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        level,
        log_dir: log_dir.to_path_buf(),
        _handle: handle,
    })
}

fn ensure_same_config(active: &ActiveLogger, level: &str, log_dir: &Path) -> Result<(), String> {
    if active.log_dir != log_dir {
        return Err(format!(
            "logging already initialized at `{}`; refusing to switch to `{}`",
            active.log_dir.display(),
            log_dir.display()
        ));
    }
    if active.level != level {
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            active.level, level
        ));
    }
    Ok(())
}

fn parse_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

fn parse_log_dir(log_dir: &str) -> Result<PathBuf, String> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(format!("log_dir must be an absolute path, got `{trimmed}`"));
    }
    Ok(path.to_path_buf())
}

fn install_panic_hook() {
    if PANIC_HOOK.get().is_some() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = if let Some(message) = panic_info.payload().downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = panic_info.payload().downcast_ref::<String>() {
            message.clone()
        } else {
            "non-string panic payload".to_string()
        };
        error!(
            "event=panic_captured module=navbar status=error location={} payload={}",
            location,
            single_line(&payload, MAX_PANIC_PAYLOAD_CHARS)
        );
        previous_hook(panic_info);
    }));

    let _ = PANIC_HOOK.set(());
}

/// Collapses line breaks and caps length so one value stays on one log line.
pub(crate) fn single_line(value: &str, max_chars: usize) -> String {
    let flattened = value.replace(['\n', '\r'], " ");
    let mut capped = flattened.chars().take(max_chars).collect::<String>();
    if flattened.chars().count() > max_chars {
        capped.push_str("...");
    }
    capped
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, parse_level, parse_log_dir, single_line};

    #[test]
    fn parse_level_accepts_known_values() {
        assert_eq!(parse_level("DEBUG").expect("DEBUG should parse"), "debug");
        assert_eq!(parse_level(" warning ").expect("warning should parse"), "warn");
        assert!(parse_level("verbose").is_err());
    }

    #[test]
    fn parse_log_dir_rejects_relative_and_empty_paths() {
        let error = parse_log_dir("logs/navbar").expect_err("relative path must fail");
        assert!(error.contains("absolute"));
        let error = parse_log_dir("   ").expect_err("empty path must fail");
        assert!(error.contains("empty"));
    }

    #[test]
    fn single_line_flattens_and_caps() {
        let value = single_line("first\nsecond\rthird", 10);
        assert!(!value.contains('\n'));
        assert!(!value.contains('\r'));
        assert!(value.ends_with("..."));
        assert_eq!(single_line("short", 10), "short");
    }

    #[test]
    fn init_logging_is_idempotent_and_rejects_reconfiguration() {
        let dir = tempfile::tempdir().expect("temp dir");
        let other = tempfile::tempdir().expect("second temp dir");
        let dir_str = dir.path().to_str().expect("utf-8 temp dir").to_string();
        let other_str = other.path().to_str().expect("utf-8 temp dir").to_string();

        init_logging("info", &dir_str).expect("first init should succeed");
        init_logging("INFO", &dir_str).expect("same config should be a no-op");

        let err = init_logging("debug", &dir_str).expect_err("level switch must fail");
        assert!(err.contains("refusing to switch"));
        let err = init_logging("info", &other_str).expect_err("dir switch must fail");
        assert!(err.contains("refusing to switch"));

        let (level, active_dir) = logging_status().expect("logging should be active");
        assert_eq!(level, "info");
        assert_eq!(active_dir, dir.path());
    }
}
