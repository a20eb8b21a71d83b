use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Keeps the non-blocking file writer alive; drop it last.
#[allow(dead_code)]
pub struct LogGuard(tracing_appender::non_blocking::WorkerGuard);

/// Initialize logging.
///
/// Logs are filtered at `LOG_LEVEL`, raised to `debug` when `verbose`.
/// With `LOG_PATH` set they go to that file through a non-blocking writer and
/// the returned guard must be held until exit; otherwise they go to stderr.
/// `RUST_LOG` overrides either filter.
pub fn init(config: &crate::config::Config, verbose: bool) -> Result<Option<LogGuard>> {
    let level = effective_level(&config.log_level, verbose);

    let Some(raw_path) = config.log_path.as_deref() else {
        tracing_subscriber::fmt()
            .with_env_filter(filter_for(level))
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
            .ok(); // If already initialized (e.g., in tests), don't crash.
        return Ok(None);
    };

    let log_path = PathBuf::from(crate::util::expand_tilde(raw_path));
    ensure_parent_dir(&log_path)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer)
        .try_init()
        .ok();

    tracing::info!(log_file = %log_path.display(), level = %level, "writing logs to file");

    Ok(Some(LogGuard(guard)))
}

fn effective_level(log_level: &str, verbose: bool) -> &str {
    if verbose {
        "debug"
    } else {
        log_level
    }
}

/// This crate at `level`, everything else at warn.
fn directive(level: &str) -> String {
    format!("tavily_tools={level},warn")
}

/// `RUST_LOG` if set, else [`directive`].
fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive(level)))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Best-effort redaction for Tavily API keys (`tvly-...`).
pub fn redact_secrets(input: &str) -> String {
    const PREFIX: &str = "tvly-";

    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut last = 0usize;
    let mut i = 0usize;

    while i < input.len() {
        if input[i..].starts_with(PREFIX) {
            let mut j = i + PREFIX.len();
            while j < input.len() {
                match bytes[j] {
                    b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' => j += 1,
                    _ => break,
                }
            }

            // Require a minimum length to reduce false positives.
            if j - (i + PREFIX.len()) >= 8 {
                out.push_str(&input[last..i]);
                out.push_str("tvly-***REDACTED***");
                last = j;
                i = j;
                continue;
            }
        }

        i += input[i..].chars().next().map_or(1, char::len_utf8);
    }

    out.push_str(&input[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_drives_directive() {
        assert_eq!(directive(effective_level("debug", false)), "tavily_tools=debug,warn");
        assert_eq!(directive(effective_level("error", false)), "tavily_tools=error,warn");
        assert_eq!(directive(effective_level("info", true)), "tavily_tools=debug,warn");
    }

    #[test]
    fn test_default_log_level_directive_parses() {
        let config = crate::config::Config::default();
        let level = effective_level(&config.log_level, false);
        assert_eq!(directive(level), "tavily_tools=info,warn");
        assert!(EnvFilter::try_new(directive(level)).is_ok());
    }

    #[test]
    fn test_redacts_tavily_keys() {
        assert_eq!(
            redact_secrets("Bearer tvly-dev-AbCdEf123456 rejected"),
            "Bearer tvly-***REDACTED*** rejected"
        );
        assert_eq!(
            redact_secrets("{\"api_key\":\"tvly-0123456789abcdef\"}"),
            "{\"api_key\":\"tvly-***REDACTED***\"}"
        );
    }

    #[test]
    fn test_leaves_short_or_unrelated_text() {
        assert_eq!(redact_secrets("tvly-abc"), "tvly-abc");
        assert_eq!(redact_secrets("no secrets here"), "no secrets here");
        assert_eq!(redact_secrets("深度 tvly-1234567890 求索"), "深度 tvly-***REDACTED*** 求索");
    }
}
