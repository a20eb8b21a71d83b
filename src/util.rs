use chrono::{DateTime, Local};
use std::path::{Component, Path, PathBuf};

/// Appended to an excerpt when content was cut.
pub const ELLIPSIS: &str = "...";

/// First `max_chars` characters of `text`, plus [`ELLIPSIS`] when longer.
///
/// Counts `char`s, so multi-byte text is never split inside a code point.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

/// `1.77s`, or `unknown` when the API did not report a time.
pub fn display_seconds(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) => format!("{s:.2}s"),
        None => "unknown".to_string(),
    }
}

/// Timestamp suffix used in generated file names, e.g. `20261019_101530_123`.
pub fn filename_timestamp(at: DateTime<Local>) -> String {
    at.format("%Y%m%d_%H%M%S_%3f").to_string()
}

/// Decide where an export lands.
///
/// - no path: `<output_dir>/<prefix>_<timestamp>.<extension>`
/// - a bare file name: placed inside `output_dir`
/// - anything with a directory component: used as given
pub fn resolve_output_path(
    path: Option<&Path>,
    output_dir: &Path,
    prefix: &str,
    extension: &str,
) -> PathBuf {
    match path {
        None => output_dir.join(format!(
            "{prefix}_{}.{extension}",
            filename_timestamp(Local::now())
        )),
        Some(path) if is_bare_file_name(path) => output_dir.join(path),
        Some(path) => path.to_path_buf(),
    }
}

fn is_bare_file_name(path: &Path) -> bool {
    let mut components = path.components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Write `contents` to `path`, creating the parent directory first.
///
/// Plain overwrite: no temp file, no locking.
pub fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, contents)
}

pub fn expand_tilde(raw: &str) -> String {
    if raw == "~" || raw.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            let suffix = raw.strip_prefix('~').unwrap_or("");
            return format!("{}{}", home.display(), suffix);
        }
    }
    raw.to_string()
}
