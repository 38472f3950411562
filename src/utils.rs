use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

/// Scale a byte count to the largest unit that keeps the value below 1024.
///
/// The last unit (TB) absorbs everything larger.
pub fn scale_size(bytes: u64) -> (f64, &'static str) {
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    (size, UNITS[unit_idx])
}

/// Format bytes into a human-readable size with two decimals.
pub fn format_size(bytes: u64) -> String {
    let (size, unit) = scale_size(bytes);
    format!("{:.2} {}", size, unit)
}

/// Root used when the user leaves the path prompt empty and no config default exists.
pub fn default_root() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("C:\\")
    } else {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
    }
}

/// Turn prompt input into a scan root.
///
/// - empty input selects `default`
/// - a single letter on Windows selects that drive (`D` -> `D:\`)
/// - anything else is taken as a path
pub fn resolve_root(input: &str, default: &Path) -> PathBuf {
    let input = input.trim();

    if input.is_empty() {
        return default.to_path_buf();
    }

    if cfg!(windows) && input.len() == 1 && input.chars().all(|c| c.is_ascii_alphabetic()) {
        return PathBuf::from(format!("{}:\\", input));
    }

    PathBuf::from(input)
}

/// Make `path` absolute against the current directory without touching the filesystem.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path)
        .with_context(|| format!("Failed to resolve path: {}", path.display()))
}
