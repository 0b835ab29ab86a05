//! Filesystem locations used by the engine.
//!
//! The engine itself persists nothing; the data directory only holds the
//! rotating trace file written by the observability layer.

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "SKIPHIRE_DATA_DIR";

/// Returns the data directory for trace output.
///
/// Resolution order:
/// 1. `$SKIPHIRE_DATA_DIR`
/// 2. `$HOME/.local/share/skiphire`
/// 3. `.skiphire` in the working directory
#[must_use]
pub fn get_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }

    std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map_or_else(
            || PathBuf::from(".skiphire"),
            |home| PathBuf::from(home).join(".local").join("share").join("skiphire"),
        )
}

/// Expands a leading `~` to `$HOME`.
///
/// Paths without a tilde, or when `$HOME` is unset, are returned unchanged.
///
/// # Examples
///
/// ```
/// use skiphire::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/etc/skiphire.toml"), std::path::PathBuf::from("/etc/skiphire.toml"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = std::env::var_os("HOME").filter(|v| !v.is_empty());

    match (path, home) {
        ("~", Some(home)) => PathBuf::from(home),
        (p, Some(home)) if p.starts_with("~/") => PathBuf::from(home).join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}
