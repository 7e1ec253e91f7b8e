//! Path utilities for path expansion and normalization.

use std::path::{Path, PathBuf};

/// Placeholder expanded to the user's home directory in configured paths.
pub const HOME_VAR: &str = "$HOME";

/// Expand tilde (~) in a path to the user's home directory.
///
/// # Examples
/// - `~/Documents` -> `/home/user/Documents`
/// - `~` -> `/home/user`
/// - `/absolute/path` -> `/absolute/path` (unchanged)
/// - `relative/path` -> `relative/path` (unchanged)
///
/// If the home directory cannot be determined, the path is returned unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(suffix) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            home.join(suffix.trim_start_matches('/'))
        } else {
            PathBuf::from(path)
        }
    } else {
        PathBuf::from(path)
    }
}

/// Replace every `$HOME` occurrence in `path` with `home`.
///
/// This is plain substring substitution, not shell expansion: `$HOMEDIR`
/// becomes `<home>DIR`. Without a home directory the text is left as is.
pub fn expand_home_var(path: &str, home: Option<&Path>) -> PathBuf {
    match home {
        Some(home) if path.contains(HOME_VAR) => {
            PathBuf::from(path.replace(HOME_VAR, &home.to_string_lossy()))
        }
        _ => PathBuf::from(path),
    }
}
