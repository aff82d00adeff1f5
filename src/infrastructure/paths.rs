//! Path handling for the Zellij plugin sandbox.
//!
//! Inside the sandbox the host filesystem is visible under `/host`, which
//! points at the directory Zellij was started from (usually the home
//! directory).

use std::path::PathBuf;

/// Directory holding the plugin's trace file.
///
/// Resolves to `/host/.local/share/zellij/docseek`, i.e.
/// `~/.local/share/zellij/docseek` when Zellij runs from the home directory.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("docseek")
}

/// Maps a user-facing `~` path onto the sandbox's `/host` mount.
///
/// ```
/// use docseek::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/dark.toml"), "/host/themes/dark.toml");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/etc/docseek.toml"), "/etc/docseek.toml");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path == "~" {
        "/host".to_string()
    } else if let Some(rest) = path.strip_prefix("~/") {
        format!("/host/{rest}")
    } else {
        path.to_string()
    }
}
