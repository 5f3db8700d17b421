use std::path::PathBuf;

/// XDG app name used for config, state and cache paths.
pub const APP_NAME: &str = "farewell";

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// State directory, falling back to the local data dir on platforms
/// without an XDG state dir (macOS, Windows).
pub fn state_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| {
        dirs.state_dir()
            .unwrap_or_else(|| dirs.data_local_dir())
            .to_path_buf()
    })
}

pub fn state_dir_fallback() -> PathBuf {
    std::env::temp_dir().join(format!("{APP_NAME}-state"))
}

/// Directory of the per-device collection cache.
pub fn default_cache_dir() -> PathBuf {
    state_dir()
        .unwrap_or_else(state_dir_fallback)
        .join("cache")
}

pub fn default_log_dir() -> PathBuf {
    state_dir().unwrap_or_else(state_dir_fallback).join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_and_log_dirs_share_state_root() {
        let cache = default_cache_dir();
        let logs = default_log_dir();
        assert_eq!(cache.file_name().and_then(|n| n.to_str()), Some("cache"));
        assert_eq!(logs.file_name().and_then(|n| n.to_str()), Some("logs"));
        assert_eq!(cache.parent(), logs.parent());
    }

    #[test]
    fn fallback_is_under_temp_dir() {
        let fallback = state_dir_fallback();
        assert!(fallback.starts_with(std::env::temp_dir()));
        assert!(fallback.ends_with(format!("{APP_NAME}-state")));
    }
}
