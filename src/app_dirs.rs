use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Default log file location, used when logging is enabled without an explicit path
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("endclock");
            Some(state_dir.join("endclock.log"))
        } else {
            ProjectDirs::from("", "", "endclock")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("endclock.log"))
        }
    }
}
