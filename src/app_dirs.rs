use directories::ProjectDirs;
use std::path::PathBuf;

/// Where the durable game state lives on this machine
pub struct AppDirs;

impl AppDirs {
    /// `$HOME/.local/state/wats/state.db`, or the platform-local data dir
    /// when HOME is unset
    pub fn db_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("wats");
            Some(state_dir.join("state.db"))
        } else {
            ProjectDirs::from("", "", "wats")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("state.db"))
        }
    }
}
