use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::channel::Channel;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Length of a guessing round in seconds
    pub round_secs: u64,
    /// Correct a stored session clock that is not from the current day
    pub reset_clock_daily: bool,
    /// External command handed the stream URL (e.g. "mpv --fs"); None opens
    /// the browser instead
    pub player_cmd: Option<String>,
    /// Channels appended to the built-in guide
    #[serde(default)]
    pub extra_channels: Vec<Channel>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            round_secs: 90,
            reset_clock_daily: true,
            player_cmd: None,
            extra_channels: vec![],
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "wats") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("wats_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        fs::read(&self.path)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .unwrap_or_default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(cfg).unwrap_or_default())
    }
}
