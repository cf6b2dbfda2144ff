use directories::ProjectDirs;
use log::{info, LevelFilter};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use super::rendering::RenderConfig;
use super::window::WindowConfig;

pub const CONFIG_FILE_NAME: &str = "learngl.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Couldn't determine project directory")]
    NoProjectDir,
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Root for `shaders/` and `textures/`, relative to the working directory.
    pub assets_dir: PathBuf,
    pub log_level: String,
    pub window: WindowConfig,
    pub render: RenderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            log_level: "info".to_string(),
            window: WindowConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the per-user config file, writing the defaults first if it
    /// does not exist yet.
    pub fn load_or_create() -> Result<Self, ConfigError> {
        Self::load_or_create_at(&Self::default_path()?)
    }

    pub fn load_or_create_at(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            info!("Wrote default config to {:?}", path);
            return Ok(config);
        }
        Self::load(path)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(io_err)
    }

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("com", "MetroManDevTeam", "learngl")
            .ok_or(ConfigError::NoProjectDir)?;
        Ok(dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Unknown level names fall back to `Info`.
    pub fn log_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    pub fn shader_path(&self, file: &str) -> PathBuf {
        self.assets_dir.join("shaders").join(file)
    }

    pub fn texture_path(&self, file: &str) -> PathBuf {
        self.assets_dir.join("textures").join(file)
    }
}
