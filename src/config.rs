use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

pub const APP_DIR: &str = "lesson-planner";
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("grid hours must satisfy start < end <= 24 (got {start}..{end})")]
    InvalidGrid { start: u32, end: u32 },
    #[error("could not determine a data directory; set `data_dir` in the config file")]
    NoDataDir,
}

/// Hours shown by the week grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            start_hour: 6,
            end_hour: 18,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub request_timeout: Duration,
    /// Skip the remote API and use the local file only.
    pub offline: bool,
    pub data_dir: PathBuf,
    pub grid: GridConfig,
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).or_else(default_config_path);
        let file = match path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
                toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })?
            }
            _ => FileConfig::default(),
        };
        Self::from_file(file)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        Self::from_file(file)
    }

    fn from_file(file: FileConfig) -> Result<Self, ConfigError> {
        let grid = match file.grid {
            Some(g) => {
                let default = GridConfig::default();
                GridConfig {
                    start_hour: g.start_hour.unwrap_or(default.start_hour),
                    end_hour: g.end_hour.unwrap_or(default.end_hour),
                }
            }
            None => GridConfig::default(),
        };
        if grid.start_hour >= grid.end_hour || grid.end_hour > 24 {
            return Err(ConfigError::InvalidGrid {
                start: grid.start_hour,
                end: grid.end_hour,
            });
        }

        let data_dir = match file.data_dir {
            Some(dir) => dir,
            None => default_data_dir().ok_or(ConfigError::NoDataDir)?,
        };

        Ok(Self {
            api_url: file
                .api_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            request_timeout: Duration::from_secs(
                file.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            offline: file.offline.unwrap_or(false),
            data_dir,
            grid,
            log_level: file.log_level.unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Local fallback file for the subject list.
    pub fn subjects_path(&self) -> PathBuf {
        self.data_dir.join("subjects.json")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(APP_DIR))
}

// ── TOML config types ──

#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    api_url: Option<String>,
    request_timeout_secs: Option<u64>,
    offline: Option<bool>,
    data_dir: Option<PathBuf>,
    log_level: Option<String>,
    grid: Option<GridFile>,
}

#[derive(Debug, Deserialize)]
struct GridFile {
    start_hour: Option<u32>,
    end_hour: Option<u32>,
}
