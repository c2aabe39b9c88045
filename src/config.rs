// Configuration for the terminal front-end

use crate::kv::{FileKv, KeyValueStore, MemoryKv, SqliteKv, validate_key};
use crate::status::STATUS_TTL;
use crate::store::DEFAULT_KEY;
use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

const APP_DIR: &str = "tasklist";
const CONFIG_FILE: &str = "config.yml";

/// Which persistence backend to open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Sqlite,
    File,
    Memory,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Sqlite => write!(f, "sqlite"),
            BackendKind::File => write!(f, "file"),
            BackendKind::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(BackendKind::Sqlite),
            "file" => Ok(BackendKind::File),
            "memory" => Ok(BackendKind::Memory),
            other => Err(format!("unknown backend: {} (expected sqlite, file or memory)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendKind,
    /// Directory holding the backend's files; platform data dir when unset
    pub data_dir: Option<PathBuf>,
    pub key: String,
    pub status_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            data_dir: None,
            key: DEFAULT_KEY.to_string(),
            status_ttl_secs: STATUS_TTL.as_secs(),
        }
    }
}

impl Config {
    /// `<config dir>/tasklist/config.yml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`, or from the default location when `None`
    ///
    /// A missing file at the default location yields the defaults; a missing
    /// file that was asked for explicitly is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if explicit {
                return Err(eyre!("Config file not found: {}", path.display()));
            }
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::parse(&content).with_context(|| format!("Failed to parse config {}", path.display()))?;
        debug!(path = %path.display(), ?config, "Loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        validate_key(&config.key)?;
        Ok(config)
    }

    pub fn status_ttl(&self) -> Duration {
        Duration::from_secs(self.status_ttl_secs)
    }

    /// Resolved backend directory
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or_else(|| eyre!("Could not determine a data directory; set data_dir in the config")),
        }
    }

    pub fn open_backend(&self) -> Result<Box<dyn KeyValueStore>> {
        let backend: Box<dyn KeyValueStore> = match self.backend {
            BackendKind::Sqlite => Box::new(SqliteKv::open(self.data_dir()?)?),
            BackendKind::File => Box::new(FileKv::open(self.data_dir()?)?),
            BackendKind::Memory => Box::new(MemoryKv::new()),
        };
        Ok(backend)
    }
}
