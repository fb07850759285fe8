use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

/// Overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "PMRS_CONFIG_DIR";
/// Overrides the log directory.
pub const LOG_DIR_ENV: &str = "PMRS_LOG_DIR";

/// Written to the config path on first run.
const TEMPLATE: &str = r#"# plex-ratings-sync configuration

[plex]
# Base URL of the Plex Media Server
url = "http://127.0.0.1:32400"

# X-Plex-Token used to authenticate, see
# https://support.plex.tv/articles/204059436-finding-an-authentication-token-x-plex-token/
token = ""

# Music libraries to process, in order
libraries = ["Music"]

# HTTP timeout in seconds for Plex requests
# timeout_secs = 30

# Largest Plex response accepted, in MiB. Listing a big library with artist
# biographies can run to tens of MiB.
# max_response_mib = 256
"#;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine a config directory; set PMRS_CONFIG_DIR")]
    NoConfigDir,
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Created a config template at {}; fill in your Plex details and re-run", .0.display())]
    Created(PathBuf),
    #[error("Invalid Plex configuration: {0}")]
    Invalid(String),
}

/// Application configuration loaded from TOML config file.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub plex: PlexConfig,
}

/// Plex server connection and the libraries to reconcile.
#[derive(Debug, Deserialize)]
pub struct PlexConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub libraries: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_response_mib")]
    pub max_response_mib: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_response_mib() -> u64 {
    256
}

impl PlexConfig {
    /// Response body limit in bytes.
    pub fn max_response_bytes(&self) -> u64 {
        self.max_response_mib.saturating_mul(1024 * 1024)
    }
}

impl AppConfig {
    /// Load and validate the config from the default location, creating a
    /// template there when none exists yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_file_path().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            write_template(path)?;
            return Err(ConfigError::Created(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let plex = &self.plex;
        if plex.url.trim().is_empty() {
            return Err(ConfigError::Invalid("url is empty".into()));
        }
        if plex.token.trim().is_empty() {
            return Err(ConfigError::Invalid("token is empty".into()));
        }
        if plex.libraries.is_empty() {
            return Err(ConfigError::Invalid("no libraries configured".into()));
        }
        if plex.max_response_mib == 0 {
            return Err(ConfigError::Invalid("max_response_mib must be positive".into()));
        }
        if plex.libraries.iter().any(|l| l.trim().is_empty()) {
            return Err(ConfigError::Invalid("library names must not be empty".into()));
        }
        Ok(())
    }
}

fn write_template(path: &Path) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, TEMPLATE).map_err(io_err)
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", crate::APP_NAME)
}

fn env_dir(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// `$PMRS_CONFIG_DIR`, else the platform config dir.
pub fn config_dir() -> Option<PathBuf> {
    env_dir(CONFIG_DIR_ENV).or_else(|| project_dirs().map(|d| d.config_dir().to_path_buf()))
}

pub fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// `$PMRS_LOG_DIR`, else `logs/` under the platform local data dir.
pub fn log_dir() -> Option<PathBuf> {
    env_dir(LOG_DIR_ENV).or_else(|| project_dirs().map(|d| d.data_local_dir().join("logs")))
}

pub fn log_file_path() -> Option<PathBuf> {
    log_dir().map(|dir| dir.join(format!("{}.log", crate::APP_NAME)))
}
