//! Configuration file model and loading
//!
//! The TOML file is the lowest-priority explicit source. Every field is
//! optional so a partial file (or no file at all) still loads; the binary
//! layers command-line arguments and environment variables on top.
//!
//! File location priority:
//! 1. Explicit path (`--config`)
//! 2. `RECSYNC_CONFIG` environment variable
//! 3. `<config_dir>/recsync/config.toml`
//!
//! A missing file at location 3 is not an error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an alternate config file
pub const CONFIG_ENV_VAR: &str = "RECSYNC_CONFIG";

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV_VAR: &str = "RECSYNC_ROOT_FOLDER";

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Root folder holding the three working directories
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub board: BoardSection,

    #[serde(default)]
    pub publisher: PublisherSection,

    #[serde(default)]
    pub smtp: SmtpSection,

    #[serde(default)]
    pub directories: DirectoriesSection,

    #[serde(default)]
    pub matching: MatchingSection,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// `[board]` section: work-management board access
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BoardSection {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub board_id: Option<u64>,
    pub page_limit: Option<u32>,
}

/// `[publisher]` section: video-hosting platform access
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PublisherSection {
    pub service_url: Option<String>,
    pub partner_id: Option<String>,
    pub admin_secret: Option<String>,
    pub user_id: Option<String>,
    /// Owner used when the session email has no account
    pub default_owner: Option<String>,
}

/// `[smtp]` section: notification transport
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SmtpSection {
    pub server: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: Option<String>,
}

/// `[directories]` section: overrides for the working directories
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DirectoriesSection {
    pub watch: Option<PathBuf>,
    pub processing: Option<PathBuf>,
    pub recordings: Option<PathBuf>,
}

/// `[matching]` section: reconciliation tuning
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MatchingSection {
    pub window_minutes: Option<i64>,
    pub filename_prefix: Option<String>,
    pub extension: Option<String>,
}

/// Read a setting from the environment, ignoring empty values
pub fn env_setting(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Default configuration file path for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("recsync").join("config.toml"))
}

/// Parse a TOML configuration file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Locate and load the configuration file
///
/// An explicitly named file (argument or `RECSYNC_CONFIG`) must exist.
/// The platform default is optional: when absent, built-in defaults apply.
pub fn load_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        info!("Loading configuration from {}", path.display());
        return load_toml_config(path);
    }

    if let Some(path) = env_setting(CONFIG_ENV_VAR) {
        let path = PathBuf::from(path);
        info!("Loading configuration from {} ({})", path.display(), CONFIG_ENV_VAR);
        return load_toml_config(&path);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            info!("Loading configuration from {}", path.display());
            load_toml_config(&path)
        }
        Some(path) => {
            warn!(
                "No config file at {}; using environment and built-in defaults",
                path.display()
            );
            Ok(TomlConfig::default())
        }
        None => {
            warn!("Could not determine config directory; using environment and built-in defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Root folder resolution priority:
/// 1. Command-line argument (highest priority)
/// 2. `RECSYNC_ROOT_FOLDER` environment variable
/// 3. TOML `root_folder`
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&Path>, toml_config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Some(path) = env_setting(ROOT_FOLDER_ENV_VAR) {
        return PathBuf::from(path);
    }

    if let Some(path) = &toml_config.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\recsync
        dirs::data_local_dir()
            .map(|d| d.join("recsync"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\recsync"))
    } else {
        // ~/.local/share/recsync, ~/Library/Application Support/recsync
        dirs::data_local_dir()
            .map(|d| d.join("recsync"))
            .unwrap_or_else(|| PathBuf::from("./recsync_data"))
    }
}
