//! Configuration resolution for recsync-ingest
//!
//! Builds one explicit [`IngestConfig`] at startup. Components receive the
//! parts they need at construction; nothing reads the environment later.
//!
//! **Priority:** command line → environment → TOML → built-in defaults

use chrono::Duration;
use recsync_common::config::{env_setting, resolve_root_folder, SmtpSection, TomlConfig};
use recsync_common::{DirectoryLayout, Error, Result};
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

use crate::services::file_scanner::DEFAULT_EXTENSION;
use crate::services::session_matcher::DEFAULT_WINDOW_MINUTES;
use crate::services::timestamp_extractor::DEFAULT_FILENAME_PREFIX;
use crate::services::PassSettings;

pub const DEFAULT_BOARD_API_URL: &str = "https://api.monday.com/v2";
pub const DEFAULT_BOARD_ID: u64 = 7202079054;
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

pub const ENV_BOARD_API_KEY: &str = "MONDAY_API_KEY";
pub const ENV_BOARD_ID: &str = "MONDAY_BOARD_ID";
pub const ENV_PUBLISHER_URL: &str = "KALTURA_SERVICE_URL";
pub const ENV_PUBLISHER_PARTNER_ID: &str = "KALTURA_PARTNER_ID";
pub const ENV_PUBLISHER_SECRET: &str = "KALTURA_ADMIN_SECRET";
pub const ENV_PUBLISHER_USER_ID: &str = "KALTURA_USER_ID";
pub const ENV_PUBLISHER_DEFAULT_OWNER: &str = "KALTURA_DEFAULT_OWNER";
pub const ENV_SMTP_SERVER: &str = "SMTP_SERVER";
pub const ENV_SMTP_PORT: &str = "SMTP_PORT";
pub const ENV_SMTP_USERNAME: &str = "SMTP_USERNAME";
pub const ENV_SMTP_PASSWORD: &str = "SMTP_PASSWORD";
pub const ENV_SMTP_FROM: &str = "SMTP_FROM_ADDRESS";
pub const ENV_LOG_LEVEL: &str = "RECSYNC_LOG_LEVEL";

/// Board access settings
#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub api_url: String,
    pub api_key: String,
    pub board_id: u64,
    pub page_limit: u32,
}

/// Video-host access settings
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    pub service_url: String,
    pub partner_id: String,
    pub admin_secret: String,
    pub user_id: String,
    pub default_owner: String,
}

/// Complete SMTP transport settings
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

/// Reconciliation tuning
#[derive(Debug, Clone)]
pub struct MatchingConfig {
    pub window_minutes: i64,
    /// `window_minutes` validated as a positive, representable duration
    pub window: Duration,
    pub filename_prefix: String,
    pub extension: String,
}

/// Values taken from the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_folder: Option<PathBuf>,
    pub board_id: Option<u64>,
    pub log_level: Option<String>,
    pub dry_run: bool,
}

/// Fully resolved configuration
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub board: BoardConfig,
    /// Always present for live runs; optional in dry runs
    pub publisher: Option<PublisherConfig>,
    /// `None` when the SMTP settings are incomplete
    pub smtp: Option<SmtpConfig>,
    pub layout: DirectoryLayout,
    pub matching: MatchingConfig,
    pub log_level: String,
    pub dry_run: bool,
}

impl IngestConfig {
    /// Resolve every setting
    ///
    /// # Errors
    /// Missing board API key, incomplete publisher settings on a live run,
    /// unparseable numeric values, or a match window that is not positive or
    /// too large to represent.
    pub fn resolve(cli: &CliOverrides, toml_config: &TomlConfig) -> Result<Self> {
        let board = resolve_board(cli, toml_config)?;
        let publisher = resolve_publisher(toml_config, cli.dry_run)?;
        let smtp = resolve_smtp(&toml_config.smtp);

        let root = resolve_root_folder(cli.root_folder.as_deref(), toml_config);
        let layout = DirectoryLayout::from_root(&root, &toml_config.directories);

        let window_minutes = toml_config
            .matching
            .window_minutes
            .unwrap_or(DEFAULT_WINDOW_MINUTES);
        let window = Duration::try_minutes(window_minutes)
            .filter(|w| *w > Duration::zero())
            .ok_or_else(|| {
                Error::Config(format!(
                    "matching.window_minutes must be a positive number of minutes, got {}",
                    window_minutes
                ))
            })?;

        let matching = MatchingConfig {
            window_minutes,
            window,
            filename_prefix: toml_config
                .matching
                .filename_prefix
                .clone()
                .filter(|p| is_valid_value(p))
                .unwrap_or_else(|| DEFAULT_FILENAME_PREFIX.to_string()),
            extension: toml_config
                .matching
                .extension
                .clone()
                .filter(|e| is_valid_value(e))
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
        };

        let log_level = cli
            .log_level
            .clone()
            .or_else(|| env_setting(ENV_LOG_LEVEL))
            .unwrap_or_else(|| toml_config.logging.level.clone());

        Ok(Self {
            board,
            publisher,
            smtp,
            layout,
            matching,
            log_level,
            dry_run: cli.dry_run,
        })
    }

    /// Settings handed to the orchestrator
    pub fn pass_settings(&self) -> PassSettings {
        PassSettings {
            board_id: self.board.board_id,
            layout: self.layout.clone(),
            window: self.matching.window,
            filename_prefix: self.matching.filename_prefix.clone(),
        }
    }
}

/// Non-empty, non-whitespace
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Environment value, else TOML value
fn setting(env_name: &str, toml_value: &Option<String>) -> Option<String> {
    env_setting(env_name).or_else(|| toml_value.clone().filter(|v| is_valid_value(v)))
}

/// Environment value parsed as `T`, else TOML value
fn parsed_setting<T>(env_name: &str, toml_value: Option<T>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match env_setting(env_name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::Config(format!("{}='{}' is invalid: {}", env_name, raw, e))),
        None => Ok(toml_value),
    }
}

fn resolve_board(cli: &CliOverrides, toml_config: &TomlConfig) -> Result<BoardConfig> {
    let section = &toml_config.board;

    let env_key = env_setting(ENV_BOARD_API_KEY);
    let toml_key = section.api_key.clone().filter(|k| is_valid_key(k));
    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "Board API key found in environment and TOML. Using environment (higher priority)."
        );
    }
    let api_key = env_key.or(toml_key).ok_or_else(|| {
        Error::Config(format!(
            "Board API key not configured. Set {} or [board] api_key in the config file.",
            ENV_BOARD_API_KEY
        ))
    })?;

    let board_id = match cli.board_id {
        Some(id) => id,
        None => parsed_setting(ENV_BOARD_ID, section.board_id)?.unwrap_or(DEFAULT_BOARD_ID),
    };

    Ok(BoardConfig {
        api_url: section
            .api_url
            .clone()
            .filter(|u| is_valid_value(u))
            .unwrap_or_else(|| DEFAULT_BOARD_API_URL.to_string()),
        api_key,
        board_id,
        page_limit: section.page_limit.unwrap_or(DEFAULT_PAGE_LIMIT).max(1),
    })
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    is_valid_value(key)
}

fn resolve_publisher(toml_config: &TomlConfig, dry_run: bool) -> Result<Option<PublisherConfig>> {
    let section = &toml_config.publisher;

    let service_url = setting(ENV_PUBLISHER_URL, &section.service_url);
    let partner_id = setting(ENV_PUBLISHER_PARTNER_ID, &section.partner_id);
    let admin_secret = setting(ENV_PUBLISHER_SECRET, &section.admin_secret);
    let user_id = setting(ENV_PUBLISHER_USER_ID, &section.user_id);
    let default_owner = setting(ENV_PUBLISHER_DEFAULT_OWNER, &section.default_owner);

    let missing: Vec<&str> = [
        (ENV_PUBLISHER_URL, service_url.is_none()),
        (ENV_PUBLISHER_PARTNER_ID, partner_id.is_none()),
        (ENV_PUBLISHER_SECRET, admin_secret.is_none()),
        (ENV_PUBLISHER_USER_ID, user_id.is_none()),
        (ENV_PUBLISHER_DEFAULT_OWNER, default_owner.is_none()),
    ]
    .iter()
    .filter(|(_, absent)| *absent)
    .map(|(name, _)| *name)
    .collect();

    match (service_url, partner_id, admin_secret, user_id, default_owner) {
        (Some(service_url), Some(partner_id), Some(admin_secret), Some(user_id), Some(default_owner)) => {
            Ok(Some(PublisherConfig {
                service_url,
                partner_id,
                admin_secret,
                user_id,
                default_owner,
            }))
        }
        _ if dry_run => {
            info!("Publisher settings incomplete; not needed for a dry run");
            Ok(None)
        }
        _ => Err(Error::Config(format!(
            "Publisher settings incomplete, missing: {}",
            missing.join(", ")
        ))),
    }
}

/// Complete SMTP settings, or `None`
///
/// `from_address` defaults to the username.
pub fn resolve_smtp(section: &SmtpSection) -> Option<SmtpConfig> {
    let server = setting(ENV_SMTP_SERVER, &section.server);
    let username = setting(ENV_SMTP_USERNAME, &section.username);
    let password = setting(ENV_SMTP_PASSWORD, &section.password);
    let port = match parsed_setting::<u16>(ENV_SMTP_PORT, section.port) {
        Ok(port) => port,
        Err(e) => {
            warn!("{}", e);
            None
        }
    };
    let from_address = setting(ENV_SMTP_FROM, &section.from_address);

    match (server, port, username, password) {
        (Some(server), Some(port), Some(username), Some(password)) => Some(SmtpConfig {
            server,
            port,
            from_address: from_address.unwrap_or_else(|| username.clone()),
            username,
            password,
        }),
        (server, port, username, password) => {
            let missing: Vec<&str> = [
                (ENV_SMTP_SERVER, server.is_none()),
                (ENV_SMTP_PORT, port.is_none()),
                (ENV_SMTP_USERNAME, username.is_none()),
                (ENV_SMTP_PASSWORD, password.is_none()),
            ]
            .iter()
            .filter(|(_, absent)| *absent)
            .map(|(name, _)| *name)
            .collect();
            warn!("SMTP settings incomplete, missing: {}", missing.join(", "));
            None
        }
    }
}
