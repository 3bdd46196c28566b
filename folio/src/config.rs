// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use validator::ValidateEmail;

/// Environment variable that overrides `backend.base_url`.
pub const BACKEND_URL_ENV: &str = "FOLIO_BACKEND_URL";

/// Ten years.
pub const MAX_SESSION_HOURS: u64 = 24 * 365 * 10;
pub const MAX_UPLOAD_SIZE_MB: u64 = 4096;

const MIN_RECOMMENDED_SECRET_CHARS: usize = 32;
const BYTES_PER_MB: u64 = 1024 * 1024;
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    4
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AdminConfig {
    #[serde(default = "default_admin_path")]
    pub path: String,
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            path: default_admin_path(),
            login_path: default_login_path(),
        }
    }
}

fn default_admin_path() -> String {
    "/admin".to_string()
}

fn default_login_path() -> String {
    "/admin/login".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AdminAccountConfig {
    pub email: String,
    pub password: String,
    #[serde(default = "default_admin_name")]
    pub name: String,
}

fn default_admin_name() -> String {
    "Administrator".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    pub secret: String,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_session_hours")]
    pub session_hours: u64,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default = "default_admin_cookie_name")]
    pub admin_cookie_name: String,
    pub admin: AdminAccountConfig,
}

fn default_issuer() -> String {
    "folio".to_string()
}

fn default_session_hours() -> u64 {
    24 * 7
}

fn default_cookie_name() -> String {
    "auth-token".to_string()
}

fn default_admin_cookie_name() -> String {
    "is-admin".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            public_dir: default_public_dir(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_public_dir() -> String {
    "public".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UploadConfig {
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
    #[serde(default = "default_max_video_size_mb")]
    pub max_video_size_mb: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: default_max_file_size_mb(),
            max_video_size_mb: default_max_video_size_mb(),
        }
    }
}

fn default_max_file_size_mb() -> u64 {
    50
}

fn default_max_video_size_mb() -> u64 {
    100
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BackendConfig {
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
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

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            description: String::new(),
        }
    }
}

fn default_app_name() -> String {
    "Folio".to_string()
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub app: AppConfig,
}

#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub server: ServerConfig,
    pub admin: AdminConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub upload: UploadConfig,
    pub backend: BackendConfig,
    pub logging: LoggingConfig,
    pub app: AppConfig,
}

impl Config {
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config_path = root.join("config.yaml");
        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        Self::parse(&config_content).map_err(|e| match e {
            ConfigError::LoadError(msg) => ConfigError::LoadError(format!(
                "Failed to parse config file '{}': {}",
                config_path.display(),
                msg
            )),
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::LoadError(e.to_string()))
    }

    /// Loads and validates configuration at startup. If validation fails, the application should not start.
    pub fn load_and_validate(root: &Path) -> Result<ValidatedConfig, ConfigError> {
        let config = Self::load(root)?;
        let backend_override = std::env::var(BACKEND_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty());
        config.validate(backend_override)
    }

    pub fn validate(self, backend_override: Option<String>) -> Result<ValidatedConfig, ConfigError> {
        Self::validate_admin(&self.admin)?;
        Self::validate_auth(&self.auth)?;
        Self::validate_storage(&self.storage)?;
        Self::validate_upload(&self.upload)?;
        Self::validate_logging(&self.logging)?;

        if self.server.workers == 0 {
            return Err(ConfigError::ValidationError(
                "server.workers must be at least 1".to_string(),
            ));
        }

        let base_url = match backend_override.or(self.backend.base_url) {
            Some(url) => Some(Self::normalize_backend_url(&url)?),
            None => None,
        };

        Ok(ValidatedConfig {
            server: self.server,
            admin: self.admin,
            auth: self.auth,
            storage: self.storage,
            upload: self.upload,
            backend: BackendConfig { base_url },
            logging: self.logging,
            app: self.app,
        })
    }

    fn validate_admin(admin: &AdminConfig) -> Result<(), ConfigError> {
        if !admin.path.starts_with('/') || admin.path == "/" || admin.path.ends_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "admin.path must start with '/' and name a sub-path without a trailing slash, got: {}",
                admin.path
            )));
        }
        if !admin.login_path.starts_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "admin.login_path must start with '/', got: {}",
                admin.login_path
            )));
        }
        Ok(())
    }

    fn validate_auth(auth: &AuthConfig) -> Result<(), ConfigError> {
        if auth.secret.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.secret must not be empty".to_string(),
            ));
        }
        if auth.secret.chars().count() < MIN_RECOMMENDED_SECRET_CHARS {
            warn!(
                "auth.secret is shorter than {} characters; session tokens are easier to forge",
                MIN_RECOMMENDED_SECRET_CHARS
            );
        }
        if auth.session_hours == 0 || auth.session_hours > MAX_SESSION_HOURS {
            return Err(ConfigError::ValidationError(format!(
                "auth.session_hours must be between 1 and {}, got: {}",
                MAX_SESSION_HOURS, auth.session_hours
            )));
        }
        if auth.cookie_name.trim().is_empty() || auth.admin_cookie_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "auth cookie names must not be empty".to_string(),
            ));
        }
        if auth.cookie_name == auth.admin_cookie_name {
            return Err(ConfigError::ValidationError(
                "auth.cookie_name and auth.admin_cookie_name must differ".to_string(),
            ));
        }
        if !auth.admin.email.trim().validate_email() {
            return Err(ConfigError::ValidationError(format!(
                "auth.admin.email is not a valid email address: {}",
                auth.admin.email
            )));
        }
        if auth.admin.password.is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.admin.password must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_storage(storage: &StorageConfig) -> Result<(), ConfigError> {
        if storage.data_dir.trim().is_empty() || storage.public_dir.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.data_dir and storage.public_dir must not be empty".to_string(),
            ));
        }
        if storage.data_dir == storage.public_dir {
            return Err(ConfigError::ValidationError(
                "storage.data_dir must not be the public directory".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_upload(upload: &UploadConfig) -> Result<(), ConfigError> {
        for (key, value) in [
            ("upload.max_file_size_mb", upload.max_file_size_mb),
            ("upload.max_video_size_mb", upload.max_video_size_mb),
        ] {
            if value == 0 || value > MAX_UPLOAD_SIZE_MB {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be between 1 and {}, got: {}",
                    key, MAX_UPLOAD_SIZE_MB, value
                )));
            }
        }
        Ok(())
    }

    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        let level = logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {}, got: {}",
                LOG_LEVELS.join(", "),
                logging.level
            )));
        }
        Ok(())
    }

    fn normalize_backend_url(raw: &str) -> Result<String, ConfigError> {
        let trimmed = raw.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "backend.base_url must be an http(s) URL, got: {}",
                raw
            )));
        }
        Ok(trimmed.to_string())
    }
}

fn mb_to_bytes(mb: u64) -> u64 {
    mb.min(MAX_UPLOAD_SIZE_MB).saturating_mul(BYTES_PER_MB)
}

impl ValidatedConfig {
    pub fn max_file_size_bytes(&self) -> u64 {
        mb_to_bytes(self.upload.max_file_size_mb)
    }

    pub fn max_video_size_bytes(&self) -> u64 {
        mb_to_bytes(self.upload.max_video_size_mb)
    }

    /// Token lifetime, clamped to [`MAX_SESSION_HOURS`] for configs built without `validate`.
    pub fn session_hours(&self) -> i64 {
        let hours = self.auth.session_hours.min(MAX_SESSION_HOURS);
        i64::try_from(hours).unwrap_or(i64::MAX)
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        match self.logging.level.to_ascii_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            _ => log::LevelFilter::Info,
        }
    }
}
