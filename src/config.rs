//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::dashboard::{DisplayOptions, Grouping};
use crate::sheet::{CsvSource, GvizConfig, GvizSource, SheetError, SheetSource};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sheet: SheetConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub refresh: RefreshConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// File this configuration was read from
    #[serde(skip)]
    pub source_path: Option<PathBuf>,

    /// Candidate files that exist but failed to load
    #[serde(skip)]
    pub skipped: Vec<ConfigError>,
}

/// Where sales rows come from
#[derive(Debug, Clone, Deserialize)]
pub struct SheetConfig {
    #[serde(default = "default_sheet_id")]
    pub id: String,

    #[serde(default = "default_sheet_name")]
    pub name: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_sheet_timeout")]
    pub request_timeout_secs: u64,

    /// Read a local CSV export instead of the live sheet
    pub csv_path: Option<PathBuf>,
}

fn default_sheet_id() -> String {
    "1QR8OYiGOqTP9LsFxUlIaDnaai9tEdzipT62e2vfFhug".to_string()
}

fn default_sheet_name() -> String {
    "Sheet1".to_string()
}

fn default_base_url() -> String {
    "https://docs.google.com".to_string()
}

fn default_sheet_timeout() -> u64 {
    10
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            id: default_sheet_id(),
            name: default_sheet_name(),
            base_url: default_base_url(),
            request_timeout_secs: default_sheet_timeout(),
            csv_path: None,
        }
    }
}

impl SheetConfig {
    pub fn gviz(&self) -> GvizConfig {
        GvizConfig {
            base_url: self.base_url.clone(),
            sheet_id: self.id.clone(),
            sheet_name: self.name.clone(),
            request_timeout_ms: self.request_timeout_secs * 1000,
        }
    }

    /// CSV source when `csv_path` is set, the gviz feed otherwise
    pub fn source(&self) -> Result<Arc<dyn SheetSource>, SheetError> {
        match &self.csv_path {
            Some(path) => Ok(Arc::new(CsvSource::new(path.clone()))),
            None => Ok(Arc::new(GvizSource::new(self.gviz())?)),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Refresh behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between background refreshes; 0 disables them
    #[serde(default)]
    pub interval_secs: u64,

    #[serde(default = "default_on_startup")]
    pub on_startup: bool,
}

fn default_on_startup() -> bool {
    true
}

impl RefreshConfig {
    pub fn coordinator(&self) -> crate::refresh::RefreshConfig {
        crate::refresh::RefreshConfig {
            interval_secs: self.interval_secs,
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: 0,
            on_startup: default_on_startup(),
        }
    }
}

/// Money formatting
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    #[serde(default)]
    pub grouping: Grouping,
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            grouping: Grouping::default(),
        }
    }
}

impl DisplayConfig {
    pub fn options(&self) -> DisplayOptions {
        DisplayOptions {
            currency_symbol: self.currency_symbol.clone(),
            grouping: self.grouping,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let mut config = Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment.
    ///
    /// Nothing is logged here: the binaries load config before the
    /// subscriber exists, so they call [`Config::log_origin`] afterwards.
    pub fn load_default() -> Self {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("luma").join("config.toml")),
            Some(PathBuf::from("/etc/luma/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// First candidate that loads; broken files are recorded in `skipped`
    fn load_first(paths: &[PathBuf]) -> Self {
        let mut skipped = Vec::new();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(mut config) => {
                    config.skipped = skipped;
                    return config;
                }
                Err(e) => skipped.push(e),
            }
        }

        let mut config = Self::from_env();
        config.skipped = skipped;
        config
    }

    /// Log where this configuration came from and any file that was skipped
    pub fn log_origin(&self) {
        for error in &self.skipped {
            tracing::warn!("Skipped config file: {}", error);
        }

        match &self.source_path {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }

    /// Explicit path if given, default locations otherwise
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::load_default()),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Sheet overrides
        if let Some(id) = var("LUMA_SHEET_ID") {
            self.sheet.id = id;
        }
        if let Some(name) = var("LUMA_SHEET_NAME") {
            self.sheet.name = name;
        }
        if let Some(path) = var("LUMA_CSV_PATH") {
            self.sheet.csv_path = Some(PathBuf::from(path));
        }

        // API overrides
        if let Some(host) = var("LUMA_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("LUMA_API_PORT").and_then(|p| p.parse().ok()) {
            self.api.port = port;
        }

        // Refresh overrides
        if let Some(secs) = var("LUMA_REFRESH_INTERVAL_SECS").and_then(|s| s.parse().ok()) {
            self.refresh.interval_secs = secs;
        }

        // Logging overrides
        if let Some(level) = var("LUMA_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("LUMA_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Luma Configuration
#
# Environment variables override these settings:
# - LUMA_SHEET_ID
# - LUMA_SHEET_NAME
# - LUMA_CSV_PATH
# - LUMA_API_HOST
# - LUMA_API_PORT
# - LUMA_REFRESH_INTERVAL_SECS
# - LUMA_LOG_LEVEL
# - LUMA_LOG_FORMAT

[sheet]
# Spreadsheet ID from the sheet URL (the sheet must be viewable by link)
id = "1QR8OYiGOqTP9LsFxUlIaDnaai9tEdzipT62e2vfFhug"

# Tab name
name = "Sheet1"

# Sheets service base URL
base_url = "https://docs.google.com"

# Request timeout in seconds
request_timeout_secs = 10

# Read a local CSV export instead of the live sheet
# csv_path = "./sales.csv"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8090

# Allowed CORS origins (empty = allow any)
cors_origins = []

[refresh]
# Seconds between background refreshes (0 = only on demand)
interval_secs = 0

# Fetch the sheet when the server starts
on_startup = true

[display]
# Currency symbol prefixed to revenue figures
currency_symbol = "₹"

# Thousands grouping: indian (12,34,567) or western (1,234,567)
grouping = "indian"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
