//! Configuration loading
//!
//! Settings are resolved per key in this order:
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. TOML config file
//! 4. Compiled defaults
//!
//! A missing TOML file is not an error (warning + defaults); a malformed
//! one is.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

use crate::{Error, Result};

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5780";
pub const DEFAULT_AI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_AI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_SQLITE_FILE: &str = "cgp-dash.db";

pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
pub const ENV_AI_API_KEY: &str = "API_KEY";
pub const ENV_BIND_ADDRESS: &str = "CGP_BIND_ADDRESS";
pub const ENV_STORE_BACKEND: &str = "CGP_STORE_BACKEND";

/// Where the entity collections are loaded from and written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Built-in sample data, changes kept in memory only
    Fixtures,
    /// PostgREST endpoint
    Rest,
    /// Local SQLite file
    Sqlite,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StoreBackend::Fixtures => "fixtures",
            StoreBackend::Rest => "rest",
            StoreBackend::Sqlite => "sqlite",
        })
    }
}

impl FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixtures" | "mock" => Ok(StoreBackend::Fixtures),
            "rest" | "supabase" => Ok(StoreBackend::Rest),
            "sqlite" => Ok(StoreBackend::Sqlite),
            other => Err(Error::Config(format!("Unknown store backend: {}", other))),
        }
    }
}

/// `[store]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSection {
    #[serde(default)]
    pub backend: Option<StoreBackend>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub anon_key: Option<String>,
    #[serde(default)]
    pub sqlite_path: Option<PathBuf>,
}

/// `[ai]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiSection {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

/// `[logging]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
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

/// Contents of `cgp-dash.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub bind_address: Option<String>,
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub ai: AiSection,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default config file location (`~/.config/cgp/cgp-dash.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cgp").join("cgp-dash.toml"))
}

/// Load the TOML config file
///
/// `explicit` comes from `--config`; otherwise the default location is
/// tried. Returns defaults when the file does not exist.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) => path,
        None => {
            warn!("Could not determine config directory, using defaults");
            return Ok(TomlConfig::default());
        }
    };

    if !path.exists() {
        warn!("Config file not found: {}, using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&path)?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind_address: Option<String>,
    pub backend: Option<StoreBackend>,
    pub store_url: Option<String>,
    pub store_key: Option<String>,
    pub sqlite_path: Option<PathBuf>,
    pub ai_api_key: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub sqlite_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AiSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_AI_MODEL.to_string(),
            base_url: DEFAULT_AI_BASE_URL.to_string(),
        }
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub bind_address: String,
    pub store: StoreSettings,
    pub ai: AiSettings,
    pub log_level: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            store: StoreSettings {
                backend: StoreBackend::Fixtures,
                url: None,
                anon_key: None,
                sqlite_path: default_sqlite_path(),
            },
            ai: AiSettings::default(),
            log_level: default_log_level(),
        }
    }
}

fn default_sqlite_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("cgp").join(DEFAULT_SQLITE_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SQLITE_FILE))
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.trim().is_empty())
}

impl DashboardConfig {
    /// Merge command line, environment, TOML and defaults
    pub fn resolve(cli: &CliOverrides, toml: &TomlConfig) -> Result<Self> {
        let defaults = Self::default();

        let bind_address = non_empty(&cli.bind_address)
            .or_else(|| env_value(ENV_BIND_ADDRESS))
            .or_else(|| non_empty(&toml.bind_address))
            .unwrap_or(defaults.bind_address);

        let url = non_empty(&cli.store_url)
            .or_else(|| env_value(ENV_SUPABASE_URL))
            .or_else(|| non_empty(&toml.store.url));
        let anon_key = non_empty(&cli.store_key)
            .or_else(|| env_value(ENV_SUPABASE_ANON_KEY))
            .or_else(|| non_empty(&toml.store.anon_key));

        let requested = match cli.backend {
            Some(b) => Some(b),
            None => match env_value(ENV_STORE_BACKEND) {
                Some(raw) => Some(raw.parse()?),
                None => toml.store.backend,
            },
        };
        let backend = match requested {
            Some(StoreBackend::Rest) if url.is_none() || anon_key.is_none() => {
                warn!("REST store selected without URL and key, running on fixtures");
                StoreBackend::Fixtures
            }
            Some(b) => b,
            None if url.is_some() && anon_key.is_some() => StoreBackend::Rest,
            None => StoreBackend::Fixtures,
        };

        let sqlite_path = cli
            .sqlite_path
            .clone()
            .or_else(|| toml.store.sqlite_path.clone())
            .unwrap_or(defaults.store.sqlite_path);

        let ai = AiSettings {
            api_key: non_empty(&cli.ai_api_key)
                .or_else(|| env_value(ENV_AI_API_KEY))
                .or_else(|| non_empty(&toml.ai.api_key)),
            model: non_empty(&toml.ai.model).unwrap_or(defaults.ai.model),
            base_url: non_empty(&toml.ai.base_url).unwrap_or(defaults.ai.base_url),
        };

        let log_level = non_empty(&cli.log_level).unwrap_or_else(|| toml.logging.level.clone());

        Ok(Self {
            bind_address,
            store: StoreSettings {
                backend,
                url,
                anon_key,
                sqlite_path,
            },
            ai,
            log_level,
        })
    }
}
