//! Configuration loading and resolution
//!
//! A single optional TOML file configures the batch tools. Every section has
//! built-in defaults, so a missing section is not an error.
//!
//! # Config file priority
//!
//! 1. Command-line argument (highest priority)
//! 2. `MCB_CONFIG` environment variable
//! 3. `{config_dir}/music-cd-batch/config.toml` if it exists
//! 4. Built-in defaults (no file)
//!
//! A file named by 1 or 2 must load. A broken platform file (3) is ignored
//! with a warning. Loading happens before logging is installed, so the
//! outcome is returned as a `ConfigOutcome` for the caller to log.
//!
//! Credentials inside the file can be overridden by environment variables;
//! see `mcb_catalog::config`.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "MCB_CONFIG";

/// Application directory name under the platform config dir
const APP_DIR_NAME: &str = "music-cd-batch";

/// Top-level configuration loaded from TOML
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// WorldCat Metadata API credentials (optional)
    #[serde(default)]
    pub worldcat: WorldcatConfig,

    /// Discogs credentials (optional)
    #[serde(default)]
    pub discogs: DiscogsConfig,

    /// Institution-specific local field values
    #[serde(default)]
    pub local_fields: LocalFieldsConfig,

    /// Pause after each processed item, in milliseconds
    #[serde(default)]
    pub request_pause_ms: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write logs to stderr instead of the per-batch log file
    #[serde(default)]
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            stderr: false,
        }
    }
}

impl LoggingConfig {
    /// Validate the configured level against the names tracing understands
    pub fn validated_level(&self) -> Result<String> {
        let level = self.level.trim().to_ascii_lowercase();
        match level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(level),
            other => Err(Error::InvalidInput(format!(
                "Unknown log level '{}' (expected trace, debug, info, warn, error)",
                other
            ))),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// WorldCat Metadata API client credentials
#[derive(Debug, Clone, Deserialize, Default)]
pub struct WorldcatConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

/// Discogs personal access token
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DiscogsConfig {
    pub user_token: Option<String>,
}

/// Values written into the institution-local MARC fields
///
/// Defaults match the UCLA Music Library CD batch.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LocalFieldsConfig {
    /// Cataloging agency symbol (040 $a/$c)
    pub cataloging_agency: String,
    /// Local holdings symbol (049 $a)
    pub holdings_symbol: String,
    /// Cataloger code for the batch field (962 $a)
    pub batch_cataloger: String,
    /// Batch project name (962 $b)
    pub batch_name: String,
    /// Batch encoding code (962 $d)
    pub batch_encoding: String,
    /// Collection code (966 $a)
    pub collection_code: String,
    /// Collection name (966 $b)
    pub collection_name: String,
    /// Note added when the disc lacks its container insert (590 $a)
    pub container_note: String,
    /// Marker subfield value flagging local-only fields ($9)
    pub local_marker: String,
}

impl Default for LocalFieldsConfig {
    fn default() -> Self {
        Self {
            cataloging_agency: "CLU".to_string(),
            holdings_symbol: "CLUV".to_string(),
            batch_cataloger: "cmc".to_string(),
            batch_name: "meherbatch".to_string(),
            batch_encoding: "1".to_string(),
            collection_code: "MEHER".to_string(),
            collection_name: "Donovan Meher Collection".to_string(),
            container_note: "UCLA Music Library copy lacks container insert.".to_string(),
            local_marker: "LOCAL".to_string(),
        }
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Read and parse a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Read TOML failed ({}): {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e))
        })
    }

    /// Resolve the config file with `ConfigResolver::new()` and load it
    pub fn resolve_and_load(cli_arg: Option<&Path>) -> Result<ConfigLoad> {
        ConfigResolver::new().load(cli_arg)
    }
}

/// Where a config file path came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigPath {
    /// Command-line argument or `MCB_CONFIG`
    Explicit(PathBuf),
    /// Platform config file that exists on disk
    PlatformDefault(PathBuf),
}

impl ConfigPath {
    pub fn path(&self) -> &Path {
        match self {
            ConfigPath::Explicit(path) | ConfigPath::PlatformDefault(path) => path,
        }
    }
}

/// How the configuration was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOutcome {
    /// Loaded from this file
    Loaded(PathBuf),
    /// No file applies; built-in defaults
    NoFile,
    /// The platform file could not be used; built-in defaults
    Ignored { path: PathBuf, reason: String },
}

impl ConfigOutcome {
    /// Report the outcome through `tracing`
    pub fn log(&self) {
        match self {
            ConfigOutcome::Loaded(path) => info!("Loaded config from {}", path.display()),
            ConfigOutcome::NoFile => info!("No config file found, using built-in defaults"),
            ConfigOutcome::Ignored { reason, .. } => {
                warn!("{}; using built-in defaults", reason)
            }
        }
    }
}

/// Loaded configuration plus the outcome to log
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: TomlConfig,
    pub outcome: ConfigOutcome,
}

/// Locates the configuration file following the documented priority order
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    env_var: String,
    default_path: Option<PathBuf>,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigResolver {
    /// Resolver using `MCB_CONFIG` and the platform config directory
    pub fn new() -> Self {
        Self {
            env_var: CONFIG_ENV_VAR.to_string(),
            default_path: default_config_path(),
        }
    }

    /// Resolver with explicit env var name and fallback path
    pub fn with_sources(env_var: impl Into<String>, default_path: Option<PathBuf>) -> Self {
        Self {
            env_var: env_var.into(),
            default_path,
        }
    }

    /// Resolve the config file path, or `None` when no file applies
    ///
    /// Explicit sources (CLI, env) are returned even if the file is missing so
    /// the load step can report the problem; the platform default is only used
    /// when it exists.
    pub fn resolve(&self, cli_arg: Option<&Path>) -> Option<ConfigPath> {
        if let Some(path) = cli_arg {
            return Some(ConfigPath::Explicit(path.to_path_buf()));
        }

        if let Ok(path) = std::env::var(&self.env_var) {
            if !path.trim().is_empty() {
                return Some(ConfigPath::Explicit(PathBuf::from(path)));
            }
        }

        self.default_path
            .as_ref()
            .filter(|p| p.exists())
            .cloned()
            .map(ConfigPath::PlatformDefault)
    }

    /// Resolve and load the configuration
    ///
    /// An explicit file that cannot be read or parsed is an error. A broken
    /// platform file falls back to defaults and is reported in the outcome.
    pub fn load(&self, cli_arg: Option<&Path>) -> Result<ConfigLoad> {
        let Some(source) = self.resolve(cli_arg) else {
            return Ok(ConfigLoad {
                config: TomlConfig::default(),
                outcome: ConfigOutcome::NoFile,
            });
        };

        match (TomlConfig::load(source.path()), source) {
            (Ok(config), source) => Ok(ConfigLoad {
                config,
                outcome: ConfigOutcome::Loaded(source.path().to_path_buf()),
            }),
            (Err(e), ConfigPath::Explicit(_)) => Err(e),
            (Err(e), ConfigPath::PlatformDefault(path)) => Ok(ConfigLoad {
                config: TomlConfig::default(),
                outcome: ConfigOutcome::Ignored {
                    path,
                    reason: e.to_string(),
                },
            }),
        }
    }
}

/// Platform config file location, e.g. `~/.config/music-cd-batch/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"))
}
