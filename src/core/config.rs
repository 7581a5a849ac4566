//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.blackboard/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use clap::ValueEnum;

use crate::Mode;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BlackboardConfig {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EditorConfig {
    pub mode: Option<Mode>,
    pub autosave_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ExportConfig {
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 500;
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;
const APP_DIR: &str = ".blackboard";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub mode: Mode,
    pub autosave_delay: Duration,
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    pub log_level: LevelFilter,
    /// Problems found while resolving. Resolution runs before the logger
    /// exists, so the caller logs these once it is installed.
    pub warnings: Vec<String>,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub mode: Option<Mode>,
    pub data_dir: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.blackboard`, the default home for config, data, and logs.
pub fn app_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DIR))
}

/// Returns the path to `~/.blackboard/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    app_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.blackboard/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `BlackboardConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<BlackboardConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(BlackboardConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<BlackboardConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(BlackboardConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: BlackboardConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Blackboard Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [editor]
# mode = "raw"                  # "raw" or "blocks"  (env: BLACKBOARD_MODE)
# autosave_delay_ms = 500       # quiet time before the document is saved

# [storage]
# data_dir = "/home/me/.blackboard"  # where the document lives; a leading ~ expands (env: BLACKBOARD_DATA_DIR)

# [export]
# dir = "."                     # where blackboard-YYYY-MM-DD.md goes (env: BLACKBOARD_EXPORT_DIR)

# [logging]
# level = "debug"               # "off", "error", "warn", "info", "debug", "trace"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &BlackboardConfig, cli: &CliOverrides) -> ResolvedConfig {
    let mut warnings = Vec::new();

    // Mode: CLI → env → config → default
    let mode = cli
        .mode
        .or_else(|| env_mode("BLACKBOARD_MODE", &mut warnings))
        .or(config.editor.mode)
        .unwrap_or_default();

    // Data dir: CLI → env → config → ~/.blackboard → current dir
    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| std::env::var_os("BLACKBOARD_DATA_DIR").map(PathBuf::from))
        .or_else(|| config.storage.data_dir.clone())
        .map(expand_home)
        .or_else(app_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    // Export dir: CLI → env → config → current dir
    let export_dir = cli
        .export_dir
        .clone()
        .or_else(|| std::env::var_os("BLACKBOARD_EXPORT_DIR").map(PathBuf::from))
        .or_else(|| config.export.dir.clone())
        .map(expand_home)
        .unwrap_or_else(|| PathBuf::from("."));

    let log_level = match config.logging.level.as_deref() {
        Some(level) => LevelFilter::from_str(level).unwrap_or_else(|_| {
            warnings.push(format!(
                "Unknown log level {level:?}, using {DEFAULT_LOG_LEVEL}"
            ));
            DEFAULT_LOG_LEVEL
        }),
        None => DEFAULT_LOG_LEVEL,
    };

    ResolvedConfig {
        mode,
        autosave_delay: Duration::from_millis(
            config
                .editor
                .autosave_delay_ms
                .unwrap_or(DEFAULT_AUTOSAVE_DELAY_MS),
        ),
        data_dir,
        export_dir,
        log_level,
        warnings,
    }
}

fn env_mode(var: &str, warnings: &mut Vec<String>) -> Option<Mode> {
    let value = std::env::var(var).ok()?;
    match Mode::from_str(&value, true) {
        Ok(mode) => Some(mode),
        Err(e) => {
            warnings.push(format!("Ignoring {var}={value:?}: {e}"));
            None
        }
    }
}

/// Expand a leading `~` component to the home directory. `~user` forms are
/// left alone.
fn expand_home(path: PathBuf) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path,
    }
}
