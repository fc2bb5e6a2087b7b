use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV: &str = "TASKLIST_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Preferred output mode: `pretty`, `text`, or `json`.
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub tui: TuiConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Start each session with the example tasks.
    #[serde(default = "default_true")]
    pub seed: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed: default_true(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuiConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_status_ttl_ms")]
    pub status_ttl_ms: u64,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            status_ttl_ms: default_status_ttl_ms(),
        }
    }
}

/// Loaded config plus where it came from.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedConfig {
    pub config: AppConfig,
    /// Path that was consulted; `None` when no config dir is known.
    pub path: Option<PathBuf>,
    /// Whether a file actually existed at `path`.
    pub found: bool,
}

/// Where the user config lives: `$TASKLIST_CONFIG`, else
/// `<config_dir>/tasklist/config.toml`.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Some(explicit) = env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(explicit));
    }
    dirs::config_dir().map(|dir| dir.join("tasklist/config.toml"))
}

/// Parse a config file. A missing file yields defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<AppConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the user config from [`config_path`].
///
/// # Errors
///
/// Propagates read and parse failures from [`load_config_from`].
pub fn load_config() -> Result<LoadedConfig> {
    let Some(path) = config_path() else {
        tracing::debug!("no config directory available; using defaults");
        return Ok(LoadedConfig {
            config: AppConfig::default(),
            path: None,
            found: false,
        });
    };

    let found = path.exists();
    let config = load_config_from(&path)?;
    tracing::debug!(path = %path.display(), found, "config loaded");
    Ok(LoadedConfig {
        config,
        path: Some(path),
        found,
    })
}

/// Canonicalize an output-mode name, accepting legacy aliases.
#[must_use]
pub fn normalize_output_mode(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pretty" | "human" => Some("pretty"),
        "text" | "table" => Some("text"),
        "json" => Some("json"),
        _ => None,
    }
}

const fn default_true() -> bool {
    true
}

const fn default_tick_ms() -> u64 {
    200
}

const fn default_status_ttl_ms() -> u64 {
    3000
}
