//! Configuration file management for wayfare.
//!
//! Provides a TOML-based config file at `~/.config/wayfare/config.toml`
//! and a resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use wayfare_store::config::StoreConfig;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub user: UserSection,
    #[serde(default)]
    pub storage: StorageSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserSection {
    /// Email attached to saved trips.
    pub email: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StorageSection {
    pub cache_dir: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the wayfare config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/wayfare` or
/// `~/.config/wayfare`. We intentionally ignore the platform-specific
/// `dirs::config_dir()` (which returns `~/Library/Application Support` on
/// macOS).
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("wayfare");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("wayfare")
}

/// Return the path to the wayfare config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns defaults if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ConfigFile::default()),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("failed to read config file at {}", path.display()));
        }
    };
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved runtime configuration.
#[derive(Debug)]
pub struct WayfareConfig {
    pub email: Option<String>,
    pub store: StoreConfig,
}

impl WayfareConfig {
    /// Resolve from CLI flags, environment, and config file, in that
    /// order.
    pub fn resolve(cli_email: Option<&str>, cli_cache_dir: Option<&str>) -> Result<Self> {
        let file = load_config()?;

        let email = cli_email
            .map(str::to_owned)
            .or_else(|| std::env::var("WAYFARE_EMAIL").ok())
            .or(file.user.email);

        // StoreConfig::from_env already honors WAYFARE_CACHE_DIR and
        // WAYFARE_DATA_DIR; the config file sits below the env vars.
        let mut store = StoreConfig::from_env();
        if std::env::var("WAYFARE_CACHE_DIR").is_err() {
            if let Some(dir) = file.storage.cache_dir {
                store.cache_dir = dir;
            }
        }
        if std::env::var("WAYFARE_DATA_DIR").is_err() {
            if let Some(dir) = file.storage.data_dir {
                store.data_dir = dir;
            }
        }
        if let Some(dir) = cli_cache_dir {
            store.cache_dir = PathBuf::from(dir);
        }

        Ok(Self { email, store })
    }

    /// The resolved email, or an actionable error.
    pub fn require_email(&self) -> Result<&str> {
        match self.email.as_deref() {
            Some(email) => Ok(email),
            None => bail!(
                "no email configured; pass --email, set WAYFARE_EMAIL, or run `wayfare init`"
            ),
        }
    }
}
