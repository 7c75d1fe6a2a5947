use std::env;
use std::path::PathBuf;

/// Prefix for draft cache keys; the full key is `<namespace>_<tripId>`.
pub const DRAFT_NAMESPACE: &str = "wayfare_trip";

/// Storage configuration: where drafts are cached and where the
/// file-backed trip store keeps its documents.
///
/// Reads from the `WAYFARE_CACHE_DIR` and `WAYFARE_DATA_DIR` environment
/// variables, falling back to XDG layout (`~/.cache/wayfare`,
/// `~/.local/share/wayfare`).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding draft snapshot files.
    pub cache_dir: PathBuf,
    /// Directory holding persisted trip documents.
    pub data_dir: PathBuf,
}

impl StoreConfig {
    /// Build a config from the environment.
    ///
    /// Priority per directory: env var, then XDG env var, then the home
    /// fallback. We intentionally use XDG layout on every platform rather
    /// than `dirs::cache_dir()` (which returns `~/Library/Caches` on
    /// macOS), matching the rest of the wayfare tooling.
    pub fn from_env() -> Self {
        Self {
            cache_dir: resolve_dir("WAYFARE_CACHE_DIR", "XDG_CACHE_HOME", ".cache"),
            data_dir: resolve_dir("WAYFARE_DATA_DIR", "XDG_DATA_HOME", ".local/share"),
        }
    }

    /// Build a config with explicit directories (useful for tests and CLI
    /// flags).
    pub fn new(cache_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            data_dir: data_dir.into(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn resolve_dir(app_var: &str, xdg_var: &str, home_suffix: &str) -> PathBuf {
    if let Ok(dir) = env::var(app_var) {
        return PathBuf::from(dir);
    }
    if let Ok(xdg) = env::var(xdg_var) {
        return PathBuf::from(xdg).join("wayfare");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(home_suffix)
        .join("wayfare")
}
