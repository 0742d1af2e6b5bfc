//! Centralized path resolution for clusterup
//!
//! # Environment Variables
//!
//! - `CLUSTERUP_CONFIG_DIR` - Override config directory (e.g., `~/infra/clusterup`)
//! - `CLUSTERUP_STATE_DIR` - Override state directory (simulated cloud lives here)
//!
//! Without an override, both fall back to the platform directory from `dirs`
//! (`$XDG_CONFIG_HOME` and `$XDG_STATE_HOME` on Linux), with `clusterup`
//! appended. Platforms without a state directory use the local data one.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "CLUSTERUP_CONFIG_DIR";

/// Environment variable for state directory override
pub const ENV_STATE_DIR: &str = "CLUSTERUP_STATE_DIR";

const APP_DIR: &str = "clusterup";

/// Default cluster file name inside the config directory
pub const CONFIG_FILE: &str = "cluster.toml";

/// Default simulated cloud file name inside the state directory
pub const STATE_FILE: &str = "cloud.json";

/// Get the clusterup config directory path
pub fn config_dir() -> Result<PathBuf> {
    resolve_dir(ENV_CONFIG_DIR, dirs::config_dir(), "config")
}

/// Get the clusterup state directory path
pub fn state_dir() -> Result<PathBuf> {
    resolve_dir(
        ENV_STATE_DIR,
        dirs::state_dir().or_else(dirs::data_local_dir),
        "state",
    )
}

fn resolve_dir(env_var: &str, platform: Option<PathBuf>, what: &str) -> Result<PathBuf> {
    let path = match std::env::var(env_var) {
        Ok(dir) => expand(&dir),
        Err(_) => platform
            .with_context(|| format!("Could not determine {what} directory"))?
            .join(APP_DIR),
    };
    log::debug!("Using {what} dir: {}", path.display());
    Ok(path)
}

/// Cluster file: the explicit path if given, else the default location
pub fn config_file(explicit: Option<&str>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(expand(path)),
        None => Ok(config_dir()?.join(CONFIG_FILE)),
    }
}

/// Simulated cloud file: the explicit path if given, else the default location
pub fn state_file(explicit: Option<&str>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(expand(path)),
        None => Ok(state_dir()?.join(STATE_FILE)),
    }
}

/// Expand ~ and environment variables in a path string.
///
/// Unknown variables are left as written.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}
