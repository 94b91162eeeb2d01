//! Locating and loading `notag.toml`.
//!
//! Lookup order, first hit wins:
//!
//! 1. `--config <PATH>`
//! 2. `notag.toml`, then `.notag.toml`, in the project directory
//! 3. `config.toml` in the global directory (`$NOTAG_CONFIG_DIR`, else `~/.notag/`)
//! 4. built-in defaults

use anyhow::{Context, Result};
use notag_core::Config;
use std::path::{Path, PathBuf};

/// File names looked up in the project directory.
const PROJECT_FILES: [&str; 2] = ["notag.toml", ".notag.toml"];

/// File name looked up in the global directory.
const GLOBAL_FILE: &str = "config.toml";

/// Environment variable overriding the global directory.
const CONFIG_DIR_ENV: &str = "NOTAG_CONFIG_DIR";

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Found in the global directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// The config file, unless defaults are used.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Reads and parses the config file, or returns defaults.
    ///
    /// An explicit path that does not exist is an error.
    pub fn load(&self) -> Result<Config> {
        let Some(path) = self.path() else {
            tracing::debug!("No config file found, using defaults");
            return Ok(Config::default());
        };
        if matches!(self, Self::Global(_)) {
            tracing::info!("Using global config: {}", path.display());
        } else {
            tracing::debug!("Using config: {}", path.display());
        }
        Config::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

/// Resolves the config for a project directory.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_in(project_dir, explicit, global_config_dir().as_deref())
}

/// Resolution with the global directory passed in, so tests need not touch
/// the environment.
fn resolve_in(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<&Path>,
) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }

    if let Some(found) = PROJECT_FILES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.is_file())
    {
        return ConfigSource::Project(found);
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_FILE))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, ConfigSource::Global)
}

/// The global config directory.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    std::env::var_os(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|home| home.join(".notag")))
}
