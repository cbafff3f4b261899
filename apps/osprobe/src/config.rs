//! Probe configuration.
//!
//! Stored as TOML in the probe's own application data directory:
//! - Linux: `$XDG_DATA_HOME/osprobe/osprobe.toml` (or `~/.local/share/...`)
//! - macOS: `~/Library/Application Support/osprobe/osprobe.toml`
//! - Windows: `%APPDATA%/osprobe/osprobe.toml`

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Name of the application data subdirectory owned by the probe.
pub const DATA_DIR_NAME: &str = "osprobe";

const CONFIG_FILE_NAME: &str = "osprobe.toml";

/// Which entries `ls` prints when no filter flag is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Listing {
    #[default]
    All,
    Files,
    Dirs,
}

/// Probe configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Seconds a launched child waits before starting, unless `--delay` is given.
    #[serde(default)]
    pub launch_delay_secs: u32,

    /// Default `ls` filter.
    #[serde(default)]
    pub listing: Listing,
}

fn default_log_filter() -> String {
    "info".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            launch_delay_secs: 0,
            listing: Listing::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the probe's data directory, writing the
    /// defaults there on first run.
    pub fn load() -> anyhow::Result<Self> {
        let dir = moppet_os::custom_app_data_dir(DATA_DIR_NAME)
            .context("no application data directory available")?;
        Self::load_from(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from `path`, creating it with defaults if missing.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        // Restrict permissions on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }
}

/// Returns where [`Config::load`] reads from, if the data directory resolves.
pub fn config_path() -> Option<PathBuf> {
    moppet_os::app_data_dir().map(|root| root.join(DATA_DIR_NAME).join(CONFIG_FILE_NAME))
}
