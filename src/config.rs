//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/dendroview/dendroview.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `DENDROVIEW_*` prefix, `__` separates nested keys

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, SyncOptions};
use crate::domain::LayoutParams;

pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8432/ws/admin";

/// Main settings structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// WebSocket URL of the live feed
    pub endpoint: String,
    pub layout: LayoutParams,
    pub sync: SyncOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            layout: LayoutParams::default(),
            sync: SyncOptions::default(),
        }
    }
}

/// Get the XDG config directory for dendroview.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dendroview").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("dendroview.toml"))
}

impl Settings {
    /// Load configuration with layered precedence.
    ///
    /// `config_file`, when given, must exist.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        Self::load_from(global.as_deref(), config_file, Some("DENDROVIEW"))
    }

    /// Layered load with every source explicit; `env_prefix` None skips env vars.
    pub fn load_from(
        global_file: Option<&Path>,
        config_file: Option<&Path>,
        env_prefix: Option<&str>,
    ) -> Result<Self, ApplicationError> {
        let mut builder = Self::with_defaults(Config::builder())?;

        if let Some(global_path) = global_file {
            debug!(path = %global_path.display(), "Global config");
            builder = builder.add_source(File::from(global_path).required(false));
        }
        if let Some(path) = config_file {
            debug!(path = %path.display(), "Explicit config");
            builder = builder.add_source(File::from(path).required(true));
        }
        if let Some(prefix) = env_prefix {
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let config = builder.build().map_err(config_err)?;
        let settings: Self = config.try_deserialize().map_err(config_err)?;
        settings.validate()?;
        Ok(settings)
    }

    fn with_defaults(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ApplicationError> {
        let defaults = Settings::default();
        let layout = defaults.layout;
        builder
            .set_default("endpoint", defaults.endpoint.clone())
            .map_err(config_err)?
            .set_default("layout.origin.x", layout.origin.x)
            .map_err(config_err)?
            .set_default("layout.origin.y", layout.origin.y)
            .map_err(config_err)?
            .set_default("layout.origin.z", layout.origin.z)
            .map_err(config_err)?
            .set_default("layout.radius_base", layout.radius_base)
            .map_err(config_err)?
            .set_default("layout.radius_step", layout.radius_step)
            .map_err(config_err)?
            .set_default("layout.depth_step", layout.depth_step)
            .map_err(config_err)?
            .set_default("sync.retention", "retain")
            .map_err(config_err)?
            .set_default("sync.max_depth", defaults.sync.max_depth as i64)
            .map_err(config_err)
    }

    /// Reject settings the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        self.layout.validate()?;
        if !(self.endpoint.starts_with("ws://") || self.endpoint.starts_with("wss://")) {
            return Err(ApplicationError::Config {
                message: format!("endpoint must be a ws:// or wss:// URL: {}", self.endpoint),
            });
        }
        if self.sync.max_depth == 0 {
            return Err(ApplicationError::Config {
                message: "sync.max_depth must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# dendroview configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/dendroview/dendroview.toml
#   Explicit: dendroview --config <FILE>
#   Env:      DENDROVIEW_* environment variables, e.g. DENDROVIEW_LAYOUT__DEPTH_STEP=6

# WebSocket feed of permission trees
# endpoint = "ws://localhost:8432/ws/admin"

[layout]
# Distance of the root's children from the root's axis
# radius_base = 5.0
# Extra radius per level below the root
# radius_step = 2.0
# Vertical drop per level
# depth_step = 4.0

[layout.origin]
# x = 0.0
# y = 10.0
# z = 0.0

[sync]
# What happens to the last tree when the feed closes: "retain" or "clear"
# retention = "retain"
# Snapshots nested deeper than this are rejected
# max_depth = 48
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
