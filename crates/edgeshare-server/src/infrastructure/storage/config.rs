//! TOML-based configuration for the edgeshare server.
//!
//! Reads `AppConfig` from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\edgeshare\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/edgeshare/config.toml` (or `~/.config/...`)
//! - macOS:    `~/Library/Application Support/edgeshare/config.toml`
//!
//! or from an explicit path given on the command line.
//!
//! ```toml
//! [server]
//! name = "desk"
//! jump_zone = 1
//! width = 1920
//! height = 1080
//!
//! [[screens]]
//! name = "laptop"
//!
//! [[links]]
//! from = "desk"
//! edge = "right"
//! to = "laptop"
//!
//! [[links]]
//! from = "laptop"
//! edge = "left"
//! to = "desk"
//! ```
//!
//! Every field under `[server]` has a default, so a file that only lists
//! screens and links is valid.  Missing fields are filled in with
//! `#[serde(default = "...")]` helpers.
//!
//! [`AppConfig::validate`] must pass before the orchestrator is built: it
//! checks the primary geometry and builds the topology, rejecting duplicate
//! names, unknown link targets, self links and edges linked twice.

use std::path::{Path, PathBuf};
use std::time::Duration;

use edgeshare_core::domain::screen::validate_geometry;
use edgeshare_core::{Edge, Link, OptionId, OptionsList, ScreenLayout, ScreenOption, ScreenShape};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::orchestrator::OrchestratorConfig;
use crate::application::update_layout::{build_layout, UpdateLayoutError};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The screens and links do not form a valid topology.
    #[error("invalid layout: {0}")]
    Layout(#[from] UpdateLayoutError),

    /// The primary screen geometry is unusable.
    #[error("invalid primary screen: {0}")]
    Screen(#[from] edgeshare_core::ScreenError),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// Secondary screens that may connect.
    #[serde(default)]
    pub screens: Vec<ScreenEntry>,
    /// Directed edge links between screens.
    #[serde(default)]
    pub links: Vec<LinkEntry>,
    /// Options pushed to every screen on connect.
    #[serde(default)]
    pub options: Vec<OptionEntry>,
}

/// The primary screen and server tunables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Name of the primary screen in the layout.
    #[serde(default = "default_name")]
    pub name: String,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// How long a secondary may take to acknowledge an `enter`.
    #[serde(default = "default_enter_ack_timeout_ms")]
    pub enter_ack_timeout_ms: u64,
    /// Width in pixels of the band along each primary edge that triggers a
    /// handoff.
    #[serde(default = "default_jump_zone")]
    pub jump_zone: u32,
    /// Primary screen width in pixels.
    #[serde(default = "default_screen_width")]
    pub width: u32,
    /// Primary screen height in pixels.
    #[serde(default = "default_screen_height")]
    pub height: u32,
}

/// A secondary screen known to the layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScreenEntry {
    pub name: String,
    /// Jump zone used for this secondary; 0 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jump_zone: Option<u32>,
}

/// "Leaving `from` through `edge` enters `to`."
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkEntry {
    pub from: String,
    pub edge: Edge,
    pub to: String,
}

/// One option setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OptionEntry {
    pub id: u32,
    pub value: i32,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_name() -> String {
    "primary".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_enter_ack_timeout_ms() -> u64 {
    1000
}
fn default_jump_zone() -> u32 {
    1
}
fn default_screen_width() -> u32 {
    1920
}
fn default_screen_height() -> u32 {
    1080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
            enter_ack_timeout_ms: default_enter_ack_timeout_ms(),
            jump_zone: default_jump_zone(),
            width: default_screen_width(),
            height: default_screen_height(),
        }
    }
}

// ── Derived views ─────────────────────────────────────────────────────────────

impl AppConfig {
    /// Shape of the primary screen, anchored at the origin.
    pub fn primary_shape(&self) -> ScreenShape {
        ScreenShape::new(0, 0, self.server.width, self.server.height)
    }

    /// Checks the primary geometry and the topology.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Screen`] for a degenerate primary or an oversized jump
    /// zone, [`ConfigError::Layout`] for any topology inconsistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.build_layout().map(|_| ())
    }

    /// Validates the configuration and builds the topology.
    ///
    /// # Errors
    ///
    /// Same as [`validate`](Self::validate).
    pub fn build_layout(&self) -> Result<ScreenLayout, ConfigError> {
        validate_geometry(&self.server.name, &self.primary_shape(), self.server.jump_zone)?;
        let layout = build_layout(
            &self.server.name,
            self.screens.iter().map(|s| s.name.clone()),
            self.links.iter().map(|l| Link {
                from: l.from.clone(),
                edge: l.edge,
                to: l.to.clone(),
            }),
        )?;
        Ok(layout)
    }

    /// Jump zone to use for the secondary `name`.
    pub fn jump_zone_for(&self, name: &str) -> u32 {
        self.screens
            .iter()
            .find(|s| s.name == name)
            .and_then(|s| s.jump_zone)
            .unwrap_or(0)
    }

    /// The `[[options]]` table in the form sent to screens.
    pub fn options_list(&self) -> OptionsList {
        self.options
            .iter()
            .map(|o| ScreenOption {
                id: OptionId(o.id),
                value: o.value,
            })
            .collect()
    }

    pub fn enter_ack_timeout(&self) -> Duration {
        Duration::from_millis(self.server.enter_ack_timeout_ms)
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            enter_ack_timeout: self.enter_ack_timeout(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from the platform config file, returning
/// `AppConfig::default()` if the file does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let path = config_file_path()?;

    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

/// Loads `AppConfig` from an explicit path.  Unlike [`load_config`], a
/// missing file is an error.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Persists `config` to the platform config file.
///
/// # Errors
///
/// See [`save_config_to`].
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(&config_file_path()?, config)
}

/// Persists `config` to `path`, creating the parent directory if needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config base directory joined with `edgeshare`.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("edgeshare"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("edgeshare")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("edgeshare"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
