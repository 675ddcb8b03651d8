//! TOML-based configuration for the client binary.
//!
//! Read from the path given on the command line, or else from the
//! platform-appropriate config file:
//! - Windows:  `%APPDATA%\KvClient\config.toml`
//! - Linux:    `~/.config/kv-client/config.toml` (honours `XDG_CONFIG_HOME`)
//! - macOS:    `~/Library/Application Support/KvClient/config.toml`
//!
//! Example:
//!
//! ```toml
//! log_level = "debug"
//!
//! [suite]
//! timeout_secs = 20
//! host_test_name = "example_host"
//!
//! [console]
//! backend = "file"
//! input_path = "host_to_device.txt"
//! output_path = "device_to_host.txt"
//! ```
//!
//! # Serde default values
//!
//! Every field carries a `#[serde(default ...)]` attribute, so an empty file,
//! a file with only some sections, or no file at all all produce a usable
//! configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

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
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level client configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// `tracing` filter used when `RUST_LOG` is not set, e.g. `"info"` or
    /// `"kv_core=debug"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub suite: SuiteConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
}

/// Values announced to the host during the handshake.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SuiteConfig {
    /// Seconds the host allows the suite to run after the handshake.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u32,
    /// Host-side test script the runner should load.
    #[serde(default = "default_host_test_name")]
    pub host_test_name: String,
}

/// Which character stream the client talks over.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleBackend {
    /// Standard input and standard output.
    #[default]
    Stdio,
    /// Read from `input_path`, write to `output_path`.
    File,
}

/// Console backend selection.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub backend: ConsoleBackend,
    /// Required by the `file` backend.
    #[serde(default)]
    pub input_path: Option<PathBuf>,
    /// Required by the `file` backend.
    #[serde(default)]
    pub output_path: Option<PathBuf>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_timeout_secs() -> u32 {
    20
}
fn default_host_test_name() -> String {
    "default_auto".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            suite: SuiteConfig::default(),
            console: ConsoleConfig::default(),
        }
    }
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            host_test_name: default_host_test_name(),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined from the environment.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads the config from the default location; see [`load_config_from`].
///
/// # Errors
///
/// See [`config_file_path`] and [`load_config_from`].
pub fn load_config() -> Result<ClientConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `ClientConfig` from `path`, returning `ClientConfig::default()` if
/// the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<ClientConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(ClientConfig::default())
        }
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("KvClient"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("kv-client"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("KvClient")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
