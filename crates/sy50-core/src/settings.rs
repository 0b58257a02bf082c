//! Updater configuration and validation.
//!
//! The attribute names `version_target`, `prompt` and `download_url` match
//! the JSON attributes the host framework already passes to the module.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Program looked up in the software inventory when none is configured.
pub const DEFAULT_PROGRAM_NAME: &str = "Simrad SY50";

/// Seconds to wait for the helper's answer.
pub const DEFAULT_CONSENT_TIMEOUT_SECS: u64 = 120;

/// Longest configurable consent wait.
pub const MAX_CONSENT_TIMEOUT_SECS: u64 = 3600;

/// Name of the rendezvous pipe.
pub const DEFAULT_PIPE_NAME: &str = r"\\.\pipe\sy50_consent";

/// Window station and desktop the helper is launched on.
pub const DEFAULT_DESKTOP: &str = r"winsta0\default";

/// Reading shown by `get_status` when the program is absent.
pub const NOT_INSTALLED: &str = "Not installed";

const PIPE_PREFIX: &str = r"\\.\pipe\";

/// Updater configuration.
///
/// Missing attributes fall back to [`UpdaterConfig::default`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UpdaterConfig {
    /// Substring matched against installed programs' display names.
    pub program_name: String,

    /// Version the machine should be running.
    #[serde(rename = "version_target")]
    pub target_version: String,

    /// Ask the desktop user interactively instead of posting a notification.
    #[serde(rename = "prompt")]
    pub prompt_enabled: bool,

    /// Helper executable launched on the user's desktop.
    #[serde(rename = "helper_path")]
    pub helper_executable_path: String,

    /// Where the updater should fetch the installer from.
    pub download_url: Option<String>,

    /// Seconds to wait for the helper's answer.
    pub consent_timeout_secs: u64,

    /// Rendezvous pipe name.
    pub pipe_name: String,

    /// Window station and desktop for the helper.
    pub desktop: String,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            program_name: DEFAULT_PROGRAM_NAME.to_string(),
            target_version: String::new(),
            prompt_enabled: false,
            helper_executable_path: String::new(),
            download_url: None,
            consent_timeout_secs: DEFAULT_CONSENT_TIMEOUT_SECS,
            pipe_name: DEFAULT_PIPE_NAME.to_string(),
            desktop: DEFAULT_DESKTOP.to_string(),
        }
    }
}

impl UpdaterConfig {
    /// Parse a JSON attribute object and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Consent wait as a `Duration`.
    pub const fn consent_timeout(&self) -> Duration {
        Duration::from_secs(self.consent_timeout_secs)
    }

    /// Label of the status reading, e.g. `"Simrad SY50 version"`.
    pub fn status_label(&self) -> String {
        format!("{} version", self.program_name)
    }

    /// Label of the check result, e.g. `"Simrad SY50 update check"`.
    pub fn check_label(&self) -> String {
        format!("{} update check", self.program_name)
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Program name cannot be empty")]
    EmptyProgramName,

    #[error("version_target must be set")]
    EmptyTargetVersion,

    #[error("version_target must contain at least one digit, got {0:?}")]
    InvalidTargetVersion(String),

    #[error("helper_path must be set when prompt is enabled")]
    MissingHelperPath,

    #[error("Consent timeout must be between 1 and 3600 seconds, got {0}")]
    InvalidTimeout(u64),

    #[error("Pipe name must start with \\\\.\\pipe\\, got {0:?}")]
    InvalidPipeName(String),
}

/// Validate configuration values.
pub fn validate_config(config: &UpdaterConfig) -> Result<(), ConfigError> {
    if config.program_name.trim().is_empty() {
        return Err(ConfigError::EmptyProgramName);
    }

    let target = config.target_version.trim();
    if target.is_empty() {
        return Err(ConfigError::EmptyTargetVersion);
    }
    if !target.chars().any(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidTargetVersion(
            config.target_version.clone(),
        ));
    }

    if config.prompt_enabled && config.helper_executable_path.trim().is_empty() {
        return Err(ConfigError::MissingHelperPath);
    }

    if !(1..=MAX_CONSENT_TIMEOUT_SECS).contains(&config.consent_timeout_secs) {
        return Err(ConfigError::InvalidTimeout(config.consent_timeout_secs));
    }

    if !config.pipe_name.starts_with(PIPE_PREFIX) || config.pipe_name.len() == PIPE_PREFIX.len()
    {
        return Err(ConfigError::InvalidPipeName(config.pipe_name.clone()));
    }

    Ok(())
}
