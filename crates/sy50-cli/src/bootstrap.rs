//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together.
//! All concrete adapters are instantiated here:
//! - Software inventory (registry on Windows)
//! - Consent channel (session token + helper + named pipe on Windows)
//! - Passive notifier and updater hand-off
//!
//! Command handlers receive the composed `UpdaterComponent`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sy50_core::{
    NotificationFallback, UpdateDecisionEngine, UpdaterComponent, UpdaterConfig, VersionOracle,
    validate_config,
};
use sy50_runtime::{
    ConsentOptions, LoggingUpdater, default_consent_port, default_inventory, default_notifier,
};
use tracing::debug;

use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// JSON attribute file; defaults apply when absent.
    pub config_path: Option<PathBuf>,
    /// Replaces `version_target` from the file.
    pub target_override: Option<String>,
    /// Forces `prompt = false`.
    pub no_prompt: bool,
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    pub component: Arc<UpdaterComponent>,
}

/// Read, override and validate the updater configuration.
pub fn load_config(cli: &CliConfig) -> Result<UpdaterConfig, CliError> {
    let mut config = match &cli.config_path {
        Some(path) => read_config_file(path)?,
        None => UpdaterConfig::default(),
    };

    if let Some(target) = &cli.target_override {
        config.target_version.clone_from(target);
    }
    if cli.no_prompt {
        config.prompt_enabled = false;
    }

    validate_config(&config)?;
    debug!(
        program = %config.program_name,
        target_version = %config.target_version,
        prompt = config.prompt_enabled,
        "Updater configuration loaded"
    );
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<UpdaterConfig, CliError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&json)
        .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))
}

/// Wire the platform adapters into an `UpdaterComponent`.
pub fn bootstrap(config: UpdaterConfig) -> CliContext {
    let oracle = VersionOracle::new(default_inventory());
    let consent = default_consent_port(ConsentOptions::from(&config));
    let fallback = NotificationFallback::new(default_notifier());
    let engine = UpdateDecisionEngine::new(oracle.clone(), consent, fallback);
    let component = UpdaterComponent::new(config, oracle, engine, Arc::new(LoggingUpdater));

    CliContext {
        component: Arc::new(component),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tokio_test::{assert_err, assert_ok};

    fn config_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_from_file() {
        let file = config_file(
            r#"{"version_target": "1.5.0", "prompt": true, "helper_path": "C:\\SY50\\consent.exe"}"#,
        );
        let config = assert_ok!(load_config(&CliConfig {
            config_path: Some(file.path().to_path_buf()),
            ..CliConfig::default()
        }));
        assert_eq!(config.target_version, "1.5.0");
        assert!(config.prompt_enabled);
    }

    #[test]
    fn test_overrides_apply_before_validation() {
        let file = config_file(r#"{"prompt": true}"#);
        let config = assert_ok!(load_config(&CliConfig {
            config_path: Some(file.path().to_path_buf()),
            target_override: Some("2.0".to_string()),
            no_prompt: true,
        }));
        assert_eq!(config.target_version, "2.0");
        assert!(!config.prompt_enabled);
    }

    #[test]
    fn test_missing_target_is_a_config_error() {
        let err = assert_err!(load_config(&CliConfig::default()));
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = assert_err!(load_config(&CliConfig {
            config_path: Some(dir.path().join("absent.json")),
            ..CliConfig::default()
        }));
        assert!(matches!(err, CliError::Io(_)));
    }

    #[test]
    fn test_malformed_file_is_a_config_error() {
        let file = config_file("{ nope");
        let err = assert_err!(load_config(&CliConfig {
            config_path: Some(file.path().to_path_buf()),
            target_override: Some("1.0".to_string()),
            ..CliConfig::default()
        }));
        assert!(matches!(err, CliError::Config(_)));
    }

    #[tokio::test]
    async fn test_bootstrap_reports_status() {
        let config = UpdaterConfig {
            target_version: "1.0".to_string(),
            ..UpdaterConfig::default()
        };
        let ctx = bootstrap(config);
        let status = ctx.component.get_status().await;
        assert_eq!(status.label, "Simrad SY50 version");
        assert!(!status.version.is_empty());
    }
}
