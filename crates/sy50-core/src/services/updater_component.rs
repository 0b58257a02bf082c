//! Host-facing component surface.
//!
//! [`UpdaterComponent`] is what a host framework registers once at process
//! start: a status reading, an on-demand update check, and a close signal.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::{ConsentResponse, DecisionOutcome, DecisionReport, UpdatePlan};
use crate::ports::UpdaterPort;
use crate::settings::{NOT_INSTALLED, UpdaterConfig};

use super::decision_engine::{CheckPolicy, UpdateDecisionEngine};
use super::version_oracle::{VersionLookup, VersionOracle};

/// Current installed version, labelled for the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReading {
    pub label: String,
    pub version: String,
}

impl StatusReading {
    /// `{"<program> version": "<version>"}`
    pub fn to_readings(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(self.label.clone(), Value::String(self.version.clone()));
        map
    }
}

/// Result of one `trigger_check` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub label: String,
    pub text: String,
    pub report: DecisionReport,
}

impl CheckResult {
    /// `{"<program> update check": "<text>"}`
    pub fn to_response(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(self.label.clone(), Value::String(self.text.clone()));
        map
    }
}

/// The update-check component.
pub struct UpdaterComponent {
    config: UpdaterConfig,
    oracle: VersionOracle,
    engine: UpdateDecisionEngine,
    updater: Arc<dyn UpdaterPort>,
    shutdown: CancellationToken,
}

impl UpdaterComponent {
    pub fn new(
        config: UpdaterConfig,
        oracle: VersionOracle,
        engine: UpdateDecisionEngine,
        updater: Arc<dyn UpdaterPort>,
    ) -> Self {
        Self {
            config,
            oracle,
            engine,
            updater,
            shutdown: CancellationToken::new(),
        }
    }

    pub const fn config(&self) -> &UpdaterConfig {
        &self.config
    }

    /// Report the installed version, or `"Not installed"`.
    pub async fn get_status(&self) -> StatusReading {
        let oracle = self.oracle.clone();
        let program_name = self.config.program_name.clone();
        let lookup = tokio::task::spawn_blocking(move || oracle.lookup(&program_name)).await;

        let version = match lookup {
            Ok(Ok(VersionLookup::Installed(version))) => version,
            Ok(Ok(VersionLookup::NotFound)) => NOT_INSTALLED.to_string(),
            Ok(Err(e)) => {
                warn!(error = %e, "Failed to read installed version");
                NOT_INSTALLED.to_string()
            }
            Err(e) => {
                warn!(error = %e, "Version lookup task failed");
                NOT_INSTALLED.to_string()
            }
        };

        info!(program = %self.config.program_name, %version, "Installed version details");
        StatusReading {
            label: self.config.status_label(),
            version,
        }
    }

    /// Run one decision cycle.
    ///
    /// `command` may override `version_target` (string) and `prompt` (bool)
    /// for this call only; other keys are ignored. On acceptance the update
    /// is handed to the updater; a failed hand-off is reported in the text.
    pub async fn trigger_check(&self, command: &Map<String, Value>) -> CheckResult {
        let policy = self.policy_for(command);
        let report = self.engine.run_cycle(&policy, &self.shutdown).await;
        let mut text = report.outcome.describe(&policy.program_name);

        if let DecisionOutcome::Resolved {
            request,
            response: ConsentResponse::Accepted,
            ..
        } = &report.outcome
        {
            let plan = UpdatePlan {
                program: policy.program_name.clone(),
                current_version: request.current_version.clone(),
                target_version: request.target_version.clone(),
                download_url: self.config.download_url.clone(),
            };
            match self.updater.hand_off(&plan).await {
                Ok(()) => {
                    info!(target_version = %plan.target_version, "Update handed off to updater");
                    text.push_str(" The update has been handed to the updater.");
                }
                Err(e) => {
                    warn!(error = %e, "Updater hand-off failed");
                    text.push_str(&format!(" Hand-off to the updater failed: {e}"));
                }
            }
        }

        CheckResult {
            label: self.config.check_label(),
            text,
            report,
        }
    }

    /// Signal shutdown. In-flight consent waits return promptly and later
    /// checks resolve without asking.
    pub fn close(&self) {
        if !self.shutdown.is_cancelled() {
            info!(program = %self.config.program_name, "Closing updater component");
        }
        self.shutdown.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    fn policy_for(&self, command: &Map<String, Value>) -> CheckPolicy {
        let mut policy = CheckPolicy::from(&self.config);
        for (key, value) in command {
            match (key.as_str(), value) {
                ("version_target", Value::String(target)) if !target.trim().is_empty() => {
                    debug!(target_version = %target, "Target version overridden by command");
                    policy.target_version = target.clone();
                }
                ("prompt", Value::Bool(prompt)) => {
                    debug!(prompt, "Prompting overridden by command");
                    policy.prompt_enabled = *prompt && !self.config.helper_executable_path.is_empty();
                }
                _ => debug!(%key, "Ignoring command attribute"),
            }
        }
        policy
    }
}
