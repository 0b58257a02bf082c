//! Update decision state machine.
//!
//! One cycle walks:
//!
//! ```text
//! Start -> DetectVersion -> Installed(v) -> UpToDate(v)
//!                        |               -> UpdateAvailable(v) -> RequestingConsent -> Resolved
//!                        -> NotInstalled -----------------------> RequestingConsent -> Resolved
//!                        -> InventoryUnavailable
//! ```
//!
//! Each cycle is a fresh value; nothing is carried between triggers. Cycles
//! are serialized through a single gate: a trigger arriving while another
//! cycle holds it is rejected immediately with `Busy`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::{
    ConsentRequest, ConsentResponse, ConsentStrategy, CycleState, DecisionOutcome, DecisionReport,
};
use crate::ports::{ConsentError, ConsentPort, InventoryError};
use crate::settings::UpdaterConfig;
use crate::version::is_target_greater;

use super::notification_fallback::NotificationFallback;
use super::version_oracle::{VersionLookup, VersionOracle};

/// Inputs of one decision cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckPolicy {
    pub program_name: String,
    pub target_version: String,
    pub prompt_enabled: bool,
    pub consent_timeout: Duration,
}

impl From<&UpdaterConfig> for CheckPolicy {
    fn from(config: &UpdaterConfig) -> Self {
        Self {
            program_name: config.program_name.clone(),
            target_version: config.target_version.clone(),
            prompt_enabled: config.prompt_enabled,
            consent_timeout: config.consent_timeout(),
        }
    }
}

/// Drives decision cycles.
pub struct UpdateDecisionEngine {
    oracle: VersionOracle,
    consent: Arc<dyn ConsentPort>,
    fallback: NotificationFallback,
    gate: Arc<Mutex<()>>,
}

impl UpdateDecisionEngine {
    pub fn new(
        oracle: VersionOracle,
        consent: Arc<dyn ConsentPort>,
        fallback: NotificationFallback,
    ) -> Self {
        Self {
            oracle,
            consent,
            fallback,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Whether a cycle currently holds the gate.
    pub fn is_busy(&self) -> bool {
        self.gate.try_lock().is_err()
    }

    /// Run one complete cycle and report how it ended.
    pub async fn run_cycle(
        &self,
        policy: &CheckPolicy,
        shutdown: &CancellationToken,
    ) -> DecisionReport {
        let started_at = Utc::now();

        let Ok(_permit) = self.gate.try_lock() else {
            info!(program = %policy.program_name, "Update check rejected, another cycle is active");
            return DecisionReport {
                outcome: DecisionOutcome::Busy,
                trace: vec![
                    CycleState::Start.name().to_string(),
                    CycleState::Busy.name().to_string(),
                ],
                started_at,
                finished_at: Utc::now(),
            };
        };

        let mut trace = Vec::new();
        let mut state = CycleState::Start;

        let outcome = loop {
            trace.push(state.name().to_string());
            debug!(state = state.name(), "Decision cycle state");

            state = match state {
                CycleState::Start => CycleState::DetectVersion,

                CycleState::DetectVersion => match self.detect(&policy.program_name).await {
                    Ok(VersionLookup::Installed(version)) => CycleState::Installed(version),
                    Ok(VersionLookup::NotFound) => CycleState::NotInstalled,
                    Err(e) => {
                        warn!(error = %e, "Software inventory unavailable");
                        CycleState::InventoryUnavailable(e.to_string())
                    }
                },

                CycleState::Installed(version) => {
                    if is_target_greater(&version, &policy.target_version) {
                        CycleState::UpdateAvailable(version)
                    } else {
                        CycleState::UpToDate(version)
                    }
                }

                CycleState::NotInstalled => CycleState::RequestingConsent(ConsentRequest::new(
                    None,
                    policy.target_version.clone(),
                )),

                CycleState::UpdateAvailable(version) => CycleState::RequestingConsent(
                    ConsentRequest::new(Some(version), policy.target_version.clone()),
                ),

                CycleState::RequestingConsent(request) => {
                    let (strategy, response) = self.obtain_consent(policy, &request, shutdown).await;
                    CycleState::Resolved {
                        request,
                        strategy,
                        response,
                    }
                }

                CycleState::UpToDate(installed) => {
                    break DecisionOutcome::UpToDate {
                        installed,
                        target: policy.target_version.clone(),
                    };
                }
                CycleState::Resolved {
                    request,
                    strategy,
                    response,
                } => {
                    break DecisionOutcome::Resolved {
                        request,
                        strategy,
                        response,
                    };
                }
                CycleState::InventoryUnavailable(reason) => {
                    break DecisionOutcome::InventoryUnavailable { reason };
                }
                CycleState::Busy => break DecisionOutcome::Busy,
            };
        };

        info!(
            program = %policy.program_name,
            target_version = %policy.target_version,
            outcome = %outcome.describe(&policy.program_name),
            "Update check finished"
        );

        DecisionReport {
            outcome,
            trace,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Scan the inventory on a blocking thread.
    async fn detect(&self, program_name: &str) -> Result<VersionLookup, InventoryError> {
        let oracle = self.oracle.clone();
        let program_name = program_name.to_string();
        tokio::task::spawn_blocking(move || oracle.lookup(&program_name))
            .await
            .map_err(|e| InventoryError::access(format!("inventory scan task failed: {e}")))?
    }

    async fn obtain_consent(
        &self,
        policy: &CheckPolicy,
        request: &ConsentRequest,
        shutdown: &CancellationToken,
    ) -> (ConsentStrategy, ConsentResponse) {
        if shutdown.is_cancelled() {
            debug!("Shutting down, consent not requested");
            let strategy = if policy.prompt_enabled {
                ConsentStrategy::Interactive
            } else {
                ConsentStrategy::Notification
            };
            return (strategy, ConsentResponse::Unavailable);
        }

        if !policy.prompt_enabled {
            debug!("Prompting disabled, posting notification");
            let response = self.fallback.notify(&policy.program_name, request);
            return (ConsentStrategy::Notification, response);
        }

        match self
            .consent
            .request_consent(request, policy.consent_timeout, shutdown)
            .await
        {
            Ok(response) => (ConsentStrategy::Interactive, response),
            Err(e) if e.allows_notification() => {
                info!(error = %e, "Interactive consent unavailable, falling back to notification");
                let response = self.fallback.notify(&policy.program_name, request);
                (ConsentStrategy::Notification, response)
            }
            Err(ConsentError::Shutdown) => {
                debug!("Consent request abandoned on shutdown");
                (ConsentStrategy::Interactive, ConsentResponse::Unavailable)
            }
            Err(e) => {
                warn!(error = %e, "Interactive consent failed");
                (ConsentStrategy::Interactive, ConsentResponse::Unavailable)
            }
        }
    }
}
