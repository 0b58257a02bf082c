//! Updater hand-off adapters.

use async_trait::async_trait;
use sy50_core::{UpdatePlan, UpdaterError, UpdaterPort};
use tracing::info;

/// Records accepted plans as structured log events for the installer
/// service that tails the updater log.
#[derive(Debug, Default)]
pub struct LoggingUpdater;

#[async_trait]
impl UpdaterPort for LoggingUpdater {
    async fn hand_off(&self, plan: &UpdatePlan) -> Result<(), UpdaterError> {
        let attributes =
            serde_json::to_string(plan).map_err(|e| UpdaterError::Rejected(e.to_string()))?;
        info!(
            program = %plan.program,
            target_version = %plan.target_version,
            %attributes,
            "Update approved, handing off to updater"
        );
        Ok(())
    }
}
