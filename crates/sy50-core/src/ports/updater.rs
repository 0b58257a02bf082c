//! Updater hand-off port.
//!
//! Downloading and installing the update is owned by a separate updater.
//! Once the user accepts, the component passes an [`UpdatePlan`] across this
//! port and moves on; it never waits for the installation itself.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::UpdatePlan;

/// Errors returned by the updater collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpdaterError {
    /// The updater did not accept the plan.
    #[error("Updater rejected the plan: {0}")]
    Rejected(String),

    /// The updater could not be reached.
    #[error("Updater unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait UpdaterPort: Send + Sync {
    /// Hand `plan` to the updater.
    async fn hand_off(&self, plan: &UpdatePlan) -> Result<(), UpdaterError>;
}
