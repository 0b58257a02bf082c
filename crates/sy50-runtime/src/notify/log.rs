//! Log-only notifier for hosts without an interactive desktop.

use sy50_core::{NotificationError, NotificationPort, UpdateNotice};
use tracing::info;

/// Records the notice in the service log only.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl NotificationPort for LogNotifier {
    fn notify(&self, notice: &UpdateNotice) -> Result<(), NotificationError> {
        info!(title = %notice.title, body = %notice.body, "Update notice");
        Ok(())
    }
}
