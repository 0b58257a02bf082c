//! Passive notification strategy.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{ConsentRequest, ConsentResponse, UpdateNotice};
use crate::ports::NotificationPort;

/// Posts an update notice without waiting for the user.
///
/// Always resolves to [`ConsentResponse::Unavailable`]: a notification can
/// inform but never authorize an installation.
#[derive(Clone)]
pub struct NotificationFallback {
    notifier: Arc<dyn NotificationPort>,
}

impl NotificationFallback {
    pub fn new(notifier: Arc<dyn NotificationPort>) -> Self {
        Self { notifier }
    }

    pub fn notify(&self, program: &str, request: &ConsentRequest) -> ConsentResponse {
        let notice = UpdateNotice::for_request(program, request);
        match self.notifier.notify(&notice) {
            Ok(()) => info!(title = %notice.title, "Update notification posted"),
            Err(e) => warn!(error = %e, title = %notice.title, "Failed to post update notification"),
        }
        ConsentResponse::Unavailable
    }
}
