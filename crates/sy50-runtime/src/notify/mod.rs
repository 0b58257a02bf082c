//! Passive notification adapters.

mod log;
#[cfg(windows)]
mod session_message;

use std::sync::Arc;

use sy50_core::NotificationPort;

pub use log::LogNotifier;
#[cfg(windows)]
pub use session_message::SessionMessageNotifier;

/// Notifier for the current platform.
pub fn default_notifier() -> Arc<dyn NotificationPort> {
    #[cfg(windows)]
    {
        Arc::new(SessionMessageNotifier)
    }

    #[cfg(not(windows))]
    {
        Arc::new(LogNotifier)
    }
}
