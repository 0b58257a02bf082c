//! Passive notification port.

use thiserror::Error;

use crate::domain::UpdateNotice;

/// Errors that can occur while posting a notification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotificationError {
    /// There is no desktop to show the notification on.
    #[error("No session to notify")]
    NoRecipient,

    /// The platform refused or failed to deliver the notification.
    #[error("Notification delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Port for fire-and-forget user notifications.
///
/// Implementations must not wait for the user to interact with the
/// notification.
pub trait NotificationPort: Send + Sync {
    fn notify(&self, notice: &UpdateNotice) -> Result<(), NotificationError>;
}
