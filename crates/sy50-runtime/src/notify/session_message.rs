//! Fire-and-forget message box on the active console session.

#![allow(unsafe_code)]

use std::io;

use sy50_core::{ConsentError, NotificationError, NotificationPort, UpdateNotice};
use tracing::debug;
use windows_sys::Win32::System::RemoteDesktop::{WTS_CURRENT_SERVER_HANDLE, WTSSendMessageW};
use windows_sys::Win32::UI::WindowsAndMessaging::{MB_ICONINFORMATION, MB_OK, MB_SETFOREGROUND};

use crate::consent::{active_console_session, to_wide};

/// Posts the notice with `WTSSendMessageW` and returns without waiting for
/// the user to dismiss it.
#[derive(Debug, Default)]
pub struct SessionMessageNotifier;

impl NotificationPort for SessionMessageNotifier {
    fn notify(&self, notice: &UpdateNotice) -> Result<(), NotificationError> {
        let session_id = active_console_session().map_err(|e| match e {
            ConsentError::NoInteractiveSession => NotificationError::NoRecipient,
            other => NotificationError::DeliveryFailed(other.to_string()),
        })?;

        let title = to_wide(&notice.title);
        let body = to_wide(&notice.body);
        let mut response = 0;

        // SAFETY: title and body are live NUL-terminated buffers; lengths are
        // in bytes without the terminator. With bWait = FALSE the call
        // returns immediately and only writes `response`.
        let sent = unsafe {
            WTSSendMessageW(
                WTS_CURRENT_SERVER_HANDLE,
                session_id,
                title.as_ptr(),
                byte_len(&title),
                body.as_ptr(),
                byte_len(&body),
                MB_OK | MB_ICONINFORMATION | MB_SETFOREGROUND,
                0,
                &raw mut response,
                0,
            )
        };
        if sent == 0 {
            return Err(NotificationError::DeliveryFailed(
                io::Error::last_os_error().to_string(),
            ));
        }

        debug!(session_id, "Session message posted");
        Ok(())
    }
}

/// Byte length of a NUL-terminated UTF-16 buffer, excluding the NUL.
fn byte_len(wide: &[u16]) -> u32 {
    u32::try_from(wide.len().saturating_sub(1) * 2).unwrap_or(u32::MAX)
}
