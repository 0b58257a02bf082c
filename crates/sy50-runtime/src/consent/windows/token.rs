//! Interactive session lookup and user token acquisition.

use std::io;
use std::os::windows::io::{AsRawHandle, FromRawHandle, OwnedHandle, RawHandle};
use std::ptr;

use sy50_core::ConsentError;
use tracing::debug;
use windows_sys::Win32::Foundation::HANDLE;
use windows_sys::Win32::Security::{
    DuplicateTokenEx, SecurityImpersonation, TOKEN_ALL_ACCESS, TokenPrimary,
};
use windows_sys::Win32::System::RemoteDesktop::{WTSGetActiveConsoleSessionId, WTSQueryUserToken};

/// Returned by `WTSGetActiveConsoleSessionId` when nobody is attached.
const NO_CONSOLE_SESSION: u32 = 0xFFFF_FFFF;

/// Id of the session attached to the physical console.
pub fn active_console_session() -> Result<u32, ConsentError> {
    // SAFETY: no arguments, no preconditions.
    let session_id = unsafe { WTSGetActiveConsoleSessionId() };
    if session_id == NO_CONSOLE_SESSION {
        return Err(ConsentError::NoInteractiveSession);
    }
    Ok(session_id)
}

/// Primary token of the user logged on to a session.
///
/// Exclusively owned; the handle is closed exactly once on drop.
pub struct UserToken {
    handle: OwnedHandle,
    session_id: u32,
}

impl UserToken {
    /// Query the session's user token and duplicate it into a primary token
    /// usable with `CreateProcessAsUserW`.
    ///
    /// Requires the caller to run as LocalSystem (`SE_TCB_NAME`).
    pub fn for_session(session_id: u32) -> Result<Self, ConsentError> {
        let mut impersonation: HANDLE = ptr::null_mut();
        // SAFETY: `impersonation` is a valid out-pointer for the duration of the call.
        if unsafe { WTSQueryUserToken(session_id, &raw mut impersonation) } == 0 {
            let err = io::Error::last_os_error();
            return Err(ConsentError::Credential(format!(
                "WTSQueryUserToken({session_id}): {err}"
            )));
        }
        // SAFETY: the call succeeded, so `impersonation` is an open handle we now own.
        let impersonation = unsafe { OwnedHandle::from_raw_handle(impersonation as RawHandle) };

        let mut primary: HANDLE = ptr::null_mut();
        // SAFETY: the source handle is open for the whole call, the out-pointer
        // is valid, and null token attributes request the default descriptor.
        let duplicated = unsafe {
            DuplicateTokenEx(
                impersonation.as_raw_handle() as HANDLE,
                TOKEN_ALL_ACCESS,
                ptr::null(),
                SecurityImpersonation,
                TokenPrimary,
                &raw mut primary,
            )
        };
        if duplicated == 0 {
            let err = io::Error::last_os_error();
            return Err(ConsentError::Credential(format!("DuplicateTokenEx: {err}")));
        }
        // SAFETY: on success `primary` is a new handle owned by us.
        let handle = unsafe { OwnedHandle::from_raw_handle(primary as RawHandle) };

        debug!(session_id, "Acquired primary token for session user");
        Ok(Self { handle, session_id })
    }

    pub fn as_raw(&self) -> HANDLE {
        self.handle.as_raw_handle() as HANDLE
    }

    pub const fn session_id(&self) -> u32 {
        self.session_id
    }
}

impl Drop for UserToken {
    fn drop(&mut self) {
        debug!(session_id = self.session_id, "Releasing session user token");
    }
}
