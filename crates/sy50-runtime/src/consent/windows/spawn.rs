//! Helper process creation on the interactive user's desktop.

use std::ffi::OsStr;
use std::io;
use std::mem;
use std::os::windows::ffi::OsStrExt;
use std::os::windows::io::{FromRawHandle, OwnedHandle, RawHandle};
use std::ptr;

use sy50_core::ConsentError;
use windows_sys::Win32::System::Threading::{
    CREATE_UNICODE_ENVIRONMENT, CreateProcessAsUserW, PROCESS_INFORMATION, STARTUPINFOW,
};

use super::token::UserToken;

/// Handles of a launched helper. Both are closed on drop; the helper itself
/// keeps running and exits on its own once it has answered.
pub struct HelperProcess {
    _process: OwnedHandle,
    _thread: OwnedHandle,
    pid: u32,
}

impl HelperProcess {
    pub const fn pid(&self) -> u32 {
        self.pid
    }
}

/// NUL-terminated UTF-16 copy of `s`.
pub fn to_wide(s: &str) -> Vec<u16> {
    OsStr::new(s).encode_wide().chain(std::iter::once(0)).collect()
}

/// Start `command_line` as the token's user on `desktop`.
pub fn spawn_as_user(
    token: &UserToken,
    command_line: &str,
    desktop: &str,
) -> Result<HelperProcess, ConsentError> {
    // CreateProcessAsUserW may write into the command line buffer.
    let mut command_line = to_wide(command_line);
    let mut desktop = to_wide(desktop);

    // SAFETY: STARTUPINFOW is a plain C struct for which all-zero is valid.
    let mut startup: STARTUPINFOW = unsafe { mem::zeroed() };
    startup.cb = u32::try_from(mem::size_of::<STARTUPINFOW>()).unwrap_or(u32::MAX);
    startup.lpDesktop = desktop.as_mut_ptr();

    // SAFETY: PROCESS_INFORMATION is a plain C struct for which all-zero is valid.
    let mut info: PROCESS_INFORMATION = unsafe { mem::zeroed() };

    // SAFETY: every pointer refers to a live, NUL-terminated buffer or struct
    // owned by this frame, and the token handle stays open for the call.
    let created = unsafe {
        CreateProcessAsUserW(
            token.as_raw(),
            ptr::null(),
            command_line.as_mut_ptr(),
            ptr::null(),
            ptr::null(),
            0,
            CREATE_UNICODE_ENVIRONMENT,
            ptr::null(),
            ptr::null(),
            &raw const startup,
            &raw mut info,
        )
    };
    if created == 0 {
        let err = io::Error::last_os_error();
        return Err(ConsentError::Spawn(format!("CreateProcessAsUserW: {err}")));
    }

    // SAFETY: on success both handles are open and owned by the caller.
    let (process, thread) = unsafe {
        (
            OwnedHandle::from_raw_handle(info.hProcess as RawHandle),
            OwnedHandle::from_raw_handle(info.hThread as RawHandle),
        )
    };

    Ok(HelperProcess {
        _process: process,
        _thread: thread,
        pid: info.dwProcessId,
    })
}
