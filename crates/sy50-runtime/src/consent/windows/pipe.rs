//! Single-use named pipe the consent helper writes its answer to.

use std::ffi::c_void;
use std::io;
use std::mem;
use std::ptr;

use async_trait::async_trait;
use sy50_core::{ConsentError, RendezvousEndpoint};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::net::windows::named_pipe::{NamedPipeServer, ServerOptions};
use tracing::debug;
use windows_sys::Win32::Foundation::{HLOCAL, LocalFree};
use windows_sys::Win32::Security::Authorization::ConvertStringSecurityDescriptorToSecurityDescriptorW;
use windows_sys::Win32::Security::SECURITY_ATTRIBUTES;

use super::spawn::to_wide;

/// Pipe buffer size. The longest answer is `"Cancel\n"`.
const PIPE_BUFFER_SIZE: u32 = 128;

/// Longest line accepted from the helper.
const MAX_ANSWER_LEN: u64 = PIPE_BUFFER_SIZE as u64;

/// Full access for SYSTEM, read/write for interactively logged-on users.
const PIPE_SDDL: &str = "D:P(A;;GA;;;SY)(A;;GRGW;;;IU)";

const SDDL_REVISION_1: u32 = 1;

/// Listening pipe server. Dropping it closes the pipe.
pub struct PipeEndpoint {
    server: NamedPipeServer,
    name: String,
}

impl PipeEndpoint {
    /// Create the pipe and start listening.
    ///
    /// Fails if another instance of the same name exists, so a stale or
    /// foreign server can never receive the helper's answer.
    pub fn create(name: &str) -> Result<Self, ConsentError> {
        let server = create_restricted(name)
            .map_err(|e| ConsentError::Endpoint(format!("{name}: {e}")))?;
        debug!(pipe = %name, "Consent pipe listening");
        Ok(Self {
            server,
            name: name.to_string(),
        })
    }
}

impl Drop for PipeEndpoint {
    fn drop(&mut self) {
        debug!(pipe = %self.name, "Closing consent pipe");
    }
}

#[async_trait]
impl RendezvousEndpoint for PipeEndpoint {
    async fn receive_line(&mut self) -> io::Result<Option<String>> {
        self.server.connect().await?;

        let mut line = String::new();
        let read = {
            let mut reader = BufReader::new((&mut self.server).take(MAX_ANSWER_LEN));
            reader.read_line(&mut line).await?
        };
        let _ = self.server.disconnect();

        Ok((read > 0).then_some(line))
    }
}

fn create_restricted(name: &str) -> io::Result<NamedPipeServer> {
    let sddl = to_wide(PIPE_SDDL);
    let mut descriptor: *mut c_void = ptr::null_mut();

    // SAFETY: `sddl` is NUL-terminated and `descriptor` is a valid out-pointer.
    let converted = unsafe {
        ConvertStringSecurityDescriptorToSecurityDescriptorW(
            sddl.as_ptr(),
            SDDL_REVISION_1,
            &raw mut descriptor,
            ptr::null_mut(),
        )
    };
    if converted == 0 || descriptor.is_null() {
        return Err(io::Error::last_os_error());
    }

    let mut attributes = SECURITY_ATTRIBUTES {
        nLength: u32::try_from(mem::size_of::<SECURITY_ATTRIBUTES>()).unwrap_or(u32::MAX),
        lpSecurityDescriptor: descriptor,
        bInheritHandle: 0,
    };

    let mut options = ServerOptions::new();
    options
        .first_pipe_instance(true)
        .reject_remote_clients(true)
        .max_instances(1)
        .in_buffer_size(PIPE_BUFFER_SIZE)
        .out_buffer_size(PIPE_BUFFER_SIZE);

    // SAFETY: `attributes` and the descriptor it points to outlive the call.
    let result = unsafe {
        options.create_with_security_attributes_raw(name, (&raw mut attributes).cast::<c_void>())
    };

    // SAFETY: the descriptor was allocated by LocalAlloc inside the conversion
    // call and is no longer referenced once the pipe exists.
    unsafe {
        LocalFree(descriptor as HLOCAL);
    }

    result
}
