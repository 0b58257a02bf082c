//! Windows consent platform: WTS session token, `CreateProcessAsUserW`
//! helper launch and a restricted named pipe.

#![allow(unsafe_code)]

mod pipe;
mod spawn;
mod token;

use sy50_core::{ConsentError, ConsentPlatform, ConsentRequest};
use tracing::info;

use super::ConsentOptions;
use super::command_line::build_command_line;

pub use pipe::PipeEndpoint;
pub use spawn::{HelperProcess, to_wide};
pub use token::{UserToken, active_console_session};

/// [`ConsentPlatform`] for a service running as LocalSystem.
pub struct WindowsConsentPlatform {
    options: ConsentOptions,
}

impl WindowsConsentPlatform {
    pub const fn new(options: ConsentOptions) -> Self {
        Self { options }
    }
}

impl ConsentPlatform for WindowsConsentPlatform {
    type Credential = UserToken;
    type Endpoint = PipeEndpoint;
    type Helper = HelperProcess;

    fn active_session(&self) -> Result<u32, ConsentError> {
        token::active_console_session()
    }

    fn acquire_credential(&self, session_id: u32) -> Result<UserToken, ConsentError> {
        UserToken::for_session(session_id)
    }

    fn open_endpoint(&self) -> Result<PipeEndpoint, ConsentError> {
        PipeEndpoint::create(&self.options.pipe_name)
    }

    fn spawn_helper(
        &self,
        credential: &UserToken,
        request: &ConsentRequest,
    ) -> Result<HelperProcess, ConsentError> {
        let command_line = build_command_line(&self.options.helper_path, &request.helper_args());
        let helper = spawn::spawn_as_user(credential, &command_line, &self.options.desktop)?;
        info!(
            pid = helper.pid(),
            session_id = credential.session_id(),
            desktop = %self.options.desktop,
            "Consent helper started"
        );
        Ok(helper)
    }
}
