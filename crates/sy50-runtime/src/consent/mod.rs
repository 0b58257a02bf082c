//! Consent platform adapters.
//!
//! On Windows the helper is launched into the active console session with
//! the session user's token and answers over a restricted named pipe. Other
//! platforms have no interactive session to ask.

pub mod command_line;
mod headless;
#[cfg(windows)]
mod windows;

use std::sync::Arc;

use sy50_core::{ConsentChannel, ConsentPort, UpdaterConfig};

pub use headless::{ClosedEndpoint, HeadlessPlatform};
#[cfg(windows)]
pub use windows::{HelperProcess, PipeEndpoint, UserToken, WindowsConsentPlatform};
#[cfg(windows)]
pub(crate) use windows::{active_console_session, to_wide};

/// Where and how the consent helper is launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentOptions {
    pub helper_path: String,
    pub pipe_name: String,
    pub desktop: String,
}

impl From<&UpdaterConfig> for ConsentOptions {
    fn from(config: &UpdaterConfig) -> Self {
        Self {
            helper_path: config.helper_executable_path.clone(),
            pipe_name: config.pipe_name.clone(),
            desktop: config.desktop.clone(),
        }
    }
}

/// Consent channel for the current platform.
#[cfg(windows)]
pub fn default_consent_port(options: ConsentOptions) -> Arc<dyn ConsentPort> {
    Arc::new(ConsentChannel::new(WindowsConsentPlatform::new(options)))
}

/// Consent channel for the current platform.
#[cfg(not(windows))]
pub fn default_consent_port(options: ConsentOptions) -> Arc<dyn ConsentPort> {
    tracing::debug!(helper = %options.helper_path, "No interactive sessions on this platform");
    Arc::new(ConsentChannel::new(HeadlessPlatform))
}
