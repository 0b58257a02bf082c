//! Consent ports.
//!
//! Two layers:
//!
//! - [`ConsentPort`] is what the decision engine talks to: ask for consent,
//!   get a response or a typed failure.
//! - [`ConsentPlatform`] is the set of OS primitives the consent channel is
//!   assembled from: find the active desktop session, obtain a credential
//!   for it, open the rendezvous endpoint, launch the helper.
//!
//! Every resource a platform hands out (credential, endpoint, helper) is an
//! owned value whose `Drop` releases the underlying OS handle. Dropping is
//! the one and only release operation.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::domain::{ConsentRequest, ConsentResponse};

/// Failures of the consent channel that prevent a response from being read.
///
/// `TimedOut` and `Malformed` are not errors: they are
/// [`ConsentResponse`] values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConsentError {
    /// No user is logged on to the interactive console.
    #[error("No interactive session is active")]
    NoInteractiveSession,

    /// The session's user credential could not be obtained or duplicated.
    #[error("Failed to acquire session credential: {0}")]
    Credential(String),

    /// The rendezvous endpoint could not be created.
    #[error("Failed to create consent endpoint: {0}")]
    Endpoint(String),

    /// The helper process could not be started on the user's desktop.
    #[error("Failed to spawn consent helper: {0}")]
    Spawn(String),

    /// The owning component is shutting down.
    #[error("Consent request aborted by shutdown")]
    Shutdown,
}

impl ConsentError {
    /// Errors after which a passive notification is still worth posting.
    pub const fn allows_notification(&self) -> bool {
        matches!(self, Self::NoInteractiveSession | Self::Credential(_))
    }
}

/// Port the decision engine uses to obtain a user's decision.
#[async_trait]
pub trait ConsentPort: Send + Sync {
    /// Ask the interactive user to approve `request`.
    ///
    /// Must return within `timeout` (yielding `TimedOut`) and must return
    /// promptly with [`ConsentError::Shutdown`] once `shutdown` is cancelled.
    async fn request_consent(
        &self,
        request: &ConsentRequest,
        timeout: Duration,
        shutdown: &CancellationToken,
    ) -> Result<ConsentResponse, ConsentError>;
}

/// Single-use, listening endpoint the helper writes its answer to.
///
/// The endpoint must already accept connections when it is returned from
/// [`ConsentPlatform::open_endpoint`]. Dropping it closes it.
#[async_trait]
pub trait RendezvousEndpoint: Send {
    /// Accept one connection and read one line.
    ///
    /// Returns `Ok(None)` when the peer disconnects without sending anything.
    /// Cancel-safe: dropping the future abandons the wait.
    async fn receive_line(&mut self) -> io::Result<Option<String>>;
}

/// OS primitives needed to ask a desktop user from a background service.
pub trait ConsentPlatform: Send + Sync + 'static {
    /// User credential for the active session. Released on drop.
    type Credential: Send + Sync;
    /// Listening rendezvous endpoint. Closed on drop.
    type Endpoint: RendezvousEndpoint;
    /// Handles of the launched helper process. Released on drop.
    type Helper: Send;

    /// Identify the currently active interactive console session.
    fn active_session(&self) -> Result<u32, ConsentError>;

    /// Obtain a credential able to create a process on `session_id`'s desktop.
    fn acquire_credential(&self, session_id: u32) -> Result<Self::Credential, ConsentError>;

    /// Create the rendezvous endpoint and start listening on it.
    fn open_endpoint(&self) -> Result<Self::Endpoint, ConsentError>;

    /// Launch the helper on the user's desktop, passing `request.helper_args()`.
    fn spawn_helper(
        &self,
        credential: &Self::Credential,
        request: &ConsentRequest,
    ) -> Result<Self::Helper, ConsentError>;
}
