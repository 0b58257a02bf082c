//! Consent platform for hosts without interactive desktop sessions.

use std::io;

use async_trait::async_trait;
use sy50_core::{ConsentError, ConsentPlatform, ConsentRequest, RendezvousEndpoint};

/// Reports that no interactive session exists, so every consent request
/// falls back to a passive notification.
#[derive(Debug, Default)]
pub struct HeadlessPlatform;

/// Endpoint that is never connected to.
#[derive(Debug)]
pub struct ClosedEndpoint;

#[async_trait]
impl RendezvousEndpoint for ClosedEndpoint {
    async fn receive_line(&mut self) -> io::Result<Option<String>> {
        Ok(None)
    }
}

impl ConsentPlatform for HeadlessPlatform {
    type Credential = ();
    type Endpoint = ClosedEndpoint;
    type Helper = ();

    fn active_session(&self) -> Result<u32, ConsentError> {
        Err(ConsentError::NoInteractiveSession)
    }

    fn acquire_credential(&self, _session_id: u32) -> Result<(), ConsentError> {
        Err(ConsentError::NoInteractiveSession)
    }

    fn open_endpoint(&self) -> Result<ClosedEndpoint, ConsentError> {
        Ok(ClosedEndpoint)
    }

    fn spawn_helper(&self, _credential: &(), _request: &ConsentRequest) -> Result<(), ConsentError> {
        Err(ConsentError::Spawn(
            "helper processes are not supported on this platform".to_string(),
        ))
    }
}
