//! Cross-session consent channel.
//!
//! Asks the user logged on to the interactive desktop for a decision on
//! behalf of a background service:
//!
//! 1. find the active console session
//! 2. obtain a credential for that session's user
//! 3. open the rendezvous endpoint (listening before anything is launched)
//! 4. launch the helper on the user's desktop with that credential
//! 5. wait for one line on the endpoint, bounded by a timeout and shutdown
//!
//! Every platform resource is held in a local binding and dropped on every
//! exit path, so the credential, the endpoint and the helper handles are each
//! released exactly once whatever step fails.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::{ConsentRequest, ConsentResponse};
use crate::ports::{ConsentError, ConsentPlatform, ConsentPort, RendezvousEndpoint};

/// A user session together with the credential acquired for it.
///
/// Owns the credential exclusively; dropping the session releases it. Never
/// cached across requests since the active session can change.
pub struct InteractiveSession<C> {
    session_id: u32,
    credential: C,
}

impl<C> InteractiveSession<C> {
    pub const fn session_id(&self) -> u32 {
        self.session_id
    }

    pub const fn credential(&self) -> &C {
        &self.credential
    }
}

/// Consent strategy that launches a helper on the user's desktop.
pub struct ConsentChannel<P: ConsentPlatform> {
    platform: P,
}

impl<P: ConsentPlatform> ConsentChannel<P> {
    pub const fn new(platform: P) -> Self {
        Self { platform }
    }

    /// Steps 1 and 2: locate the session and acquire its credential.
    fn open_session(&self) -> Result<InteractiveSession<P::Credential>, ConsentError> {
        let session_id = self.platform.active_session()?;
        debug!(session_id, "Active interactive session found");
        let credential = self.platform.acquire_credential(session_id)?;
        Ok(InteractiveSession {
            session_id,
            credential,
        })
    }
}

#[async_trait]
impl<P: ConsentPlatform> ConsentPort for ConsentChannel<P> {
    async fn request_consent(
        &self,
        request: &ConsentRequest,
        timeout: Duration,
        shutdown: &CancellationToken,
    ) -> Result<ConsentResponse, ConsentError> {
        if shutdown.is_cancelled() {
            return Err(ConsentError::Shutdown);
        }

        let session = self.open_session()?;
        let mut endpoint = self.platform.open_endpoint()?;
        let helper = self.platform.spawn_helper(session.credential(), request)?;
        info!(
            session_id = session.session_id(),
            current = request.current_version.as_deref().unwrap_or(""),
            target_version = %request.target_version,
            "Consent helper launched"
        );
        // The helper runs under its own token now.
        drop(session);

        let result = tokio::select! {
            biased;
            () = shutdown.cancelled() => {
                debug!("Shutdown while awaiting consent");
                Err(ConsentError::Shutdown)
            }
            read = tokio::time::timeout(timeout, endpoint.receive_line()) => Ok(match read {
                Err(_) => {
                    warn!(timeout_secs = timeout.as_secs(), "Consent helper did not answer in time");
                    ConsentResponse::TimedOut
                }
                Ok(Ok(Some(line))) => {
                    let response = ConsentResponse::from_token(&line);
                    debug!(line = %line.trim_end(), %response, "Consent answer received");
                    response
                }
                Ok(Ok(None)) => {
                    warn!("Consent helper disconnected without answering");
                    ConsentResponse::Malformed
                }
                Ok(Err(e)) => {
                    warn!(error = %e, "Failed to read consent answer");
                    ConsentResponse::Malformed
                }
            }),
        };

        drop(endpoint);
        drop(helper);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;
    use std::sync::Mutex;

    /// Scripted reply the fake endpoint produces.
    #[derive(Clone, Copy)]
    pub enum Reply {
        Line(&'static str),
        Disconnect,
        ReadError,
        Never,
    }

    /// Records every platform call and every release, in order.
    #[derive(Default)]
    pub struct Journal {
        events: Mutex<Vec<&'static str>>,
        spawned_args: Mutex<Vec<[String; 2]>>,
    }

    impl Journal {
        fn push(&self, event: &'static str) {
            self.events.lock().unwrap().push(event);
        }

        pub fn events(&self) -> Vec<&'static str> {
            self.events.lock().unwrap().clone()
        }

        pub fn count(&self, event: &str) -> usize {
            self.events().iter().filter(|e| **e == event).count()
        }

        pub fn spawned_args(&self) -> Vec<[String; 2]> {
            self.spawned_args.lock().unwrap().clone()
        }
    }

    pub struct FakeCredential(Arc<Journal>);

    impl Drop for FakeCredential {
        fn drop(&mut self) {
            self.0.push("release_credential");
        }
    }

    pub struct FakeEndpoint {
        journal: Arc<Journal>,
        reply: Reply,
    }

    impl Drop for FakeEndpoint {
        fn drop(&mut self) {
            self.journal.push("close_endpoint");
        }
    }

    #[async_trait]
    impl RendezvousEndpoint for FakeEndpoint {
        async fn receive_line(&mut self) -> io::Result<Option<String>> {
            match self.reply {
                Reply::Line(line) => Ok(Some(line.to_string())),
                Reply::Disconnect => Ok(None),
                Reply::ReadError => Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe broken")),
                Reply::Never => std::future::pending().await,
            }
        }
    }

    pub struct FakeHelper(Arc<Journal>);

    impl Drop for FakeHelper {
        fn drop(&mut self) {
            self.0.push("release_helper");
        }
    }

    /// Platform double whose failure points are scripted.
    pub struct FakePlatform {
        pub journal: Arc<Journal>,
        pub session: Result<u32, ConsentError>,
        pub credential_error: Option<ConsentError>,
        pub endpoint_error: Option<ConsentError>,
        pub spawn_error: Option<ConsentError>,
        pub reply: Reply,
    }

    impl FakePlatform {
        pub fn replying(reply: Reply) -> Self {
            Self {
                journal: Arc::new(Journal::default()),
                session: Ok(1),
                credential_error: None,
                endpoint_error: None,
                spawn_error: None,
                reply,
            }
        }
    }

    impl ConsentPlatform for FakePlatform {
        type Credential = FakeCredential;
        type Endpoint = FakeEndpoint;
        type Helper = FakeHelper;

        fn active_session(&self) -> Result<u32, ConsentError> {
            self.journal.push("active_session");
            self.session.clone()
        }

        fn acquire_credential(&self, _session_id: u32) -> Result<FakeCredential, ConsentError> {
            match &self.credential_error {
                Some(e) => Err(e.clone()),
                None => {
                    self.journal.push("acquire_credential");
                    Ok(FakeCredential(Arc::clone(&self.journal)))
                }
            }
        }

        fn open_endpoint(&self) -> Result<FakeEndpoint, ConsentError> {
            match &self.endpoint_error {
                Some(e) => Err(e.clone()),
                None => {
                    self.journal.push("open_endpoint");
                    Ok(FakeEndpoint {
                        journal: Arc::clone(&self.journal),
                        reply: self.reply,
                    })
                }
            }
        }

        fn spawn_helper(
            &self,
            _credential: &FakeCredential,
            request: &ConsentRequest,
        ) -> Result<FakeHelper, ConsentError> {
            match &self.spawn_error {
                Some(e) => Err(e.clone()),
                None => {
                    self.journal.push("spawn_helper");
                    self.journal
                        .spawned_args
                        .lock()
                        .unwrap()
                        .push(request.helper_args());
                    Ok(FakeHelper(Arc::clone(&self.journal)))
                }
            }
        }
    }

    fn request() -> ConsentRequest {
        ConsentRequest::new(Some("1.0.0".to_string()), "1.5.0")
    }

    async fn ask(platform: FakePlatform) -> (Result<ConsentResponse, ConsentError>, Arc<Journal>) {
        let journal = Arc::clone(&platform.journal);
        let channel = ConsentChannel::new(platform);
        let result = channel
            .request_consent(&request(), Duration::from_secs(5), &CancellationToken::new())
            .await;
        (result, journal)
    }

    fn assert_all_released(journal: &Journal) {
        assert_eq!(journal.count("release_credential"), journal.count("acquire_credential"));
        assert_eq!(journal.count("close_endpoint"), journal.count("open_endpoint"));
        assert_eq!(journal.count("release_helper"), journal.count("spawn_helper"));
    }

    #[tokio::test]
    async fn test_yes_resolves_accepted() {
        let (result, journal) = ask(FakePlatform::replying(Reply::Line("Yes\n"))).await;
        assert_eq!(result, Ok(ConsentResponse::Accepted));
        assert_eq!(journal.count("release_credential"), 1);
        assert_eq!(journal.count("close_endpoint"), 1);
        assert_eq!(journal.count("release_helper"), 1);
    }

    #[tokio::test]
    async fn test_no_and_cancel_tokens() {
        let (no, _) = ask(FakePlatform::replying(Reply::Line("No\n"))).await;
        assert_eq!(no, Ok(ConsentResponse::Declined));
        let (cancel, _) = ask(FakePlatform::replying(Reply::Line("Cancel\n"))).await;
        assert_eq!(cancel, Ok(ConsentResponse::Cancelled));
    }

    #[tokio::test]
    async fn test_garbage_disconnect_and_read_error_are_malformed() {
        for reply in [Reply::Line("Maybe\n"), Reply::Disconnect, Reply::ReadError] {
            let (result, journal) = ask(FakePlatform::replying(reply)).await;
            assert_eq!(result, Ok(ConsentResponse::Malformed));
            assert_all_released(&journal);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_answer_times_out() {
        let platform = FakePlatform::replying(Reply::Never);
        let journal = Arc::clone(&platform.journal);
        let channel = ConsentChannel::new(platform);

        let result = channel
            .request_consent(&request(), Duration::from_secs(30), &CancellationToken::new())
            .await;

        assert_eq!(result, Ok(ConsentResponse::TimedOut));
        assert_eq!(journal.count("release_credential"), 1);
        assert_eq!(journal.count("close_endpoint"), 1);
        assert_eq!(journal.count("release_helper"), 1);
    }

    #[tokio::test]
    async fn test_endpoint_listens_before_helper_is_spawned() {
        let (_, journal) = ask(FakePlatform::replying(Reply::Line("Yes\n"))).await;
        let events = journal.events();
        let opened = events.iter().position(|e| *e == "open_endpoint").unwrap();
        let spawned = events.iter().position(|e| *e == "spawn_helper").unwrap();
        assert!(opened < spawned, "events: {events:?}");
    }

    #[tokio::test]
    async fn test_credential_released_before_waiting() {
        let (_, journal) = ask(FakePlatform::replying(Reply::Line("Yes\n"))).await;
        let events = journal.events();
        let released = events.iter().position(|e| *e == "release_credential").unwrap();
        let closed = events.iter().position(|e| *e == "close_endpoint").unwrap();
        assert!(released < closed, "events: {events:?}");
    }

    #[tokio::test]
    async fn test_helper_receives_versions() {
        let platform = FakePlatform::replying(Reply::Line("No\n"));
        let journal = Arc::clone(&platform.journal);
        let channel = ConsentChannel::new(platform);
        let fresh = ConsentRequest::new(None, "2.0.0");
        channel
            .request_consent(&fresh, Duration::from_secs(5), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(
            journal.spawned_args(),
            vec![[String::new(), "2.0.0".to_string()]]
        );
    }

    #[tokio::test]
    async fn test_no_session() {
        let mut platform = FakePlatform::replying(Reply::Line("Yes\n"));
        platform.session = Err(ConsentError::NoInteractiveSession);
        let (result, journal) = ask(platform).await;
        assert_eq!(result, Err(ConsentError::NoInteractiveSession));
        assert_eq!(journal.count("acquire_credential"), 0);
        assert_eq!(journal.count("open_endpoint"), 0);
    }

    #[tokio::test]
    async fn test_credential_failure() {
        let mut platform = FakePlatform::replying(Reply::Line("Yes\n"));
        platform.credential_error = Some(ConsentError::Credential("privilege not held".into()));
        let (result, journal) = ask(platform).await;
        assert!(matches!(result, Err(ConsentError::Credential(_))));
        assert_eq!(journal.count("open_endpoint"), 0);
        assert_all_released(&journal);
    }

    #[tokio::test]
    async fn test_endpoint_failure_releases_credential() {
        let mut platform = FakePlatform::replying(Reply::Line("Yes\n"));
        platform.endpoint_error = Some(ConsentError::Endpoint("pipe busy".into()));
        let (result, journal) = ask(platform).await;
        assert!(matches!(result, Err(ConsentError::Endpoint(_))));
        assert_eq!(journal.count("release_credential"), 1);
        assert_eq!(journal.count("spawn_helper"), 0);
        assert_all_released(&journal);
    }

    #[tokio::test]
    async fn test_spawn_failure_closes_endpoint() {
        let mut platform = FakePlatform::replying(Reply::Line("Yes\n"));
        platform.spawn_error = Some(ConsentError::Spawn("access denied".into()));
        let (result, journal) = ask(platform).await;
        assert!(matches!(result, Err(ConsentError::Spawn(_))));
        assert_eq!(journal.count("close_endpoint"), 1);
        assert_eq!(journal.count("release_credential"), 1);
        assert_all_released(&journal);
    }

    #[tokio::test]
    async fn test_shutdown_unblocks_pending_wait() {
        let platform = FakePlatform::replying(Reply::Never);
        let journal = Arc::clone(&platform.journal);
        let channel = Arc::new(ConsentChannel::new(platform));
        let shutdown = CancellationToken::new();

        let task = {
            let channel = Arc::clone(&channel);
            let shutdown = shutdown.clone();
            tokio::spawn(async move {
                channel
                    .request_consent(&request(), Duration::from_secs(3600), &shutdown)
                    .await
            })
        };

        tokio::task::yield_now().await;
        shutdown.cancel();
        let result = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("consent wait did not observe shutdown")
            .unwrap();

        assert_eq!(result, Err(ConsentError::Shutdown));
        assert_all_released(&journal);
    }

    #[tokio::test]
    async fn test_already_shut_down_touches_nothing() {
        let platform = FakePlatform::replying(Reply::Line("Yes\n"));
        let journal = Arc::clone(&platform.journal);
        let channel = ConsentChannel::new(platform);
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        let result = channel
            .request_consent(&request(), Duration::from_secs(5), &shutdown)
            .await;
        assert_eq!(result, Err(ConsentError::Shutdown));
        assert!(journal.events().is_empty());
    }
}
