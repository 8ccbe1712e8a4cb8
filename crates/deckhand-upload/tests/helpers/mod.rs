//! Test helpers: mock backend, session providers and sample files.
//!
//! Run from workspace root: `cargo test -p deckhand-upload --test pipeline_test`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use deckhand_api_client::{ApiClient, Credential, SessionError, SessionProvider};
use deckhand_core::CandidateFile;
use deckhand_upload::{UploadProfile, UploadStateContainer};
use tokio::sync::Notify;

pub const MIB: usize = 1024 * 1024;

/// Mock backend plus a container wired to it.
pub struct TestApp {
    pub server: mockito::ServerGuard,
    pub container: Arc<UploadStateContainer>,
}

pub async fn setup_test_app(session: impl SessionProvider + 'static) -> TestApp {
    setup_test_app_with_profile(session, UploadProfile::image()).await
}

pub async fn setup_test_app_with_profile(
    session: impl SessionProvider + 'static,
    profile: UploadProfile,
) -> TestApp {
    let server = mockito::Server::new_async().await;
    let client = ApiClient::new(server.url(), Arc::new(session), None)
        .expect("Failed to create API client");
    TestApp {
        server,
        container: Arc::new(UploadStateContainer::new(client, profile)),
    }
}

pub fn image(name: &str, media_type: &str, size: usize) -> CandidateFile {
    CandidateFile::new(name, media_type, vec![0xABu8; size])
}

/// Hands out `tok-1`, `tok-2`, ... and counts calls.
#[derive(Default)]
pub struct RotatingSession {
    calls: AtomicUsize,
}

impl RotatingSession {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionProvider for RotatingSession {
    async fn get_credential(&self) -> Result<Credential, SessionError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Credential::new(format!("tok-{}", n)))
    }
}

/// Always fails, as a signed-out or broken auth provider would.
pub struct FailingSession;

#[async_trait]
impl SessionProvider for FailingSession {
    async fn get_credential(&self) -> Result<Credential, SessionError> {
        Err(SessionError::Provider("token refresh failed".to_string()))
    }
}

/// Blocks in `get_credential` until `release` is called, so a test can
/// observe an operation while it is in flight.
pub struct GatedSession {
    gate: Arc<Notify>,
}

impl GatedSession {
    pub fn new() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        (Self { gate: gate.clone() }, gate)
    }
}

#[async_trait]
impl SessionProvider for GatedSession {
    async fn get_credential(&self) -> Result<Credential, SessionError> {
        self.gate.notified().await;
        Ok(Credential::new("gated"))
    }
}
