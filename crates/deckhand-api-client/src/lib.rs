//! HTTP client for the Deckhand asset endpoints.
//!
//! Provides a minimal client that asks a `SessionProvider` for a bearer
//! credential before every request, plus the upload and delete calls in
//! `api`. Failures are mapped onto `deckhand_core::UploadError`.

pub mod api;
pub mod session;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use deckhand_core::models::ErrorBody;
use deckhand_core::{ClientConfig, UploadError};
use reqwest::{Client, RequestBuilder, Response};

pub use api::{DECK_UPLOAD_PATH, IMAGE_DELETE_PATH, IMAGE_UPLOAD_PATH};
pub use session::{Credential, EnvSession, SessionError, SessionProvider, StaticSession};

/// HTTP client for the Deckhand API with an injected session provider.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<dyn SessionProvider>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        session: Arc<dyn SessionProvider>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn from_config(config: &ClientConfig, session: Arc<dyn SessionProvider>) -> Result<Self> {
        Self::new(config.api_url.clone(), session, config.http_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch a fresh credential. Never cached between requests.
    pub async fn credential(&self) -> Result<Credential, UploadError> {
        self.session.get_credential().await.map_err(|e| {
            tracing::debug!(error = %e, "No credential available for request");
            UploadError::Unauthenticated(e.to_string())
        })
    }

    fn apply_auth(&self, request: RequestBuilder, credential: &Credential) -> RequestBuilder {
        request.bearer_auth(credential.token())
    }

    /// Attach `credential`, send, and turn transport errors and non-2xx
    /// statuses into `UploadError`. Returns the response of a 2xx status.
    async fn send(
        &self,
        request: RequestBuilder,
        credential: &Credential,
    ) -> Result<Response, UploadError> {
        let response = self
            .apply_auth(request, credential)
            .send()
            .await
            .map_err(|e| UploadError::NetworkFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&error_text)
                .ok()
                .and_then(|body| body.message());
            tracing::debug!(
                status = status.as_u16(),
                detail = detail.as_deref().unwrap_or(""),
                "API request rejected"
            );
            return Err(UploadError::server_rejected(status.as_u16(), detail));
        }

        Ok(response)
    }

    /// Read a 2xx body and deserialize it.
    async fn parse_json<T: serde::de::DeserializeOwned>(
        response: Response,
    ) -> Result<T, UploadError> {
        let body = response
            .bytes()
            .await
            .map_err(|e| UploadError::NetworkFailure(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| UploadError::MalformedResponse(e.to_string()))
    }

    /// Raw client for custom requests. Caller must apply auth.
    pub fn client(&self) -> &Client {
        &self.client
    }
}
