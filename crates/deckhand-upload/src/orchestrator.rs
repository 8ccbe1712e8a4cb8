//! Upload and delete orchestration.
//!
//! `UploadOrchestrator` runs validation, credential lookup and the request in
//! that order, with a single attempt and no retry. `DeleteOrchestrator` does
//! the same for removals. Neither tracks state; see `state` for that.

use deckhand_api_client::{ApiClient, DECK_UPLOAD_PATH, IMAGE_UPLOAD_PATH};
use deckhand_core::{
    validate, AssetKind, CandidateFile, ClientConfig, ErrorMetadata, LogLevel, OperationKind,
    UploadError, UploadResult, ValidationPolicy,
};

/// Policy and endpoint for one asset kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadProfile {
    pub kind: AssetKind,
    pub policy: ValidationPolicy,
    pub endpoint: String,
}

impl UploadProfile {
    pub fn new(kind: AssetKind, policy: ValidationPolicy, endpoint: impl Into<String>) -> Self {
        Self {
            kind,
            policy,
            endpoint: endpoint.into(),
        }
    }

    pub fn image() -> Self {
        Self::new(AssetKind::Image, ValidationPolicy::image(), IMAGE_UPLOAD_PATH)
    }

    pub fn deck_package() -> Self {
        Self::new(
            AssetKind::DeckPackage,
            ValidationPolicy::deck_package(),
            DECK_UPLOAD_PATH,
        )
    }

    /// Preset for `kind` with the size ceiling from `config`.
    pub fn from_config(config: &ClientConfig, kind: AssetKind) -> Self {
        let endpoint = match kind {
            AssetKind::Image => IMAGE_UPLOAD_PATH,
            AssetKind::DeckPackage => DECK_UPLOAD_PATH,
        };
        Self::new(kind, config.policy_for(kind), endpoint)
    }
}

/// Log a failed operation at the level its error asks for.
pub(crate) fn log_failure(operation: OperationKind, err: &UploadError) {
    let code = err.error_code();
    match err.log_level() {
        LogLevel::Debug => {
            tracing::debug!(%operation, error_code = code, error = %err, "Operation failed")
        }
        LogLevel::Warn => {
            tracing::warn!(%operation, error_code = code, error = %err, "Operation failed")
        }
        LogLevel::Error => {
            tracing::error!(%operation, error_code = code, error = %err, "Operation failed")
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadOrchestrator {
    client: ApiClient,
    profile: UploadProfile,
}

impl UploadOrchestrator {
    pub fn new(client: ApiClient, profile: UploadProfile) -> Self {
        Self { client, profile }
    }

    pub fn profile(&self) -> &UploadProfile {
        &self.profile
    }

    /// Validate `file` against the profile's policy, then upload it.
    ///
    /// A rejected file fails with `ValidationFailed` before any credential
    /// lookup or request.
    pub async fn upload(&self, file: &CandidateFile) -> Result<UploadResult, UploadError> {
        validate(file, &self.profile.policy)?;

        let result = self
            .client
            .upload_asset(&self.profile.endpoint, file)
            .await?;

        tracing::info!(
            kind = %self.profile.kind,
            filename = %file.name(),
            size_bytes = file.size_bytes(),
            url = %result.url,
            "Asset uploaded"
        );

        Ok(result)
    }
}

#[derive(Debug, Clone)]
pub struct DeleteOrchestrator {
    client: ApiClient,
}

impl DeleteOrchestrator {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Delete the asset at `asset_url`. `Ok(false)` is a logical no-op
    /// reported by the server. Callers drop their own references.
    pub async fn remove(&self, asset_url: &str) -> Result<bool, UploadError> {
        let removed = self.client.delete_asset(asset_url).await?;
        tracing::info!(asset_url = %asset_url, removed, "Asset delete finished");
        Ok(removed)
    }
}
