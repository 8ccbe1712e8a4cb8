use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Asset kinds the app uploads. Each kind has its own validation policy and
/// endpoint (see `ValidationPolicy::for_kind`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Image,
    DeckPackage,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::DeckPackage => "deck_package",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-selected file awaiting validation and upload.
///
/// Immutable once built. Cloning is cheap: the payload is reference counted.
#[derive(Clone, PartialEq, Eq)]
pub struct CandidateFile {
    name: String,
    media_type: String,
    data: Bytes,
}

impl CandidateFile {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            data: data.into(),
        }
    }

    /// Read a local file, inferring the media type from its extension.
    ///
    /// Unknown extensions fall back to `application/octet-stream`.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Invalid file name: {}", path.display()))?
            .to_string();

        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let media_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self::new(name, media_type, data))
    }

    /// Like `from_path`, but checks the on-disk length first and fails with
    /// `ValidationError::TooLarge` without reading a file over `max_size_bytes`.
    pub async fn from_path_within(path: impl AsRef<Path>, max_size_bytes: u64) -> Result<Self> {
        let path = path.as_ref();
        let size = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?
            .len();

        if size > max_size_bytes {
            return Err(ValidationError::TooLarge {
                size,
                max: max_size_bytes,
            }
            .into());
        }

        Self::from_path(path).await
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }

    /// Lowercased extension without the leading dot, if the name has one.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
            .map(|e| e.to_lowercase())
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

// Payloads can be megabytes; keep them out of logs.
impl fmt::Debug for CandidateFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateFile")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("size_bytes", &self.size_bytes())
            .finish()
    }
}
