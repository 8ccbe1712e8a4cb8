use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use deckhand_core::CandidateFile;
use deckhand_upload::FilePicker;

/// "Chooser" for the command line: the file was already named on argv.
#[derive(Debug, Clone)]
pub struct PathPicker {
    path: PathBuf,
    max_size_bytes: Option<u64>,
}

impl PathPicker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_size_bytes: None,
        }
    }

    /// Refuse files over `max_size_bytes` before loading them.
    pub fn with_max_size(mut self, max_size_bytes: u64) -> Self {
        self.max_size_bytes = Some(max_size_bytes);
        self
    }
}

#[async_trait]
impl FilePicker for PathPicker {
    async fn pick(&self, accept: &str) -> Result<Option<CandidateFile>> {
        tracing::debug!(path = %self.path.display(), accept, "Reading file");
        match self.max_size_bytes {
            Some(max) => CandidateFile::from_path_within(&self.path, max).await.map(Some),
            None => CandidateFile::from_path(&self.path).await.map(Some),
        }
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
