//! Configuration module
//!
//! Client-side settings for the upload pipeline, read from the environment
//! (and a `.env` file when present).

use std::env;
use std::time::Duration;

use crate::models::AssetKind;
use crate::validation::ValidationPolicy;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const IMAGE_MAX_SIZE_MB: u64 = 10;
const DECK_MAX_SIZE_MB: u64 = 100;

fn mib_to_bytes(var: &str, mb: u64) -> Result<u64, anyhow::Error> {
    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("{} is too large: {} MB", var, mb))
}

/// Upload pipeline configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    /// Transport timeout. `None` leaves reqwest's default (no timeout).
    pub http_timeout: Option<Duration>,
    pub image_max_size_bytes: u64,
    pub deck_max_size_bytes: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            http_timeout: None,
            image_max_size_bytes: IMAGE_MAX_SIZE_MB * 1024 * 1024,
            deck_max_size_bytes: DECK_MAX_SIZE_MB * 1024 * 1024,
        }
    }
}

impl ClientConfig {
    /// Load from environment: DECKHAND_API_URL (or API_URL),
    /// DECKHAND_HTTP_TIMEOUT_SECS, DECKHAND_IMAGE_MAX_SIZE_MB,
    /// DECKHAND_DECK_MAX_SIZE_MB.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        tracing::debug!(
            api_url = %config.api_url,
            image_max_size_bytes = config.image_max_size_bytes,
            deck_max_size_bytes = config.deck_max_size_bytes,
            "Loaded client configuration"
        );
        Ok(config)
    }

    /// Build from an arbitrary key lookup. `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("DECKHAND_API_URL")
            .or_else(|| lookup("API_URL"))
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        let http_timeout = match lookup("DECKHAND_HTTP_TIMEOUT_SECS").filter(|s| !s.is_empty()) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    anyhow::anyhow!("DECKHAND_HTTP_TIMEOUT_SECS must be a valid number")
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        let image_max_size_mb = lookup("DECKHAND_IMAGE_MAX_SIZE_MB")
            .unwrap_or_else(|| IMAGE_MAX_SIZE_MB.to_string())
            .parse::<u64>()
            .unwrap_or(IMAGE_MAX_SIZE_MB);

        let deck_max_size_mb = lookup("DECKHAND_DECK_MAX_SIZE_MB")
            .unwrap_or_else(|| DECK_MAX_SIZE_MB.to_string())
            .parse::<u64>()
            .unwrap_or(DECK_MAX_SIZE_MB);

        let config = Self {
            api_url,
            http_timeout,
            image_max_size_bytes: mib_to_bytes("DECKHAND_IMAGE_MAX_SIZE_MB", image_max_size_mb)?,
            deck_max_size_bytes: mib_to_bytes("DECKHAND_DECK_MAX_SIZE_MB", deck_max_size_mb)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "DECKHAND_API_URL must be an http(s) URL, got '{}'",
                self.api_url
            ));
        }

        if self.image_max_size_bytes == 0 || self.deck_max_size_bytes == 0 {
            return Err(anyhow::anyhow!("Maximum upload sizes must be greater than zero"));
        }

        Ok(())
    }

    /// Validation policy for `kind` with the configured size ceiling.
    pub fn policy_for(&self, kind: AssetKind) -> ValidationPolicy {
        match kind {
            AssetKind::Image => ValidationPolicy::image_with_max(self.image_max_size_bytes),
            AssetKind::DeckPackage => {
                ValidationPolicy::deck_package_with_max(self.deck_max_size_bytes)
            }
        }
    }
}
