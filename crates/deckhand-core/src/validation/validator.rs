use crate::models::CandidateFile;

use super::policy::ValidationPolicy;

/// Reasons a candidate file is rejected before upload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    #[error("Unsupported file type: {media_type} (allowed: {})", .allowed.join(", "))]
    UnsupportedType {
        media_type: String,
        allowed: Vec<String>,
    },

    #[error("Unsupported file extension: {extension} (allowed: {})", .allowed.join(", "))]
    UnsupportedExtension {
        extension: String,
        allowed: Vec<String>,
    },
}

/// Check `file` against `policy`.
///
/// Rules run in a fixed order and the first failure is returned: size, then
/// media type, then extension. Pure; performs no I/O.
pub fn validate(file: &CandidateFile, policy: &ValidationPolicy) -> Result<(), ValidationError> {
    let size = file.size_bytes();
    if size > policy.max_size_bytes {
        return Err(ValidationError::TooLarge {
            size,
            max: policy.max_size_bytes,
        });
    }

    if !policy.allowed_media_types.is_empty() {
        let normalized = file.media_type().trim().to_lowercase();
        if !policy.allowed_media_types.contains(&normalized) {
            return Err(ValidationError::UnsupportedType {
                media_type: file.media_type().to_string(),
                allowed: policy.allowed_media_types.iter().cloned().collect(),
            });
        }
    }

    if !policy.allowed_extensions.is_empty() {
        let extension = file.extension();
        let allowed = extension
            .as_ref()
            .is_some_and(|e| policy.allowed_extensions.contains(e));
        if !allowed {
            return Err(ValidationError::UnsupportedExtension {
                extension: extension.unwrap_or_default(),
                allowed: policy
                    .allowed_extensions
                    .iter()
                    .map(|e| format!(".{}", e))
                    .collect(),
            });
        }
    }

    Ok(())
}
