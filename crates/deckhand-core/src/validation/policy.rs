use std::collections::BTreeSet;

use crate::models::AssetKind;

const MIB: u64 = 1024 * 1024;

pub const IMAGE_MAX_SIZE_BYTES: u64 = 10 * MIB;
pub const IMAGE_ALLOWED_MEDIA_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

pub const DECK_MAX_SIZE_BYTES: u64 = 100 * MIB;
pub const DECK_ALLOWED_EXTENSIONS: &[&str] = &["apkg"];

/// Size, media type and extension rules a candidate file must satisfy.
///
/// An empty allow-list disables that rule. Media types and extensions are
/// stored lowercased; extensions without their leading dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub max_size_bytes: u64,
    pub allowed_media_types: BTreeSet<String>,
    pub allowed_extensions: BTreeSet<String>,
}

impl ValidationPolicy {
    pub fn new<M, E>(max_size_bytes: u64, media_types: M, extensions: E) -> Self
    where
        M: IntoIterator,
        M::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            max_size_bytes,
            allowed_media_types: media_types
                .into_iter()
                .map(|m| m.as_ref().trim().to_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
            allowed_extensions: extensions
                .into_iter()
                .map(|e| normalize_extension(e.as_ref()))
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    /// Policy for card and deck images.
    pub fn image() -> Self {
        Self::image_with_max(IMAGE_MAX_SIZE_BYTES)
    }

    pub fn image_with_max(max_size_bytes: u64) -> Self {
        Self::new(
            max_size_bytes,
            IMAGE_ALLOWED_MEDIA_TYPES.iter(),
            std::iter::empty::<&str>(),
        )
    }

    /// Policy for Anki deck packages. Browsers report no reliable media type
    /// for `.apkg`, so only the extension is checked.
    pub fn deck_package() -> Self {
        Self::deck_package_with_max(DECK_MAX_SIZE_BYTES)
    }

    pub fn deck_package_with_max(max_size_bytes: u64) -> Self {
        Self::new(
            max_size_bytes,
            std::iter::empty::<&str>(),
            DECK_ALLOWED_EXTENSIONS.iter(),
        )
    }

    pub fn for_kind(kind: AssetKind) -> Self {
        match kind {
            AssetKind::Image => Self::image(),
            AssetKind::DeckPackage => Self::deck_package(),
        }
    }

    /// Filter string for a native file chooser, e.g. `image/gif,image/jpeg`
    /// or `.apkg`. Media types come first, then dotted extensions.
    pub fn accept_filter(&self) -> String {
        self.allowed_media_types
            .iter()
            .cloned()
            .chain(self.allowed_extensions.iter().map(|e| format!(".{}", e)))
            .collect::<Vec<_>>()
            .join(",")
    }
}

pub(crate) fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_entries() {
        let policy = ValidationPolicy::new(1, ["Image/PNG ", ""], [".APKG", "zip", "."]);
        assert!(policy.allowed_media_types.contains("image/png"));
        assert_eq!(policy.allowed_media_types.len(), 1);
        assert!(policy.allowed_extensions.contains("apkg"));
        assert!(policy.allowed_extensions.contains("zip"));
        assert_eq!(policy.allowed_extensions.len(), 2);
    }

    #[test]
    fn test_image_preset() {
        let policy = ValidationPolicy::image();
        assert_eq!(policy.max_size_bytes, 10 * 1024 * 1024);
        assert_eq!(policy.allowed_media_types.len(), 5);
        assert!(policy.allowed_extensions.is_empty());
    }

    #[test]
    fn test_deck_preset() {
        let policy = ValidationPolicy::for_kind(AssetKind::DeckPackage);
        assert!(policy.allowed_media_types.is_empty());
        assert_eq!(policy.allowed_extensions.len(), 1);
        assert_eq!(policy.accept_filter(), ".apkg");
    }

    #[test]
    fn test_accept_filter_image() {
        assert_eq!(
            ValidationPolicy::image().accept_filter(),
            "image/gif,image/jpeg,image/jpg,image/png,image/webp"
        );
    }
}
