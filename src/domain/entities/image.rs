//! Domain types for image caching.

use std::sync::Arc;

/// Unique identifier for a cached image.
/// Usually a content ID; [`ImageId::from_url`] derives one from a URL otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageId(String);

impl ImageId {
    /// Creates a new `ImageId` from any string-like input.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates an `ImageId` from a URL by hashing it.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let result = hasher.finalize();
        Self(hex::encode(&result[..16]))
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the persisted copy of this image.
    ///
    /// Bytes outside `[A-Za-z0-9_-]` are written as `%XX`, so the name is
    /// always a single component inside the cache directory.
    #[must_use]
    pub fn file_name(&self) -> String {
        let mut name = String::with_capacity(self.0.len() + 4);
        for byte in self.0.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
                name.push(char::from(byte));
            } else {
                name.push('%');
                name.push_str(&hex::encode_upper([byte]));
            }
        }
        name.push_str(".png");
        name
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ImageId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ImageId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Where an image was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Found in the in-memory store.
    MemoryCache,
    /// Decoded from the on-disk PNG copy.
    DiskCache,
    /// Downloaded from network.
    Network,
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemoryCache => write!(f, "memory"),
            Self::DiskCache => write!(f, "disk"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// A decoded image together with the tier that served it.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// The image ID.
    pub id: ImageId,
    /// The decoded image.
    pub image: Arc<image::DynamicImage>,
    /// Where the image came from.
    pub source: ImageSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_id_from_url() {
        let url = "https://cdn.discordapp.com/avatars/123/abc.png";
        let id = ImageId::from_url(url);
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_image_id_consistency() {
        let url = "https://example.com/image.png";
        assert_eq!(ImageId::from_url(url), ImageId::from_url(url));
        assert_ne!(
            ImageId::from_url(url),
            ImageId::from_url("https://example.com/other.png")
        );
    }

    #[test]
    fn test_file_name() {
        assert_eq!(ImageId::new("1234").file_name(), "1234.png");
        assert_eq!(ImageId::new("a_b-C9").file_name(), "a_b-C9.png");
    }

    #[test]
    fn test_file_name_is_single_component() {
        assert_eq!(ImageId::new("../x").file_name(), "%2E%2E%2Fx.png");
        assert_eq!(ImageId::new("/abs/x").file_name(), "%2Fabs%2Fx.png");
        assert_eq!(ImageId::new("a.b").file_name(), "a%2Eb.png");
        assert_eq!(ImageId::new("C:\\x").file_name(), "C%3A%5Cx.png");
    }
}
