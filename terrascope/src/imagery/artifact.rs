//! Rendered image payloads.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;

/// Content type assumed when the provider does not declare an image type.
pub const DEFAULT_CONTENT_TYPE: &str = "image/png";

/// An encoded image as returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    content_type: String,
    bytes: Bytes,
}

impl Artifact {
    pub fn new(content_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Creates a PNG artifact.
    pub fn png(bytes: impl Into<Bytes>) -> Self {
        Self::new(DEFAULT_CONTENT_TYPE, bytes)
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Encodes the artifact as a `data:` URI.
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            STANDARD.encode(&self.bytes)
        )
    }
}
