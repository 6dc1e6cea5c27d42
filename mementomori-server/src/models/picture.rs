//! Image payloads
//!
//! Images travel as base64 on the wire and are stored as raw bytes.
//! Responses re-encode them as `data:image/<kind>;base64,...` URIs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::ValidationError;

/// Maximum decoded image size (10 MiB)
pub const MAX_PICTURE_BYTES: usize = 10 * 1024 * 1024;

/// Decoded image bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture(Vec<u8>);

impl Picture {
    /// Decode a base64 payload, with or without a `data:...;base64,` prefix.
    ///
    /// # Example
    /// ```
    /// use mementomori_server::models::Picture;
    ///
    /// let pic = Picture::from_base64("picture", "data:image/png;base64,iVBORw0KGgo=").unwrap();
    /// assert_eq!(pic.as_bytes().len(), 8);
    /// ```
    pub fn from_base64(field: &'static str, s: &str) -> Result<Self, ValidationError> {
        let payload = strip_data_uri_prefix(s.trim());
        if payload.is_empty() {
            return Err(ValidationError::Empty { field });
        }

        // whitespace shows up when clients wrap long base64 lines
        let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        if compact.len() / 4 * 3 > MAX_PICTURE_BYTES + 3 {
            return Err(ValidationError::TooLong {
                field,
                max: MAX_PICTURE_BYTES,
            });
        }

        let bytes = STANDARD
            .decode(compact.as_bytes())
            .map_err(|_| ValidationError::InvalidFormat {
                field,
                reason: "must be base64-encoded image data",
            })?;

        Self::from_bytes(field, bytes)
    }

    /// Wrap raw bytes (multipart file parts).
    pub fn from_bytes(field: &'static str, bytes: Vec<u8>) -> Result<Self, ValidationError> {
        if bytes.is_empty() {
            return Err(ValidationError::Empty { field });
        }
        if bytes.len() > MAX_PICTURE_BYTES {
            return Err(ValidationError::TooLong {
                field,
                max: MAX_PICTURE_BYTES,
            });
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

fn strip_data_uri_prefix(s: &str) -> &str {
    if s.starts_with("data:") {
        if let Some(idx) = s.find(";base64,") {
            return &s[idx + ";base64,".len()..];
        }
    }
    s
}

/// Image formats recognised by magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageKind {
    /// Sniff the format from leading bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0x89, b'P', b'N', b'G', ..] => Some(Self::Png),
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [b'G', b'I', b'F', b'8', ..] => Some(Self::Gif),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }
}

/// Encode stored bytes as a data URI, defaulting to JPEG when unrecognised.
pub fn to_data_uri(bytes: &[u8]) -> String {
    let mime = ImageKind::sniff(bytes).unwrap_or(ImageKind::Jpeg).mime();
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}
