//! Document types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Supported upload media types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Pdf,
    Jpeg,
    Png,
}

impl MediaType {
    /// Resolve from a declared MIME type.
    pub fn from_mime(mime: &str) -> Option<Self> {
        // Parameters like "; charset=..." are irrelevant here
        let essence = mime.split(';').next().unwrap_or(mime).trim();
        match essence {
            "application/pdf" => Some(Self::Pdf),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Resolve from a file name extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = name.rsplit('.').next()?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(b"%PDF-") {
            Some(Self::Pdf)
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            Some(Self::Png)
        } else {
            None
        }
    }

    /// Canonical MIME type.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// One rasterized (or passed-through) page, in page order.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// Zero-based page index.
    pub index: usize,
    /// Encoded pixel buffer (PNG for rasterized pages, upload bytes for images).
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mime() {
        assert_eq!(MediaType::from_mime("application/pdf"), Some(MediaType::Pdf));
        assert_eq!(MediaType::from_mime("image/jpeg"), Some(MediaType::Jpeg));
        assert_eq!(MediaType::from_mime("image/png"), Some(MediaType::Png));
        assert_eq!(
            MediaType::from_mime("image/png; charset=binary"),
            Some(MediaType::Png)
        );
        assert_eq!(MediaType::from_mime("text/plain"), None);
    }

    #[test]
    fn test_from_file_name() {
        assert_eq!(MediaType::from_file_name("invoice.PDF"), Some(MediaType::Pdf));
        assert_eq!(MediaType::from_file_name("scan.jpeg"), Some(MediaType::Jpeg));
        assert_eq!(MediaType::from_file_name("page.png"), Some(MediaType::Png));
        assert_eq!(MediaType::from_file_name("notes.txt"), None);
        assert_eq!(MediaType::from_file_name("no_extension"), None);
    }

    #[test]
    fn test_from_magic_bytes() {
        assert_eq!(
            MediaType::from_magic_bytes(b"%PDF-1.7 rest"),
            Some(MediaType::Pdf)
        );
        assert_eq!(
            MediaType::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(MediaType::Jpeg)
        );
        assert_eq!(
            MediaType::from_magic_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]),
            Some(MediaType::Png)
        );
        assert_eq!(MediaType::from_magic_bytes(b"hello"), None);
    }
}
