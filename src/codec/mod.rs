//! Codec adapter module
//!
//! Converts a single upload file to WebP:
//! - Declared-MIME gate (non-image input passes through untouched)
//! - Decode into a transient RGBA raster
//! - Lossy WebP re-encode at `quality / 100` compression factor
//! - `.png`/`.jpg`/`.jpeg` name suffix rewritten to `.webp`
//!
//! Conversion failures are recoverable by contract: callers fall back to the
//! original file and never surface the error to the page.

pub mod encoder;
pub mod error;
pub mod format;
pub mod processor;

// Re-export commonly used types
pub use encoder::{encode_lossy_webp, Raster};
pub use error::CodecError;
pub use format::{is_eligible_mime, is_image_mime, quality_factor, webp_name, MIME_WEBP};
pub use processor::WebpConverter;

use bytes::Bytes;

/// A single file drawn from a drop payload or an input's file list
///
/// Equality covers name, declared type, and byte content, which is what the
/// replacement invariants are stated in terms of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// File name as the page would see it
    pub name: String,
    /// Declared MIME type (never content-sniffed)
    pub mime: String,
    /// File content
    pub data: Bytes,
}

impl FileCandidate {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, data: Bytes) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            data,
        }
    }
}
