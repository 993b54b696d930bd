//! The `convert` contract: one file in, one file out
//!
//! Decode → re-encode → rename, asynchronous, recoverable on every failure
//! path. Non-image input is returned unchanged rather than rejected.

use bytes::Bytes;

use super::encoder::{encode_lossy_webp, Raster};
use super::error::CodecError;
use super::format::{is_image_mime, quality_factor, webp_name, MIME_WEBP};
use super::FileCandidate;

/// WebP conversion adapter
///
/// Stateless; one instance is shared by both interception protocols.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebpConverter;

impl WebpConverter {
    pub fn new() -> Self {
        Self
    }

    /// Convert a file to WebP at the given quality percentage
    ///
    /// # Returns
    /// * `Ok(file)` - the converted file, or the original file untouched when
    ///   its declared type is not an image type
    /// * `Err(CodecError)` - decode failed or the encoder yielded no output;
    ///   callers treat this as recoverable and keep the original file
    pub async fn convert(
        &self,
        file: FileCandidate,
        quality: u8,
    ) -> Result<FileCandidate, CodecError> {
        if !is_image_mime(&file.mime) {
            return Ok(file);
        }

        let factor = quality_factor(quality);
        let name = webp_name(&file.name);
        let data = file.data.clone();

        // Decode and re-encode off the cooperative thread; the raster lives
        // only inside this closure.
        let encoded = tokio::task::spawn_blocking(move || {
            let raster = Raster::decode(&data)?;
            encode_lossy_webp(raster, factor)
        })
        .await
        .map_err(|e| CodecError::EncodeFailed(e.to_string()))??;

        Ok(FileCandidate::new(name, MIME_WEBP, Bytes::from(encoded)))
    }
}
