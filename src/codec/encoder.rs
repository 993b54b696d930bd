//! Raster decode and lossy WebP encode
//!
//! The raster is the transient decoding resource of the conversion path: it
//! is produced from the source bytes, consumed by value by the encoder, and
//! dropped before the converted file leaves the adapter, so repeated
//! conversions in one session do not accumulate pixel buffers.

use image::io::Reader as ImageReader;
use std::io::Cursor;

use super::error::CodecError;

/// Decoded RGBA pixels awaiting re-encode
#[derive(Debug)]
pub struct Raster {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Raster {
    /// Decode image bytes into an RGBA raster
    ///
    /// The container format is guessed from the content, which tolerates
    /// mislabeled-but-valid uploads the same way a browser decoder would.
    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let img = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| CodecError::DecodeFailed(e.to_string()))?
            .decode()
            .map_err(|e| CodecError::DecodeFailed(e.to_string()))?;

        let width = img.width();
        let height = img.height();
        let rgba = img.to_rgba8().into_raw();

        Ok(Self {
            rgba,
            width,
            height,
        })
    }
}

/// Encode a raster to lossy WebP at the given 0-1 compression factor
///
/// Consumes the raster so the pixel buffer is released as soon as the
/// encoder has run.
pub fn encode_lossy_webp(raster: Raster, factor: f32) -> Result<Vec<u8>, CodecError> {
    let quality = (factor.clamp(0.0, 1.0)) * 100.0;

    let encoded = webp::Encoder::new(
        &raster.rgba,
        webp::PixelLayout::Rgba,
        raster.width,
        raster.height,
    )
    .encode_simple(false, quality)
    .map_err(|e| CodecError::EncodeFailed(format!("{:?}", e)))?;

    if encoded.is_empty() {
        return Err(CodecError::NoOutput);
    }

    Ok(encoded.to_vec())
}
