use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage};

use crate::capture::domain::capture_error::CaptureError;
use crate::shared::capture_config::ImageFormat;
use crate::shared::constants::JPEG_QUALITY;
use crate::shared::frame::Frame;

/// Encodes an RGB8 frame into the bytes of an image file.
///
/// EXR output promotes each channel to `f32` in `[0, 1]`, so RGB8 content
/// survives a round trip exactly. JPEG uses the engine's default quality.
pub fn encode(frame: &Frame, format: ImageFormat) -> Result<Vec<u8>, CaptureError> {
    if frame.is_empty() {
        return Err(CaptureError::EmptyFrame);
    }

    let img = RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec()).ok_or(
        CaptureError::DimensionMismatch {
            expected: (frame.width() * frame.height() * 3) as usize,
            actual: frame.data().len(),
        },
    )?;

    let mut bytes = Vec::new();
    match format {
        ImageFormat::Png => img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?,
        ImageFormat::Jpeg => {
            img.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY))?
        }
        ImageFormat::Exr => DynamicImage::ImageRgb8(img)
            .into_rgb32f()
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::OpenExr)?,
    }
    Ok(bytes)
}
