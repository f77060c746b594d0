use std::fs;
use std::path::Path;

use crate::capture::domain::capture_error::CaptureError;
use crate::capture::domain::image_writer::ImageWriter;
use crate::shared::capture_config::ImageFormat;
use crate::shared::frame::Frame;

use super::image_encoder::encode;

/// Writes captured frames to disk using the `image` crate encoders.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame, format: ImageFormat) -> Result<(), CaptureError> {
        write_frame_to_file(frame, path, format)
    }
}

/// Encodes `frame` and writes it to `path`, creating parent directories.
///
/// Unlike a service capture this never skips silently: an empty path or
/// an empty frame is always an error.
pub fn write_frame_to_file(
    frame: &Frame,
    path: &Path,
    format: ImageFormat,
) -> Result<(), CaptureError> {
    if path.as_os_str().is_empty() {
        return Err(CaptureError::MissingFilename);
    }

    let bytes = encode(frame, format)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| CaptureError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, bytes).map_err(|source| CaptureError::Io {
        path: path.to_path_buf(),
        source,
    })
}
