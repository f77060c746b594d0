use std::path::Path;

use crate::capture::domain::capture_error::CaptureError;
use crate::shared::capture_config::ImageFormat;
use crate::shared::frame::Frame;

/// Encodes a captured frame and persists it.
pub trait ImageWriter: Send {
    fn write(&self, path: &Path, frame: &Frame, format: ImageFormat) -> Result<(), CaptureError>;
}
