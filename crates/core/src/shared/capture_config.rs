use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::capture::domain::capture_error::CaptureError;

/// Output encoding for a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Exr,
    Jpeg,
    Png,
}

impl ImageFormat {
    pub const ALL: &[ImageFormat] = &[ImageFormat::Exr, ImageFormat::Jpeg, ImageFormat::Png];

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Exr => "exr",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
        }
    }

    /// Infers the format from a file extension, e.g. `capture.JPG`.
    pub fn from_path(path: &Path) -> Result<Self, CaptureError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| CaptureError::UnsupportedFormat(path.display().to_string()))?;
        ext.parse()
    }
}

impl FromStr for ImageFormat {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exr" => Ok(ImageFormat::Exr),
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            "png" => Ok(ImageFormat::Png),
            _ => Err(CaptureError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Exr => write!(f, "EXR"),
            ImageFormat::Jpeg => write!(f, "JPEG"),
            ImageFormat::Png => write!(f, "PNG"),
        }
    }
}

/// How a capture reports the failures the engine scripts used to swallow:
/// missing preconditions, a busy service, and readback errors.
///
/// `Strict` returns them as errors. `Lenient` logs them and reports a
/// skipped or aborted outcome instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    #[default]
    Strict,
    Lenient,
}

/// Parameters for one capture call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Relative to the service's output directory.
    pub filename: String,
    pub format: ImageFormat,
    pub policy: ErrorPolicy,
}

impl CaptureConfig {
    pub fn new(filename: impl Into<String>, format: ImageFormat) -> Self {
        Self {
            filename: filename.into(),
            format,
            policy: ErrorPolicy::default(),
        }
    }

    /// Builds a config whose format is taken from the filename's extension.
    pub fn for_filename(filename: impl Into<String>) -> Result<Self, CaptureError> {
        let filename = filename.into();
        let format = ImageFormat::from_path(Path::new(&filename))?;
        Ok(Self::new(filename, format))
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }
}
