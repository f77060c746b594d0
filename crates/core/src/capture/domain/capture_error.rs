use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("no frame source is bound to the capture backend")]
    MissingSource,
    #[error("capture target has zero size")]
    MissingTarget,
    #[error("no output filename specified")]
    MissingFilename,
    #[error("output filename must stay inside the capture directory: {0}")]
    InvalidFilename(String),
    #[error("frame has no pixels")]
    EmptyFrame,
    #[error("a capture is already in flight")]
    Busy,
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("GPU readback failed: {0}")]
    ReadbackFailed(String),
    #[error("{width}x{height} exceeds the GPU texture limit of {max}")]
    TargetTooLarge { width: u32, height: u32, max: u32 },
    #[error("pixel data is {actual} bytes, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("no suitable GPU adapter available")]
    NoAdapter,
    #[error("failed to request GPU device: {0}")]
    Device(#[source] wgpu::RequestDeviceError),
    #[error("could not determine data directory")]
    NoDataDir,
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
