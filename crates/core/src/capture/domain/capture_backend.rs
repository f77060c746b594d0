use crate::capture::domain::capture_error::CaptureError;
use crate::shared::frame::Frame;

/// State of an in-flight GPU-to-CPU transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadbackStatus {
    Pending,
    /// Tightly packed RGBA8 rows of the capture target.
    Done(Vec<u8>),
    Error(String),
}

/// A non-blocking readback that the caller polls once per frame.
pub trait ReadbackRequest: Send {
    fn poll(&mut self) -> ReadbackStatus;

    /// Blocks until the readback finishes. Never returns `Pending`.
    fn wait(&mut self) -> ReadbackStatus {
        loop {
            match self.poll() {
                ReadbackStatus::Pending => std::thread::yield_now(),
                status => return status,
            }
        }
    }
}

/// Port over the GPU side of a capture: the live frame source, the
/// offscreen capture target, and the two readback paths.
pub trait CaptureBackend: Send {
    /// True once a frame source is bound.
    fn has_source(&self) -> bool;

    /// Dimensions of the offscreen capture target. `(0, 0)` means no target.
    fn target_size(&self) -> (u32, u32);

    /// Recreates the capture target at a new resolution.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), CaptureError>;

    /// Copies the frame source into the capture target. No-op without a source.
    fn blit(&mut self) -> Result<(), CaptureError>;

    fn supports_async_readback(&self) -> bool;

    fn request_readback(&mut self) -> Result<Box<dyn ReadbackRequest>, CaptureError>;

    /// Blocking fallback: waits for outstanding GPU work, then fills `cache`.
    fn read_pixels(&mut self, cache: &mut Frame) -> Result<(), CaptureError>;
}
