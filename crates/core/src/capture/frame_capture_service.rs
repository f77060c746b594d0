use std::path::{Component, Path, PathBuf};

use crate::capture::domain::capture_backend::{CaptureBackend, ReadbackRequest, ReadbackStatus};
use crate::capture::domain::capture_error::CaptureError;
use crate::capture::domain::image_writer::ImageWriter;
use crate::shared::capture_config::{CaptureConfig, ErrorPolicy, ImageFormat};
use crate::shared::frame::Frame;

/// Where the most recent capture is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Blitting,
    AsyncPending,
    SyncReadback,
    Encoding,
    Written,
    Aborted,
}

/// Result of a `capture` or `poll` call.
#[derive(Debug)]
pub enum CaptureOutcome {
    /// Nothing in flight.
    Idle,
    /// An async readback is outstanding; keep polling.
    Pending,
    Written(PathBuf),
    /// The capture did not start. Only returned under [`ErrorPolicy::Lenient`].
    Skipped(CaptureError),
    /// The readback failed and nothing was written. Only returned under
    /// [`ErrorPolicy::Lenient`].
    Aborted,
}

struct PendingCapture {
    request: Box<dyn ReadbackRequest>,
    path: PathBuf,
    format: ImageFormat,
    policy: ErrorPolicy,
}

/// Captures the frame source to an image file: blit → readback → encode → write.
///
/// Prefers the backend's asynchronous readback and falls back to a blocking
/// copy. Async captures complete on a later [`poll`](Self::poll), which the
/// host calls once per frame. Only one capture may be in flight; the pixel
/// cache is reused between captures and recreated when the target resizes.
pub struct FrameCaptureService {
    backend: Box<dyn CaptureBackend>,
    writer: Box<dyn ImageWriter>,
    output_dir: PathBuf,
    pixel_cache: Option<Frame>,
    pending: Option<PendingCapture>,
    state: CaptureState,
}

impl FrameCaptureService {
    pub fn new(
        backend: Box<dyn CaptureBackend>,
        writer: Box<dyn ImageWriter>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            backend,
            writer,
            output_dir: output_dir.into(),
            pixel_cache: None,
            pending: None,
            state: CaptureState::Idle,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// The most recently read-back frame, if any capture has run.
    pub fn pixel_cache(&self) -> Option<&Frame> {
        self.pixel_cache.as_ref()
    }

    /// Changes the output resolution. The pixel cache follows on the next capture.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), CaptureError> {
        self.backend.resize(width, height)
    }

    /// Starts a capture of the current frame source.
    ///
    /// Returns [`CaptureOutcome::Written`] when the blocking path ran, or
    /// [`CaptureOutcome::Pending`] when an async readback was issued.
    pub fn capture(&mut self, config: &CaptureConfig) -> Result<CaptureOutcome, CaptureError> {
        if self.pending.is_some() {
            return skip(config.policy, CaptureError::Busy);
        }
        if let Err(e) = self.check_preconditions(config) {
            return skip(config.policy, e);
        }

        self.ensure_pixel_cache();

        self.state = CaptureState::Blitting;
        if let Err(e) = self.backend.blit() {
            self.state = CaptureState::Aborted;
            return Err(e);
        }

        let path = self.output_dir.join(&config.filename);

        if self.backend.supports_async_readback() {
            log::info!("Using async GPU readback");
            let request = match self.backend.request_readback() {
                Ok(request) => request,
                Err(e) => {
                    self.state = CaptureState::Aborted;
                    return Err(e);
                }
            };
            self.pending = Some(PendingCapture {
                request,
                path,
                format: config.format,
                policy: config.policy,
            });
            self.state = CaptureState::AsyncPending;
            return Ok(CaptureOutcome::Pending);
        }

        log::info!("Async GPU readback not supported, using blocking readback");
        self.state = CaptureState::SyncReadback;
        let Some(cache) = self.pixel_cache.as_mut() else {
            return Err(CaptureError::EmptyFrame);
        };
        match self.backend.read_pixels(cache) {
            Ok(()) => self.write_cache(path, config.format),
            Err(e @ CaptureError::ReadbackFailed(_)) => self.abort(config.policy, e),
            Err(e) => {
                self.state = CaptureState::Aborted;
                Err(e)
            }
        }
    }

    /// Advances an in-flight async capture. Call once per frame.
    pub fn poll(&mut self) -> Result<CaptureOutcome, CaptureError> {
        let status = match self.pending.as_mut() {
            Some(pending) => pending.request.poll(),
            None => return Ok(CaptureOutcome::Idle),
        };
        self.complete(status)
    }

    /// Blocks until the in-flight capture (if any) finishes.
    pub fn wait(&mut self) -> Result<CaptureOutcome, CaptureError> {
        let status = match self.pending.as_mut() {
            Some(pending) => pending.request.wait(),
            None => return Ok(CaptureOutcome::Idle),
        };
        self.complete(status)
    }

    fn complete(&mut self, status: ReadbackStatus) -> Result<CaptureOutcome, CaptureError> {
        match status {
            ReadbackStatus::Pending => Ok(CaptureOutcome::Pending),
            ReadbackStatus::Done(rgba) => {
                let Some(pending) = self.pending.take() else {
                    return Ok(CaptureOutcome::Idle);
                };
                let Some(cache) = self.pixel_cache.as_mut() else {
                    return Err(CaptureError::EmptyFrame);
                };
                if let Err(e) = cache.copy_from_rgba(&rgba) {
                    self.state = CaptureState::Aborted;
                    return Err(e);
                }
                self.write_cache(pending.path, pending.format)
            }
            ReadbackStatus::Error(msg) => {
                let policy = self
                    .pending
                    .take()
                    .map(|p| p.policy)
                    .unwrap_or_default();
                self.abort(policy, CaptureError::ReadbackFailed(msg))
            }
        }
    }

    fn check_preconditions(&self, config: &CaptureConfig) -> Result<(), CaptureError> {
        if !self.backend.has_source() {
            return Err(CaptureError::MissingSource);
        }
        let (width, height) = self.backend.target_size();
        if width == 0 || height == 0 {
            return Err(CaptureError::MissingTarget);
        }
        if config.filename.trim().is_empty() {
            return Err(CaptureError::MissingFilename);
        }
        let escapes = Path::new(&config.filename).components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return Err(CaptureError::InvalidFilename(config.filename.clone()));
        }
        Ok(())
    }

    /// Creates the pixel cache on first use, and recreates it blank when the
    /// capture target no longer matches its size.
    fn ensure_pixel_cache(&mut self) {
        let (width, height) = self.backend.target_size();
        match &self.pixel_cache {
            Some(cache) if cache.width() == width && cache.height() == height => {}
            Some(_) => {
                log::debug!("Capture target resized to {width}x{height}, recreating pixel cache");
                self.pixel_cache = Some(Frame::blank(width, height));
            }
            None => self.pixel_cache = Some(Frame::blank(width, height)),
        }
    }

    fn write_cache(
        &mut self,
        path: PathBuf,
        format: ImageFormat,
    ) -> Result<CaptureOutcome, CaptureError> {
        self.state = CaptureState::Encoding;
        let Some(cache) = self.pixel_cache.as_ref() else {
            return Err(CaptureError::EmptyFrame);
        };
        match self.writer.write(&path, cache, format) {
            Ok(()) => {
                self.state = CaptureState::Written;
                log::info!("Saved capture to \"{}\"", path.display());
                Ok(CaptureOutcome::Written(path))
            }
            Err(e) => {
                self.state = CaptureState::Aborted;
                Err(e)
            }
        }
    }

    fn abort(
        &mut self,
        policy: ErrorPolicy,
        error: CaptureError,
    ) -> Result<CaptureOutcome, CaptureError> {
        self.state = CaptureState::Aborted;
        match policy {
            ErrorPolicy::Strict => Err(error),
            ErrorPolicy::Lenient => {
                log::warn!("Capture aborted: {error}");
                Ok(CaptureOutcome::Aborted)
            }
        }
    }
}

fn skip(policy: ErrorPolicy, error: CaptureError) -> Result<CaptureOutcome, CaptureError> {
    match policy {
        ErrorPolicy::Strict => Err(error),
        ErrorPolicy::Lenient => {
            log::debug!("Capture skipped: {error}");
            Ok(CaptureOutcome::Skipped(error))
        }
    }
}
