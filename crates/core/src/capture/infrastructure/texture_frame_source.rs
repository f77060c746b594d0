use std::sync::Arc;

use crate::capture::domain::capture_error::CaptureError;
use crate::shared::constants::TARGET_BYTES_PER_PIXEL;
use crate::shared::frame::Frame;

use super::gpu_context::GpuContext;

/// GPU texture holding the live background image.
///
/// Stands in for the AR camera texture: the host re-uploads it whenever
/// a new camera frame arrives, and captures always read whatever the
/// texture holds at blit time.
pub struct TextureFrameSource {
    ctx: Arc<GpuContext>,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl TextureFrameSource {
    pub fn new(ctx: Arc<GpuContext>, width: u32, height: u32) -> Result<Self, CaptureError> {
        ctx.check_texture_size(width, height)?;
        let texture = ctx.create_texture(
            "frame-source",
            width,
            height,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Ok(Self {
            ctx,
            texture,
            view,
            width,
            height,
        })
    }

    pub fn from_frame(ctx: Arc<GpuContext>, frame: &Frame) -> Result<Self, CaptureError> {
        if frame.is_empty() {
            return Err(CaptureError::EmptyFrame);
        }
        let source = Self::new(ctx, frame.width(), frame.height())?;
        source.upload(frame)?;
        Ok(source)
    }

    /// Replaces the texture contents. The frame must match the texture size.
    pub fn upload(&self, frame: &Frame) -> Result<(), CaptureError> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(CaptureError::DimensionMismatch {
                expected: (self.width * self.height) as usize * 3,
                actual: frame.data().len(),
            });
        }

        self.ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &frame.to_rgba(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.width * TARGET_BYTES_PER_PIXEL),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn try_gpu_context() -> Option<Arc<GpuContext>> {
        GpuContext::new().map(Arc::new)
    }

    #[test]
    fn test_from_frame_takes_frame_dimensions() {
        let ctx = match try_gpu_context() {
            Some(c) => c,
            None => return,
        };
        let source = TextureFrameSource::from_frame(ctx, &Frame::solid(6, 3, [1, 2, 3])).unwrap();
        assert_eq!((source.width(), source.height()), (6, 3));
    }

    #[test]
    fn test_empty_frame_is_rejected() {
        let ctx = match try_gpu_context() {
            Some(c) => c,
            None => return,
        };
        assert!(matches!(
            TextureFrameSource::from_frame(ctx, &Frame::blank(0, 0)),
            Err(CaptureError::EmptyFrame)
        ));
    }

    #[test]
    fn test_upload_with_wrong_size_fails() {
        let ctx = match try_gpu_context() {
            Some(c) => c,
            None => return,
        };
        let source = TextureFrameSource::new(ctx, 4, 4).unwrap();
        assert!(matches!(
            source.upload(&Frame::blank(2, 2)),
            Err(CaptureError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_oversized_source_is_rejected_without_panicking() {
        let ctx = match try_gpu_context() {
            Some(c) => c,
            None => return,
        };
        let max = ctx.max_texture_dimension();
        assert!(matches!(
            TextureFrameSource::new(ctx, max + 1, 4),
            Err(CaptureError::TargetTooLarge { .. })
        ));
    }
}
