use std::sync::Arc;

use crossbeam_channel::{Receiver, TryRecvError};

use crate::capture::domain::capture_backend::{CaptureBackend, ReadbackRequest, ReadbackStatus};
use crate::capture::domain::capture_error::CaptureError;
use crate::shared::constants::TARGET_BYTES_PER_PIXEL;
use crate::shared::frame::Frame;

use super::gpu_context::GpuContext;
use super::texture_frame_source::TextureFrameSource;

/// Which GPU-to-CPU path captures take.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadbackMode {
    /// Map the staging buffer without blocking; the caller polls for completion.
    #[default]
    Async,
    /// Wait for the GPU on the calling thread. Stalls the pipeline.
    Blocking,
}

struct CaptureTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

/// wgpu implementation of the capture backend.
///
/// Owns the offscreen capture target and blits the bound frame source
/// into it with a full-screen triangle. Readbacks copy the target into a
/// row-padded staging buffer and map it.
pub struct WgpuCaptureBackend {
    ctx: Arc<GpuContext>,
    source: Option<Arc<TextureFrameSource>>,
    target: Option<CaptureTarget>,
    mode: ReadbackMode,
}

impl WgpuCaptureBackend {
    /// Fails with [`CaptureError::TargetTooLarge`] when the device cannot
    /// hold a `width` x `height` texture. A zero size leaves no target.
    pub fn new(ctx: Arc<GpuContext>, width: u32, height: u32) -> Result<Self, CaptureError> {
        let target = create_target(&ctx, width, height)?;
        Ok(Self {
            ctx,
            source: None,
            target,
            mode: ReadbackMode::default(),
        })
    }

    pub fn with_readback_mode(mut self, mode: ReadbackMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn bind_source(&mut self, source: Arc<TextureFrameSource>) {
        self.source = Some(source);
    }

    pub fn unbind_source(&mut self) {
        self.source = None;
    }

    fn issue_readback(&self) -> Result<GpuReadback, CaptureError> {
        let target = self.target.as_ref().ok_or(CaptureError::MissingTarget)?;
        let (width, height) = (target.width, target.height);

        let unpadded_bytes_per_row = width * TARGET_BYTES_PER_PIXEL;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;

        let staging = self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("capture-staging"),
            size: padded_bytes_per_row as u64 * height as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("readback"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.ctx.queue.submit(Some(encoder.finish()));

        let (tx, rx) = crossbeam_channel::bounded(1);
        staging
            .slice(..)
            .map_async(wgpu::MapMode::Read, move |result| {
                let _ = tx.send(result);
            });

        Ok(GpuReadback {
            device: self.ctx.device.clone(),
            staging,
            rx,
            width,
            height,
            padded_bytes_per_row,
            consumed: false,
        })
    }
}

impl CaptureBackend for WgpuCaptureBackend {
    fn has_source(&self) -> bool {
        self.source.is_some()
    }

    fn target_size(&self) -> (u32, u32) {
        self.target
            .as_ref()
            .map(|t| (t.width, t.height))
            .unwrap_or((0, 0))
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), CaptureError> {
        if self.target_size() == (width, height) {
            return Ok(());
        }
        log::debug!("Recreating capture target at {width}x{height}");
        self.target = create_target(&self.ctx, width, height)?;
        Ok(())
    }

    fn blit(&mut self) -> Result<(), CaptureError> {
        let (Some(source), Some(target)) = (&self.source, &self.target) else {
            log::debug!("Blit skipped: no frame source or capture target");
            return Ok(());
        };

        let bind_group = self.ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("blit-bind-group"),
            layout: &self.ctx.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(source.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.ctx.sampler),
                },
            ],
        });

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("blit"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("blit"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.ctx.blit_pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.draw(0..3, 0..1);
        }
        self.ctx.queue.submit(Some(encoder.finish()));
        Ok(())
    }

    fn supports_async_readback(&self) -> bool {
        self.mode == ReadbackMode::Async
    }

    fn request_readback(&mut self) -> Result<Box<dyn ReadbackRequest>, CaptureError> {
        Ok(Box::new(self.issue_readback()?))
    }

    fn read_pixels(&mut self, cache: &mut Frame) -> Result<(), CaptureError> {
        match self.issue_readback()?.wait() {
            ReadbackStatus::Done(rgba) => cache.copy_from_rgba(&rgba),
            ReadbackStatus::Error(msg) => Err(CaptureError::ReadbackFailed(msg)),
            ReadbackStatus::Pending => Err(CaptureError::ReadbackFailed(
                "readback did not complete".into(),
            )),
        }
    }
}

fn create_target(
    ctx: &GpuContext,
    width: u32,
    height: u32,
) -> Result<Option<CaptureTarget>, CaptureError> {
    if width == 0 || height == 0 {
        return Ok(None);
    }
    ctx.check_texture_size(width, height)?;
    let texture = ctx.create_texture(
        "capture-target",
        width,
        height,
        wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    Ok(Some(CaptureTarget {
        texture,
        view,
        width,
        height,
    }))
}

/// In-flight mapping of a staging buffer. Completion arrives through the
/// `map_async` callback, which fires during a device poll.
struct GpuReadback {
    device: Arc<wgpu::Device>,
    staging: wgpu::Buffer,
    rx: Receiver<Result<(), wgpu::BufferAsyncError>>,
    width: u32,
    height: u32,
    padded_bytes_per_row: u32,
    consumed: bool,
}

impl GpuReadback {
    fn finish(&mut self, result: Result<(), wgpu::BufferAsyncError>) -> ReadbackStatus {
        self.consumed = true;
        match result {
            Ok(()) => ReadbackStatus::Done(self.read_mapped()),
            Err(e) => ReadbackStatus::Error(e.to_string()),
        }
    }

    /// Strips the row padding required by `copy_texture_to_buffer`.
    fn read_mapped(&self) -> Vec<u8> {
        let unpadded = (self.width * TARGET_BYTES_PER_PIXEL) as usize;
        let mapped = self.staging.slice(..).get_mapped_range();
        let mut pixels = Vec::with_capacity(unpadded * self.height as usize);
        for row in mapped
            .chunks(self.padded_bytes_per_row as usize)
            .take(self.height as usize)
        {
            pixels.extend_from_slice(&row[..unpadded]);
        }
        drop(mapped);
        self.staging.unmap();
        pixels
    }
}

impl ReadbackRequest for GpuReadback {
    fn poll(&mut self) -> ReadbackStatus {
        if self.consumed {
            return ReadbackStatus::Error("readback already consumed".into());
        }
        let _ = self.device.poll(wgpu::Maintain::Poll);
        match self.rx.try_recv() {
            Ok(result) => self.finish(result),
            Err(TryRecvError::Empty) => ReadbackStatus::Pending,
            Err(TryRecvError::Disconnected) => {
                ReadbackStatus::Error("readback callback dropped".into())
            }
        }
    }

    fn wait(&mut self) -> ReadbackStatus {
        if self.consumed {
            return ReadbackStatus::Error("readback already consumed".into());
        }
        let _ = self.device.poll(wgpu::Maintain::Wait);
        match self.rx.recv() {
            Ok(result) => self.finish(result),
            Err(_) => ReadbackStatus::Error("readback callback dropped".into()),
        }
    }
}
