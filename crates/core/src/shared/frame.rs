use crate::capture::domain::capture_error::CaptureError;

/// A CPU-side image: contiguous RGB8 bytes in row-major order.
///
/// Used as the pixel cache that readbacks land in before encoding. GPU
/// buffers are RGBA; the alpha channel is dropped at the copy boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

pub const CHANNELS: usize = 3;

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// A zero-filled frame.
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(
            vec![0; (width as usize) * (height as usize) * CHANNELS],
            width,
            height,
        )
    }

    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take((width as usize) * (height as usize) * CHANNELS)
            .collect();
        Self::new(data, width, height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[cfg(test)]
    pub(crate) fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = ((y as usize) * (self.width as usize) + x as usize) * CHANNELS;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Overwrites every pixel from tightly packed RGBA8 rows.
    pub fn copy_from_rgba(&mut self, rgba: &[u8]) -> Result<(), CaptureError> {
        let expected = (self.width as usize) * (self.height as usize) * 4;
        if rgba.len() != expected {
            return Err(CaptureError::DimensionMismatch {
                expected,
                actual: rgba.len(),
            });
        }
        for (dst, src) in self.data.chunks_exact_mut(CHANNELS).zip(rgba.chunks_exact(4)) {
            dst.copy_from_slice(&src[..CHANNELS]);
        }
        Ok(())
    }

    /// Expands to RGBA8 with opaque alpha, the layout GPU textures expect.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() / CHANNELS * 4);
        for px in self.data.chunks_exact(CHANNELS) {
            out.extend_from_slice(px);
            out.push(u8::MAX);
        }
        out
    }
}
