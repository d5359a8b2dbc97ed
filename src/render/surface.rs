use crate::{
    assets::decode::DecodedFrame,
    foundation::core::{Rect, Rgba8Premul, Viewport},
    foundation::error::{ReelError, ReelResult},
    render::composite::draw_scaled,
};

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Copy with straight (non-premultiplied) alpha, as image encoders expect.
    pub fn to_straight(&self) -> Self {
        if !self.premultiplied {
            return self.clone();
        }
        let mut data = self.data.clone();
        for px in data.chunks_exact_mut(4) {
            let a = u32::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        Self {
            width: self.width,
            height: self.height,
            data,
            premultiplied: false,
        }
    }
}

/// Drawable full-viewport target injected by the host (a canvas, a window surface, a buffer).
pub trait RenderSurface {
    /// Current size.
    fn viewport(&self) -> Viewport;

    /// Reallocate for a new viewport. Contents are undefined until the next draw.
    fn resize(&mut self, viewport: Viewport) -> ReelResult<()>;

    /// Fill the whole surface with one premultiplied color.
    fn clear(&mut self, color: Rgba8Premul);

    /// Draw `frame` scaled into `dest` (surface pixel space) with `opacity` in `[0, 1]`.
    fn draw_image(&mut self, frame: &DecodedFrame, dest: Rect, opacity: f32) -> ReelResult<()>;
}

/// CPU surface holding a premultiplied RGBA8 buffer.
#[derive(Clone, Debug)]
pub struct CpuSurface {
    viewport: Viewport,
    data: Vec<u8>,
}

impl CpuSurface {
    /// Zeroed (transparent) buffer for `viewport`.
    pub fn new(viewport: Viewport) -> ReelResult<Self> {
        let len = byte_len(viewport)?;
        Ok(Self {
            viewport,
            data: vec![0; len],
        })
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Premultiplied pixel at `(x, y)`, `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.viewport.width || y >= self.viewport.height {
            return None;
        }
        let i = ((y as usize) * (self.viewport.width as usize) + x as usize) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// Snapshot of the buffer.
    pub fn to_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.viewport.width,
            height: self.viewport.height,
            data: self.data.clone(),
            premultiplied: true,
        }
    }
}

fn byte_len(viewport: Viewport) -> ReelResult<usize> {
    viewport
        .pixel_count()
        .checked_mul(4)
        .filter(|&n| n <= isize::MAX as usize)
        .ok_or_else(|| ReelError::render(format!("surface {viewport} is too large")))
}

impl RenderSurface for CpuSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn resize(&mut self, viewport: Viewport) -> ReelResult<()> {
        if viewport == self.viewport {
            return Ok(());
        }
        let len = byte_len(viewport)?;
        self.viewport = viewport;
        self.data.clear();
        self.data.resize(len, 0);
        Ok(())
    }

    fn clear(&mut self, color: Rgba8Premul) {
        let px = color.to_array();
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    fn draw_image(&mut self, frame: &DecodedFrame, dest: Rect, opacity: f32) -> ReelResult<()> {
        let expected = (frame.width as usize) * (frame.height as usize) * 4;
        if frame.rgba8_premul.len() != expected {
            return Err(ReelError::render(format!(
                "frame buffer has {} bytes, expected {expected}",
                frame.rgba8_premul.len()
            )));
        }
        draw_scaled(
            &mut self.data,
            self.viewport.width,
            self.viewport.height,
            frame,
            dest,
            opacity,
        );
        Ok(())
    }
}
