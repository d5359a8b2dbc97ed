use std::sync::Arc;

use crate::foundation::{
    core::Size,
    error::{ReelError, ReelResult},
};

/// Decoded frame in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct DecodedFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8, `width * height * 4` bytes.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl DecodedFrame {
    /// Pixel size as floating-point geometry.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Premultiplied pixel at `(x, y)`; callers keep coordinates in bounds.
    #[inline]
    pub(crate) fn px(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let d = &self.rgba8_premul;
        [d[i], d[i + 1], d[i + 2], d[i + 3]]
    }
}

/// Decode encoded frame bytes (PNG, JPEG, WebP...) into premultiplied RGBA8.
pub fn decode_frame(bytes: &[u8]) -> ReelResult<DecodedFrame> {
    let dyn_img = image::load_from_memory(bytes).map_err(|err| {
        ReelError::asset(format!("decode frame image ({} bytes): {err}", bytes.len()))
    })?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(DecodedFrame {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    use crate::foundation::math::mul_div255_u8;
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = mul_div255_u8(u16::from(*c), a);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
