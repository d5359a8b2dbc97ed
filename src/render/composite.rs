use crate::{
    assets::decode::DecodedFrame,
    foundation::core::Rect,
    foundation::math::{mul_div255_u8, unit_to_u8},
};

pub(crate) type PremulRgba8 = [u8; 4];

/// Source-over with an extra coverage factor, premultiplied in and out.
pub(crate) fn over(dst: PremulRgba8, src: PremulRgba8, coverage: u8) -> PremulRgba8 {
    if coverage == 0 || src[3] == 0 {
        return dst;
    }
    let cov = u16::from(coverage);
    let sa = mul_div255_u8(u16::from(src[3]), cov);
    let inv = u16::from(255 - sa);

    let mut out = [0u8; 4];
    for i in 0..4 {
        let s = mul_div255_u8(u16::from(src[i]), cov);
        let d = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = s.saturating_add(d);
    }
    out
}

/// Bilinear sample at continuous source coordinates, clamped to the image edges.
pub(crate) fn sample_bilinear(img: &DecodedFrame, u: f64, v: f64) -> PremulRgba8 {
    let max_x = f64::from(img.width - 1);
    let max_y = f64::from(img.height - 1);
    let u = u.clamp(0.0, max_x);
    let v = v.clamp(0.0, max_y);

    let x0 = u.floor() as u32;
    let y0 = v.floor() as u32;
    let x1 = (x0 + 1).min(img.width - 1);
    let y1 = (y0 + 1).min(img.height - 1);
    let fx = u - f64::from(x0);
    let fy = v - f64::from(y0);

    let p00 = img.px(x0, y0);
    let p10 = img.px(x1, y0);
    let p01 = img.px(x0, y1);
    let p11 = img.px(x1, y1);

    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = f64::from(p00[i]) + (f64::from(p10[i]) - f64::from(p00[i])) * fx;
        let bot = f64::from(p01[i]) + (f64::from(p11[i]) - f64::from(p01[i])) * fx;
        out[i] = (top + (bot - top) * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Draw `img` scaled into `dest` over a `width * height` premultiplied buffer.
///
/// Only pixels whose centers fall inside `dest` are touched.
pub(crate) fn draw_scaled(
    buf: &mut [u8],
    width: u32,
    height: u32,
    img: &DecodedFrame,
    dest: Rect,
    opacity: f32,
) {
    let coverage = unit_to_u8(opacity);
    if coverage == 0 || img.width == 0 || img.height == 0 || dest.width() <= 0.0 || dest.height() <= 0.0 {
        return;
    }
    let sx = f64::from(img.width) / dest.width();
    let sy = f64::from(img.height) / dest.height();

    let col_start = (dest.x0 - 0.5).ceil().max(0.0) as u32;
    let col_end = ((dest.x1 - 0.5).ceil().max(0.0) as u32).min(width);
    let row_start = (dest.y0 - 0.5).ceil().max(0.0) as u32;
    let row_end = ((dest.y1 - 0.5).ceil().max(0.0) as u32).min(height);

    for y in row_start..row_end {
        let v = (f64::from(y) + 0.5 - dest.y0) * sy - 0.5;
        let row = (y as usize) * (width as usize) * 4;
        for x in col_start..col_end {
            let u = (f64::from(x) + 0.5 - dest.x0) * sx - 0.5;
            let i = row + (x as usize) * 4;
            let src = sample_bilinear(img, u, v);
            let dst = [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]];
            buf[i..i + 4].copy_from_slice(&over(dst, src, coverage));
        }
    }
}
