pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Quantize a unit float to 0..=255 coverage.
pub(crate) fn unit_to_u8(t: f32) -> u8 {
    ((t.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u8
}

pub(crate) fn lerp_f64(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
