use crate::foundation::core::{Rect, Size};

/// Destination rect that scales `image` to cover `viewport`, centered, aspect preserved.
///
/// `margin` multiplies the cover scale (e.g. `1.05`) so rounding never leaves an unpainted edge;
/// values below 1 are treated as 1 because they would uncover the viewport.
pub fn cover_fit(viewport: Size, image: Size, margin: f64) -> Rect {
    if image.width <= 0.0 || image.height <= 0.0 {
        return Rect::from_origin_size((0.0, 0.0), viewport);
    }
    let margin = if margin.is_finite() { margin.max(1.0) } else { 1.0 };
    let scale = (viewport.width / image.width).max(viewport.height / image.height) * margin;
    let w = image.width * scale;
    let h = image.height * scale;
    let x = (viewport.width - w) / 2.0;
    let y = (viewport.height - h) / 2.0;
    Rect::from_origin_size((x, y), (w, h))
}

/// True if `dest` contains the whole `viewport` rect.
pub fn covers(dest: Rect, viewport: Size) -> bool {
    const EPS: f64 = 1e-9;
    dest.x0 <= EPS && dest.y0 <= EPS && dest.x1 >= viewport.width - EPS && dest.y1 >= viewport.height - EPS
}

#[cfg(test)]
#[path = "../../tests/unit/render/geometry.rs"]
mod tests;
