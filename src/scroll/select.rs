use crate::foundation::error::{ReelError, ReelResult};

/// Discrete frame pick for one progress value.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameSelection {
    /// Frame drawn.
    pub index: usize,
    /// Frame blended toward; equals `index` on the last frame.
    pub next_index: usize,
    /// Weight of `next_index` in `[0, 1)`. Always 0 when `index == next_index`.
    pub blend: f64,
}

impl FrameSelection {
    /// First frame, no blend.
    pub const FIRST: Self = Self {
        index: 0,
        next_index: 0,
        blend: 0.0,
    };

    /// Whether a partner frame contributes.
    pub fn is_blending(&self) -> bool {
        self.index != self.next_index && self.blend > 0.0
    }
}

/// Map progress onto a sequence of `frame_count` frames.
///
/// Progress is clamped to `[0, 1]` first, so overscroll holds the last frame. Fails only for an
/// empty sequence; callers are expected to render a placeholder instead of selecting.
pub fn select(progress: f64, frame_count: usize) -> ReelResult<FrameSelection> {
    if frame_count == 0 {
        return Err(ReelError::validation(
            "cannot select a frame from an empty sequence",
        ));
    }
    if frame_count == 1 {
        return Ok(FrameSelection::FIRST);
    }

    let last = frame_count - 1;
    let p = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let scaled = p * (last as f64);
    let index = (scaled.floor() as usize).min(last);
    let next_index = (index + 1).min(last);
    let blend = if index == next_index {
        0.0
    } else {
        (scaled - index as f64).clamp(0.0, 1.0)
    };

    Ok(FrameSelection {
        index,
        next_index,
        blend,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/select.rs"]
mod tests;
