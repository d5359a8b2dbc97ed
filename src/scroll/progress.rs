//! Scroll offset to normalized progress.
//!
//! Everything here is pure: the same `(offset, viewport_height)` always maps to the same
//! progress, so positions restored from history render exactly like positions reached by
//! scrolling.

use crate::foundation::error::{ReelError, ReelResult};

/// Map a scroll offset to progress over `viewport_height * distance_multiplier` pixels.
///
/// Never negative. Clamped to `[0, 1]` unless `overscroll_allowed`, in which case values above 1
/// are passed through unchanged. Degenerate distances (zero, negative, non-finite) map to 0.
pub fn progress(
    offset: f64,
    viewport_height: f64,
    distance_multiplier: f64,
    overscroll_allowed: bool,
) -> f64 {
    let distance = viewport_height * distance_multiplier;
    if !distance.is_finite() || distance <= 0.0 || !offset.is_finite() {
        return 0.0;
    }
    let raw = (offset / distance).max(0.0);
    if overscroll_allowed { raw } else { raw.min(1.0) }
}

/// What happens to progress once the scroll distance is exhausted.
#[derive(Clone, Copy, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overscroll {
    /// Progress stops at 1.
    #[default]
    Clamp,
    /// Progress keeps growing past 1, optionally up to `cap`.
    Allow {
        /// Upper bound on progress, at least 1.
        #[serde(default)]
        cap: Option<f64>,
    },
}

/// Configured progress policy: distance multiplier plus overscroll behavior.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProgressMapper {
    /// Scroll distance in viewport heights that maps to progress 1.
    pub distance_multiplier: f64,
    /// Behavior past progress 1.
    pub overscroll: Overscroll,
}

impl Default for ProgressMapper {
    fn default() -> Self {
        Self {
            distance_multiplier: 2.0,
            overscroll: Overscroll::Clamp,
        }
    }
}

impl ProgressMapper {
    /// Validated mapper.
    pub fn new(distance_multiplier: f64, overscroll: Overscroll) -> ReelResult<Self> {
        let out = Self {
            distance_multiplier,
            overscroll,
        };
        out.validate()?;
        Ok(out)
    }

    /// Reject non-positive multipliers and caps below 1.
    pub fn validate(&self) -> ReelResult<()> {
        if !self.distance_multiplier.is_finite() || self.distance_multiplier <= 0.0 {
            return Err(ReelError::validation(
                "progress distance_multiplier must be finite and > 0",
            ));
        }
        if let Overscroll::Allow { cap: Some(cap) } = self.overscroll
            && (!cap.is_finite() || cap < 1.0)
        {
            return Err(ReelError::validation(
                "progress overscroll cap must be finite and >= 1",
            ));
        }
        Ok(())
    }

    /// Progress for `offset` pixels scrolled in a viewport `viewport_height` tall.
    pub fn map(&self, offset: f64, viewport_height: f64) -> f64 {
        match self.overscroll {
            Overscroll::Clamp => progress(offset, viewport_height, self.distance_multiplier, false),
            Overscroll::Allow { cap } => {
                let p = progress(offset, viewport_height, self.distance_multiplier, true);
                cap.map_or(p, |c| p.min(c))
            }
        }
    }

    /// Scroll offset at which progress reaches 1.
    pub fn full_distance(&self, viewport_height: f64) -> f64 {
        viewport_height * self.distance_multiplier
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/progress.rs"]
mod tests;
