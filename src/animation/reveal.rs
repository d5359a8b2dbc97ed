/// One-shot "fade in when scrolled into view" latch.
///
/// Flips to revealed the first time the visible fraction of an element reaches `threshold` and
/// never flips back, so sections do not re-hide on scroll-up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealLatch {
    threshold: f64,
    revealed: bool,
}

impl Default for RevealLatch {
    fn default() -> Self {
        Self::new(0.15)
    }
}

impl RevealLatch {
    /// Latch revealing at `threshold` visible fraction, clamped to `[0, 1]`. Non-finite means 0.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: if threshold.is_finite() {
                threshold.clamp(0.0, 1.0)
            } else {
                0.0
            },
            revealed: false,
        }
    }

    /// Feed the current visible ratio. Returns `true` only on the observation that reveals.
    pub fn observe(&mut self, visible_ratio: f64) -> bool {
        if self.revealed {
            return false;
        }
        // A zero ratio never reveals, even with a zero threshold.
        if visible_ratio > 0.0 && visible_ratio >= self.threshold {
            self.revealed = true;
            return true;
        }
        false
    }

    /// Whether the latch has flipped.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }
}

/// Fraction of `[top, top + height)` that overlaps `[0, viewport_height)`.
pub fn visible_ratio(top: f64, height: f64, viewport_height: f64) -> f64 {
    if height <= 0.0 || viewport_height <= 0.0 {
        return 0.0;
    }
    let overlap = (top + height).min(viewport_height) - top.max(0.0);
    (overlap / height).clamp(0.0, 1.0)
}
