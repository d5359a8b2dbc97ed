use crate::{
    animation::ease::Ease,
    foundation::error::{ReelError, ReelResult},
    foundation::math::lerp_f64,
};

/// One `(progress threshold -> value)` entry of a breakpoint table.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Breakpoint {
    /// Progress threshold.
    pub at: f64,
    /// Value reached at `at`.
    pub value: f64,
    /// Easing applied on the segment that starts at this point.
    #[serde(default)]
    pub ease: Ease,
}

impl Breakpoint {
    /// Linear breakpoint.
    pub const fn new(at: f64, value: f64) -> Self {
        Self {
            at,
            value,
            ease: Ease::Linear,
        }
    }

    /// Breakpoint whose outgoing segment uses `ease`.
    pub const fn eased(at: f64, value: f64, ease: Ease) -> Self {
        Self { at, value, ease }
    }
}

/// Piecewise-linear curve over progress, clamped to its end values outside the table.
///
/// Two points sharing a threshold form a step: at exactly that threshold the earlier point wins,
/// anything past it takes the later one. This is how "visible only at progress 0" is expressed.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<Breakpoint>", into = "Vec<Breakpoint>")]
pub struct Curve {
    points: Vec<Breakpoint>,
}

impl Curve {
    /// Validate and wrap a breakpoint table.
    ///
    /// Points must be non-empty, finite and sorted by threshold. Equal thresholds are allowed and
    /// form a step.
    pub fn new(points: Vec<Breakpoint>) -> ReelResult<Self> {
        if points.is_empty() {
            return Err(ReelError::validation("curve needs at least one breakpoint"));
        }
        if points.iter().any(|p| !p.at.is_finite() || !p.value.is_finite()) {
            return Err(ReelError::validation("curve breakpoints must be finite"));
        }
        if !points.windows(2).all(|w| w[0].at <= w[1].at) {
            return Err(ReelError::validation(
                "curve breakpoints must be sorted by threshold",
            ));
        }
        Ok(Self { points })
    }

    /// Convenience for tables without easing.
    pub fn linear(pairs: &[(f64, f64)]) -> ReelResult<Self> {
        Self::new(pairs.iter().map(|&(at, v)| Breakpoint::new(at, v)).collect())
    }

    /// Curve that yields `value` everywhere.
    pub fn constant(value: f64) -> Self {
        Self {
            points: vec![Breakpoint::new(0.0, value)],
        }
    }

    /// Breakpoints in threshold order.
    pub fn points(&self) -> &[Breakpoint] {
        &self.points
    }

    /// Value at `progress`. NaN samples the first point.
    pub fn sample(&self, progress: f64) -> f64 {
        let first = &self.points[0];
        let last = &self.points[self.points.len() - 1];
        if progress.is_nan() || progress <= first.at {
            return first.value;
        }
        if progress >= last.at {
            return last.value;
        }

        // first.at < progress < last.at, so 1 <= idx < len.
        let idx = self.points.partition_point(|p| p.at < progress);
        let a = &self.points[idx - 1];
        let b = &self.points[idx];
        let span = b.at - a.at;
        if span <= 0.0 {
            return b.value;
        }
        let t = a.ease.apply((progress - a.at) / span);
        lerp_f64(a.value, b.value, t)
    }
}

impl TryFrom<Vec<Breakpoint>> for Curve {
    type Error = ReelError;

    fn try_from(points: Vec<Breakpoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<Curve> for Vec<Breakpoint> {
    fn from(curve: Curve) -> Self {
        curve.points
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/curve.rs"]
mod tests;
