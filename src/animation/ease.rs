/// Segment easing, named after the tween vocabulary page authors already use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// No easing.
    #[default]
    #[serde(rename = "none", alias = "linear")]
    Linear,
    /// Quadratic in.
    #[serde(rename = "power1.in")]
    Power1In,
    /// Quadratic out.
    #[serde(rename = "power1.out")]
    Power1Out,
    /// Quadratic in-out.
    #[serde(rename = "power1.inOut")]
    Power1InOut,
    /// Cubic in.
    #[serde(rename = "power2.in")]
    Power2In,
    /// Cubic out.
    #[serde(rename = "power2.out")]
    Power2Out,
    /// Cubic in-out.
    #[serde(rename = "power2.inOut")]
    Power2InOut,
    /// Quartic in.
    #[serde(rename = "power3.in")]
    Power3In,
    /// Quartic out.
    #[serde(rename = "power3.out")]
    Power3Out,
    /// Quartic in-out.
    #[serde(rename = "power3.inOut")]
    Power3InOut,
    /// Half cosine.
    #[serde(rename = "sine.inOut")]
    SineInOut,
}

impl Ease {
    /// Evaluate at `t`, clamped to `[0, 1]`. Every variant maps 0 to 0 and 1 to 1.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Power1In => power_in(t, 2),
            Self::Power1Out => power_out(t, 2),
            Self::Power1InOut => power_in_out(t, 2),
            Self::Power2In => power_in(t, 3),
            Self::Power2Out => power_out(t, 3),
            Self::Power2InOut => power_in_out(t, 3),
            Self::Power3In => power_in(t, 4),
            Self::Power3Out => power_out(t, 4),
            Self::Power3InOut => power_in_out(t, 4),
            Self::SineInOut => -((std::f64::consts::PI * t).cos() - 1.0) / 2.0,
        }
    }
}

fn power_in(t: f64, exp: i32) -> f64 {
    t.powi(exp)
}

fn power_out(t: f64, exp: i32) -> f64 {
    1.0 - (1.0 - t).powi(exp)
}

fn power_in_out(t: f64, exp: i32) -> f64 {
    if t < 0.5 {
        power_in(2.0 * t, exp) / 2.0
    } else {
        1.0 - power_in(2.0 - 2.0 * t, exp) / 2.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
