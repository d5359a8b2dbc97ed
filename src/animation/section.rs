//! Scroll-driven section properties.
//!
//! A [`SectionAnimator`] owns a list of bindings, each a `(target, property, curve)` triple with
//! an optional progress window. Evaluation is pure; [`SectionAnimator::apply`] is the thin adapter
//! that pushes changed values into a host-provided [`PropertySink`].

use crate::{
    animation::curve::Curve,
    foundation::error::{ReelError, ReelResult},
};

/// Animatable presentation property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    /// Opacity in `[0, 1]`.
    Opacity,
    /// Uniform scale factor, never negative.
    Scale,
    /// Horizontal offset in pixels.
    TranslateX,
    /// Vertical offset in pixels.
    TranslateY,
    /// Blur radius in pixels.
    Blur,
}

impl Property {
    /// Stable snake_case name, as used in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Opacity => "opacity",
            Self::Scale => "scale",
            Self::TranslateX => "translate_x",
            Self::TranslateY => "translate_y",
            Self::Blur => "blur",
        }
    }

    /// Clamp a sampled value into the property's legal range.
    fn sanitize(self, v: f64) -> f64 {
        match self {
            Self::Opacity => v.clamp(0.0, 1.0),
            Self::Scale | Self::Blur => v.max(0.0),
            Self::TranslateX | Self::TranslateY => v,
        }
    }
}

/// Sub-range of global progress remapped to local `[0, 1]` for one binding.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProgressWindow {
    /// Global progress mapped to local 0.
    pub start: f64,
    /// Global progress mapped to local 1.
    pub end: f64,
}

impl ProgressWindow {
    /// Window over `[start, end]`; both finite and `start < end`.
    pub fn new(start: f64, end: f64) -> ReelResult<Self> {
        if !start.is_finite() || !end.is_finite() || end <= start {
            return Err(ReelError::validation(
                "progress window requires finite start < end",
            ));
        }
        Ok(Self { start, end })
    }

    /// Local progress for global `progress`, clamped to `[0, 1]`.
    pub fn local(&self, progress: f64) -> f64 {
        ((progress - self.start) / (self.end - self.start)).clamp(0.0, 1.0)
    }
}

/// One animated property of one target.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SectionBinding {
    /// Host-side identifier of the element (e.g. a DOM id).
    pub target: String,
    /// Animated property.
    pub property: Property,
    /// Breakpoint table sampled with global or windowed progress.
    #[serde(rename = "points")]
    pub curve: Curve,
    /// Optional progress window the curve runs in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<ProgressWindow>,
}

impl SectionBinding {
    /// Unwindowed binding.
    pub fn new(target: impl Into<String>, property: Property, curve: Curve) -> Self {
        Self {
            target: target.into(),
            property,
            curve,
            window: None,
        }
    }

    /// Run the curve in `window` local progress instead of global progress.
    pub fn with_window(mut self, window: ProgressWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Sanitized property value at global `progress`.
    pub fn evaluate(&self, progress: f64) -> f64 {
        let p = match &self.window {
            Some(w) => w.local(progress),
            None => progress,
        };
        self.property.sanitize(self.curve.sample(p))
    }
}

/// Evaluated value of one binding.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PropertyValue {
    /// Element the value belongs to.
    pub target: String,
    /// Property written.
    pub property: Property,
    /// Sanitized value.
    pub value: f64,
}

/// Host-side adapter receiving property writes (style bindings, attributes, a scene graph...).
pub trait PropertySink {
    /// Apply one value to `target`.
    fn set_property(&mut self, target: &str, property: Property, value: f64);
}

impl<F> PropertySink for F
where
    F: FnMut(&str, Property, f64),
{
    fn set_property(&mut self, target: &str, property: Property, value: f64) {
        self(target, property, value)
    }
}

/// Collection of independent section bindings.
#[derive(Clone, Debug, Default)]
pub struct SectionAnimator {
    bindings: Vec<SectionBinding>,
    last_written: Vec<Option<f64>>,
}

impl SectionAnimator {
    /// Validate bindings: non-empty targets, valid windows, one binding per target and property.
    pub fn new(bindings: Vec<SectionBinding>) -> ReelResult<Self> {
        for (i, a) in bindings.iter().enumerate() {
            if a.target.trim().is_empty() {
                return Err(ReelError::validation("section binding target must be non-empty"));
            }
            if let Some(w) = a.window {
                ProgressWindow::new(w.start, w.end)?;
            }
            if bindings[..i]
                .iter()
                .any(|b| b.target == a.target && b.property == a.property)
            {
                return Err(ReelError::validation(format!(
                    "duplicate section binding '{}.{}'",
                    a.target,
                    a.property.as_str()
                )));
            }
        }
        let last_written = vec![None; bindings.len()];
        Ok(Self {
            bindings,
            last_written,
        })
    }

    /// Bindings in application order.
    pub fn bindings(&self) -> &[SectionBinding] {
        &self.bindings
    }

    /// No bindings at all.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Pure evaluation of every binding at `progress`.
    pub fn evaluate(&self, progress: f64) -> Vec<PropertyValue> {
        self.bindings
            .iter()
            .map(|b| PropertyValue {
                target: b.target.clone(),
                property: b.property,
                value: b.evaluate(progress),
            })
            .collect()
    }

    /// Look up one binding's value without touching write state.
    pub fn value_of(&self, target: &str, property: Property, progress: f64) -> Option<f64> {
        self.bindings
            .iter()
            .find(|b| b.target == target && b.property == property)
            .map(|b| b.evaluate(progress))
    }

    /// Push values that changed since the previous call into `sink`. Returns the write count.
    pub fn apply(&mut self, progress: f64, sink: &mut dyn PropertySink) -> usize {
        let mut writes = 0;
        for (binding, last) in self.bindings.iter().zip(self.last_written.iter_mut()) {
            let value = binding.evaluate(progress);
            if *last == Some(value) {
                continue;
            }
            sink.set_property(&binding.target, binding.property, value);
            *last = Some(value);
            writes += 1;
        }
        writes
    }

    /// Forget write state so the next `apply` writes every binding.
    pub fn invalidate(&mut self) {
        self.last_written.iter_mut().for_each(|v| *v = None);
    }

    /// Bindings reproducing the hero and "where" sections of the landing page.
    ///
    /// Hero bindings expect raw progress, with overscroll above 1 driving the background shrink
    /// and drift. The "where" container runs in the `[0.5, 1]` window: slide first, then scale.
    pub fn hero_preset() -> ReelResult<Self> {
        let fade_out = || Curve::linear(&[(0.0, 1.0), (0.4, 1.0), (0.5, 0.0)]);
        // 20px per unit of overscroll; holds at 2000px past progress 101.
        let drift = || Curve::linear(&[(1.0, 0.0), (101.0, 2000.0)]);
        let where_window = ProgressWindow::new(0.5, 1.0)?;

        Self::new(vec![
            SectionBinding::new("title", Property::Opacity, fade_out()?),
            SectionBinding::new("subtitle", Property::Opacity, fade_out()?),
            SectionBinding::new(
                "scroll_hint",
                Property::Opacity,
                Curve::linear(&[(0.0, 1.0), (0.0, 0.0)])?,
            ),
            SectionBinding::new(
                "background",
                Property::Blur,
                Curve::linear(&[(0.4, 0.0), (0.5, 30.0), (1.0, 30.0), (1.0, 0.0), (2.0, 30.0)])?,
            ),
            SectionBinding::new(
                "background",
                Property::Scale,
                Curve::linear(&[(1.0, 1.0), (2.0, 0.3)])?,
            ),
            SectionBinding::new("background", Property::TranslateX, drift()?),
            SectionBinding::new("background", Property::TranslateY, drift()?),
            SectionBinding::new(
                "where",
                Property::TranslateY,
                Curve::linear(&[(0.0, 100.0), (0.5, 0.0)])?,
            )
            .with_window(where_window),
            SectionBinding::new(
                "where",
                Property::Scale,
                Curve::linear(&[(0.5, 0.8), (1.0, 1.5)])?,
            )
            .with_window(where_window),
        ])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/section.rs"]
mod tests;
