//! Draws the selected flipbook frame onto the injected surface.
//!
//! Each call first resolves what would be drawn (selected frame, fallback, crossfade partner),
//! then compares that plan with the previous one. Identical plans on an unchanged viewport skip
//! the draw entirely, so the renderer can be called every tick without repainting every tick.

use std::sync::Arc;

use crate::{
    assets::{decode::DecodedFrame, store::FrameStore},
    foundation::core::{Rgba8Premul, Viewport},
    foundation::error::ReelResult,
    render::{geometry::cover_fit, surface::RenderSurface},
    scroll::select::FrameSelection,
};

/// Renderer tuning.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderOpts {
    /// Extra cover-fit scale to hide rounding gaps at the edges.
    pub cover_margin: f64,
    /// Blend toward the next frame by the selection's blend factor.
    pub crossfade: bool,
    /// Straight RGBA painted under every frame and used as the static placeholder.
    pub clear_rgba: [u8; 4],
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            cover_margin: 1.05,
            crossfade: true,
            clear_rgba: [0, 0, 0, 255],
        }
    }
}

/// What a render call did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderOutcome {
    /// Selected frame drawn, optionally blended toward `blended_with`.
    Drawn {
        /// Selected frame.
        index: usize,
        /// Crossfade partner, when blending.
        blended_with: Option<usize>,
    },
    /// Selected frame unavailable; the last good frame was drawn instead.
    Fallback {
        /// Frame the selection asked for.
        requested: usize,
        /// Frame actually on the surface.
        drawn: usize,
    },
    /// Nothing drawable yet (or empty sequence); the surface shows the clear color.
    Placeholder,
    /// Plan and viewport identical to the previous draw.
    Unchanged,
    /// No surface attached; retried once one is.
    Deferred,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Base {
    Frame(usize),
    Placeholder,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct DrawPlan {
    base: Base,
    /// `(index, blend bits)` of the crossfade partner.
    overlay: Option<(usize, u64)>,
    viewport: Viewport,
}

/// Cover-fit flipbook renderer over an injected surface.
pub struct FrameRenderer<S> {
    opts: RenderOpts,
    surface: Option<S>,
    last_plan: Option<DrawPlan>,
    last_selection: Option<FrameSelection>,
    last_good: Option<(usize, Arc<DecodedFrame>)>,
    pending: bool,
}

impl<S: RenderSurface> FrameRenderer<S> {
    /// Renderer without a surface; draws are deferred until one is attached.
    pub fn new(opts: RenderOpts) -> Self {
        Self {
            opts,
            surface: None,
            last_plan: None,
            last_selection: None,
            last_good: None,
            pending: false,
        }
    }

    /// Settings in use.
    pub fn opts(&self) -> &RenderOpts {
        &self.opts
    }

    /// Attach `surface` and force the next render to draw.
    pub fn attach_surface(&mut self, surface: S) {
        self.surface = Some(surface);
        self.last_plan = None;
    }

    /// Take the surface back.
    pub fn detach_surface(&mut self) -> Option<S> {
        self.last_plan = None;
        self.surface.take()
    }

    /// Attached surface, if any.
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// A draw was requested while no surface was attached.
    pub fn has_pending_draw(&self) -> bool {
        self.pending
    }

    /// Selection of the most recent render call.
    pub fn last_selection(&self) -> Option<FrameSelection> {
        self.last_selection
    }

    /// Index of the most recently drawn selected frame.
    pub fn last_good_index(&self) -> Option<usize> {
        self.last_good.as_ref().map(|(i, _)| *i)
    }

    /// Draw `selection`, falling back to the last good frame (or the first frame, before anything
    /// was drawn) when it is unavailable.
    pub fn render(
        &mut self,
        selection: FrameSelection,
        frames: &mut FrameStore,
    ) -> ReelResult<RenderOutcome> {
        self.last_selection = Some(selection);
        let Some(viewport) = self.surface.as_ref().map(|s| s.viewport()) else {
            self.pending = true;
            return Ok(RenderOutcome::Deferred);
        };

        let selected = frames.get(selection.index);
        let fallback = match (&selected, &self.last_good) {
            (Some(_), _) => None,
            (None, Some((i, f))) => Some((*i, Arc::clone(f))),
            // Nothing drawn yet: the first frame doubles as the poster.
            (None, None) => frames.get(0).map(|f| (0, f)),
        };
        let (base, base_frame) = match (&selected, &fallback) {
            (Some(f), _) => (Base::Frame(selection.index), Some(Arc::clone(f))),
            (None, Some((i, f))) => (Base::Frame(*i), Some(Arc::clone(f))),
            (None, None) => (Base::Placeholder, None),
        };

        let overlay = if self.opts.crossfade && selected.is_some() && selection.is_blending() {
            frames
                .get(selection.next_index)
                .map(|f| (selection.next_index, selection.blend, f))
        } else {
            None
        };

        let plan = DrawPlan {
            base,
            overlay: overlay.as_ref().map(|(i, b, _)| (*i, b.to_bits())),
            viewport,
        };
        if self.last_plan == Some(plan) && !self.pending {
            return Ok(RenderOutcome::Unchanged);
        }

        self.paint(base_frame.as_deref(), overlay.as_ref().map(|(_, b, f)| (f.as_ref(), *b)))?;
        self.last_plan = Some(plan);
        self.pending = false;

        let outcome = match (selected, base) {
            (Some(f), _) => {
                self.last_good = Some((selection.index, f));
                RenderOutcome::Drawn {
                    index: selection.index,
                    blended_with: overlay.map(|(i, _, _)| i),
                }
            }
            (None, Base::Frame(drawn)) => {
                tracing::debug!(requested = selection.index, drawn, "drawing last good frame");
                RenderOutcome::Fallback {
                    requested: selection.index,
                    drawn,
                }
            }
            (None, Base::Placeholder) => RenderOutcome::Placeholder,
        };
        Ok(outcome)
    }

    /// Show the static placeholder (used for empty sequences; never selects a frame).
    pub fn render_placeholder(&mut self) -> ReelResult<RenderOutcome> {
        let Some(viewport) = self.surface.as_ref().map(|s| s.viewport()) else {
            self.pending = true;
            return Ok(RenderOutcome::Deferred);
        };
        let plan = DrawPlan {
            base: Base::Placeholder,
            overlay: None,
            viewport,
        };
        if self.last_plan == Some(plan) && !self.pending {
            return Ok(RenderOutcome::Unchanged);
        }
        self.paint(None, None)?;
        self.last_plan = Some(plan);
        self.pending = false;
        Ok(RenderOutcome::Placeholder)
    }

    /// Resize the surface without drawing; the next render repaints. Returns `false` when no
    /// surface is attached.
    pub fn set_viewport(&mut self, viewport: Viewport) -> ReelResult<bool> {
        let Some(surface) = self.surface.as_mut() else {
            return Ok(false);
        };
        if surface.viewport() != viewport {
            surface.resize(viewport)?;
            self.last_plan = None;
        }
        Ok(true)
    }

    /// Resize the surface and immediately redraw the last selection at the new size.
    pub fn resize(
        &mut self,
        viewport: Viewport,
        frames: &mut FrameStore,
    ) -> ReelResult<RenderOutcome> {
        if !self.set_viewport(viewport)? {
            return Ok(RenderOutcome::Deferred);
        }
        self.last_plan = None;
        match self.last_selection {
            Some(sel) if !frames.is_empty() => self.render(sel, frames),
            _ => self.render_placeholder(),
        }
    }

    fn paint(
        &mut self,
        base: Option<&DecodedFrame>,
        overlay: Option<(&DecodedFrame, f64)>,
    ) -> ReelResult<()> {
        let [r, g, b, a] = self.opts.clear_rgba;
        let clear = Rgba8Premul::from_straight_rgba(r, g, b, a);
        let margin = self.opts.cover_margin;
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        let vp = surface.viewport().size();

        surface.clear(clear);
        if let Some(frame) = base {
            surface.draw_image(frame, cover_fit(vp, frame.size(), margin), 1.0)?;
        }
        if let Some((frame, blend)) = overlay {
            surface.draw_image(frame, cover_fit(vp, frame.size(), margin), blend as f32)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
