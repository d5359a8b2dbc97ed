//! Scroll-synchronized scrubber: the single owner of loader, sampler, renderer and sections.
//!
//! Lifecycle is explicit. [`Scrubber::new`] (or [`Scrubber::from_config`]) initializes the frame
//! store and starts preloading; the host forwards scroll and resize notifications and calls
//! [`Scrubber::tick`] whenever a requested animation frame fires; [`Scrubber::teardown`] (also run
//! on drop) cancels the outstanding frame request and in-flight loads.
//!
//! Raw events never draw. They are coalesced in a [`ScrollSampler`] and at most one animation
//! frame is outstanding at a time, so any burst of events between two frames costs one draw.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crate::{
    animation::section::{PropertySink, PropertyValue, SectionAnimator},
    assets::{
        source::FrameSource,
        store::{FrameStore, LoadEvent},
    },
    engine::{
        config::ReelConfig,
        scheduler::{FrameRequest, FrameScheduler},
    },
    foundation::core::{ScrollSample, Viewport},
    foundation::error::ReelResult,
    render::{
        renderer::{FrameRenderer, RenderOpts, RenderOutcome},
        surface::RenderSurface,
    },
    scroll::{
        progress::ProgressMapper,
        sampler::ScrollSampler,
        select::{FrameSelection, select},
    },
};

/// Scrubber tuning outside the frame store itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrubberOpts {
    /// Offset to progress mapping.
    pub progress: ProgressMapper,
    /// Drawing settings.
    pub render: RenderOpts,
    /// Frames requested at initialization, frame 0 first.
    pub preload: usize,
    /// Frames requested ahead of the selected one each tick.
    pub lookahead: usize,
}

impl Default for ScrubberOpts {
    fn default() -> Self {
        Self {
            progress: ProgressMapper::default(),
            render: RenderOpts::default(),
            preload: 5,
            lookahead: 3,
        }
    }
}

impl From<&ReelConfig> for ScrubberOpts {
    fn from(cfg: &ReelConfig) -> Self {
        Self {
            progress: cfg.progress,
            render: cfg.render,
            preload: cfg.preload,
            lookahead: cfg.lookahead,
        }
    }
}

/// What one tick did. Passed to the observer and returned from [`Scrubber::tick`].
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    /// Scroll state the tick drew.
    pub sample: ScrollSample,
    /// Progress mapped from `sample`.
    pub progress: f64,
    /// `None` for an empty sequence.
    pub selection: Option<FrameSelection>,
    /// What the renderer did.
    pub outcome: RenderOutcome,
    /// Section properties written to the sink.
    pub section_writes: usize,
    /// Raw scroll/resize events folded into this tick.
    pub coalesced_events: u64,
    /// Load completions applied this tick.
    pub loads: Vec<LoadEvent>,
    /// Frame 0 has not settled yet.
    pub loading: bool,
}

/// Side-effect-free evaluation at one scroll offset.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Probe {
    /// Scroll offset evaluated.
    pub offset: f64,
    /// Progress at `offset`.
    pub progress: f64,
    /// Selected frame, `None` for an empty sequence.
    pub frame: Option<FrameSelection>,
    /// Asset path of the selected frame.
    pub path: Option<String>,
    /// Every section binding's value at `progress`.
    pub sections: Vec<PropertyValue>,
}

type Observer = Box<dyn FnMut(&TickReport)>;

/// Scroll-driven flipbook: frame store, sampler, renderer and section animations behind
/// one lifecycle.
///
/// Generic over the drawing surface `S` and the host frame clock `F`.
pub struct Scrubber<S: RenderSurface, F: FrameScheduler> {
    frames: FrameStore,
    sampler: ScrollSampler,
    mapper: ProgressMapper,
    renderer: FrameRenderer<S>,
    sections: SectionAnimator,
    scheduler: F,
    scheduled: Option<FrameRequest>,
    lookahead: usize,
    redraw: bool,
    /// Completions applied outside `tick` (headless waits), reported by the next tick.
    early_loads: Vec<LoadEvent>,
    observer: Option<Observer>,
    torn_down: bool,
}

impl<S: RenderSurface, F: FrameScheduler> Scrubber<S, F> {
    /// Take ownership of an initialized store, start preloading and request the first frame.
    #[tracing::instrument(skip_all, fields(frames = frames.len(), viewport = %viewport))]
    pub fn new(
        mut frames: FrameStore,
        sections: SectionAnimator,
        scheduler: F,
        viewport: Viewport,
        opts: ScrubberOpts,
    ) -> ReelResult<Self> {
        opts.progress.validate()?;
        let queued = frames.preload(opts.preload);
        tracing::debug!(queued, "preload started");

        let mut out = Self {
            frames,
            sampler: ScrollSampler::new(viewport),
            mapper: opts.progress,
            renderer: FrameRenderer::new(opts.render),
            sections,
            scheduler,
            scheduled: None,
            lookahead: opts.lookahead,
            redraw: true,
            early_loads: Vec::new(),
            observer: None,
            torn_down: false,
        };
        out.schedule();
        Ok(out)
    }

    /// Build the store and sections from a validated [`ReelConfig`], then behave as
    /// [`Self::new`].
    pub fn from_config(
        cfg: &ReelConfig,
        source: Arc<dyn FrameSource>,
        scheduler: F,
        viewport: Viewport,
    ) -> ReelResult<Self> {
        cfg.validate()?;
        let frames = FrameStore::initialize(&cfg.frames, source, cfg.loader)?;
        Self::new(
            frames,
            cfg.section_animator()?,
            scheduler,
            viewport,
            ScrubberOpts::from(cfg),
        )
    }

    /// Frame store.
    pub fn frames(&self) -> &FrameStore {
        &self.frames
    }

    /// Renderer and its last drawn selection.
    pub fn renderer(&self) -> &FrameRenderer<S> {
        &self.renderer
    }

    /// Attached surface, if any.
    pub fn surface(&self) -> Option<&S> {
        self.renderer.surface()
    }

    /// Section bindings.
    pub fn sections(&self) -> &SectionAnimator {
        &self.sections
    }

    /// Host frame clock.
    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    /// Mutable host frame clock, for firing requests in headless hosts.
    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    /// Outstanding animation-frame request, if any.
    pub fn scheduled(&self) -> Option<FrameRequest> {
        self.scheduled
    }

    /// Whether [`Self::teardown`] has run.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Progress for the latest recorded scroll state.
    pub fn current_progress(&self) -> f64 {
        let s = self.sampler.peek();
        self.mapper.map(s.offset, f64::from(s.viewport.height))
    }

    /// Called when the observer should see every tick (tests, diagnostics, the CLI).
    pub fn set_observer(&mut self, observer: impl FnMut(&TickReport) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Record a scroll notification. Requests an animation frame if none is outstanding.
    pub fn on_scroll(&mut self, offset: f64) {
        if self.torn_down {
            return;
        }
        if self.sampler.record_scroll(offset) {
            self.schedule();
        }
    }

    /// Record a viewport change. The next tick redraws at the new size.
    pub fn on_resize(&mut self, viewport: Viewport) {
        if self.torn_down {
            return;
        }
        if self.sampler.record_resize(viewport) {
            self.schedule();
        }
    }

    /// Attach the drawing surface. The next tick draws onto it at the current viewport.
    pub fn attach_surface(&mut self, surface: S) {
        if self.torn_down {
            return;
        }
        self.renderer.attach_surface(surface);
        self.redraw = true;
        self.schedule();
    }

    /// Take the surface back; later ticks report [`RenderOutcome::Deferred`].
    pub fn detach_surface(&mut self) -> Option<S> {
        self.renderer.detach_surface()
    }

    /// Process one animation frame.
    ///
    /// Applies finished loads, drains the coalesced scroll state, selects and draws a frame,
    /// requests the frames around it and pushes changed section properties into `sink`.
    /// Returns `None` when nothing changed since the previous tick.
    pub fn tick(&mut self, sink: &mut dyn PropertySink) -> ReelResult<Option<TickReport>> {
        self.scheduled = None;
        if self.torn_down {
            return Ok(None);
        }

        let mut loads = std::mem::take(&mut self.early_loads);
        loads.extend(self.frames.pump());
        let input = self.sampler.take();
        let redraw = std::mem::take(&mut self.redraw);
        if input.is_none() && loads.is_empty() && !redraw {
            self.keep_pumping();
            return Ok(None);
        }

        let (sample, coalesced_events) = match input {
            Some(i) => (i.sample, i.events),
            None => (self.sampler.peek(), 0),
        };
        let progress = self.mapper.map(sample.offset, f64::from(sample.viewport.height));
        self.renderer.set_viewport(sample.viewport)?;

        let (selection, outcome) = if self.frames.is_empty() {
            (None, self.renderer.render_placeholder()?)
        } else {
            let sel = select(progress, self.frames.len())?;
            self.request_around(sel);
            (Some(sel), self.renderer.render(sel, &mut self.frames)?)
        };
        let section_writes = self.sections.apply(progress, sink);
        self.keep_pumping();

        let report = TickReport {
            sample,
            progress,
            selection,
            outcome,
            section_writes,
            coalesced_events,
            loads,
            loading: self.frames.is_loading(),
        };
        tracing::debug!(
            offset = sample.offset,
            progress,
            index = selection.map(|s| s.index),
            outcome = ?report.outcome,
            section_writes,
            "tick"
        );
        if let Some(observer) = self.observer.as_mut() {
            observer(&report);
        }
        Ok(Some(report))
    }

    /// Headless driver: run scheduled frames back to back until none is requested, blocking for
    /// in-flight loads in between instead of waiting on the host's frame clock.
    ///
    /// Each outstanding request is cancelled with the scheduler before its tick runs. Stops early
    /// (with a warning) once `timeout` elapses.
    pub fn run_until_idle(
        &mut self,
        timeout: Duration,
        sink: &mut dyn PropertySink,
    ) -> ReelResult<Vec<TickReport>> {
        let deadline = Instant::now() + timeout;
        let mut reports = Vec::new();
        while let Some(req) = self.scheduled {
            self.scheduler.cancel_frame(req);
            if self.frames.has_in_flight() {
                let left = deadline.saturating_duration_since(Instant::now());
                let events = self.frames.pump_until(left, |f| !f.has_in_flight());
                self.early_loads.extend(events);
            }
            if let Some(report) = self.tick(sink)? {
                reports.push(report);
            }
            if Instant::now() >= deadline {
                tracing::warn!(?timeout, "stopped before the scrubber went idle");
                break;
            }
        }
        Ok(reports)
    }

    /// Evaluate progress, frame and section values at `offset` without touching any state.
    pub fn probe(&self, offset: f64, viewport: Viewport) -> ReelResult<Probe> {
        let progress = self.mapper.map(offset, f64::from(viewport.height));
        let frame = if self.frames.is_empty() {
            None
        } else {
            Some(select(progress, self.frames.len())?)
        };
        Ok(Probe {
            offset,
            progress,
            frame,
            path: frame
                .and_then(|f| self.frames.path(f.index))
                .map(str::to_owned),
            sections: self.sections.evaluate(progress),
        })
    }

    /// Cancel the scheduled frame and in-flight loads, detach and return the surface.
    ///
    /// Idempotent. Events and ticks after teardown are ignored.
    pub fn teardown(&mut self) -> Option<S> {
        if self.torn_down {
            return None;
        }
        self.torn_down = true;
        if let Some(req) = self.scheduled.take() {
            self.scheduler.cancel_frame(req);
        }
        self.frames.shutdown();
        self.observer = None;
        tracing::debug!("scrubber torn down");
        self.renderer.detach_surface()
    }

    fn schedule(&mut self) {
        if self.scheduled.is_none() && !self.torn_down {
            self.scheduled = Some(self.scheduler.request_frame());
        }
    }

    /// Loads complete off-thread; keep ticking while any are outstanding so they get drawn.
    fn keep_pumping(&mut self) {
        if self.frames.has_in_flight() {
            self.schedule();
        }
    }

    fn request_around(&mut self, sel: FrameSelection) {
        self.frames.request(sel.index);
        self.frames.request(sel.next_index);
        let end = sel
            .index
            .saturating_add(self.lookahead)
            .min(self.frames.len().saturating_sub(1));
        for i in sel.index + 1..=end {
            self.frames.request(i);
        }
    }
}

impl<S: RenderSurface, F: FrameScheduler> Drop for Scrubber<S, F> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/scrubber.rs"]
mod tests;
