use crate::foundation::core::{ScrollSample, Viewport};

/// Coalesces raw scroll/resize notifications into at most one sample per tick.
///
/// Hosts forward every event; the sampler only remembers the most recent offset and viewport.
/// `take` hands out the coalesced state once and then reports nothing until another event
/// arrives.
#[derive(Clone, Debug)]
pub struct ScrollSampler {
    offset: f64,
    viewport: Viewport,
    dirty: bool,
    resized: bool,
    coalesced: u64,
}

/// Result of draining the sampler for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickInput {
    /// Latest offset and viewport.
    pub sample: ScrollSample,
    /// Viewport changed since the previous tick.
    pub resized: bool,
    /// Raw events folded into this sample.
    pub events: u64,
}

impl ScrollSampler {
    /// Sampler at offset 0. Starts dirty so the first tick draws.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            offset: 0.0,
            viewport,
            dirty: true,
            resized: true,
            coalesced: 0,
        }
    }

    /// Record a scroll event. Returns `true` if this is the first event since the last tick,
    /// i.e. the host should request an animation frame.
    pub fn record_scroll(&mut self, offset: f64) -> bool {
        self.offset = if offset.is_finite() { offset } else { 0.0 };
        self.mark()
    }

    /// Record a viewport change. Same return contract as [`Self::record_scroll`].
    pub fn record_resize(&mut self, viewport: Viewport) -> bool {
        if viewport != self.viewport {
            self.viewport = viewport;
            self.resized = true;
        }
        self.mark()
    }

    fn mark(&mut self) -> bool {
        self.coalesced += 1;
        let first = !self.dirty;
        self.dirty = true;
        first
    }

    /// Events arrived since the last `take`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Latest state without consuming it.
    pub fn peek(&self) -> ScrollSample {
        ScrollSample {
            offset: self.offset,
            viewport: self.viewport,
        }
    }

    /// Drain the coalesced state for this tick.
    pub fn take(&mut self) -> Option<TickInput> {
        if !self.dirty {
            return None;
        }
        let out = TickInput {
            sample: self.peek(),
            resized: self.resized,
            events: self.coalesced,
        };
        self.dirty = false;
        self.resized = false;
        self.coalesced = 0;
        Some(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/sampler.rs"]
mod tests;
