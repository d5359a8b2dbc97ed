//! Scrollreel drives a pre-rendered image sequence (a flipbook) from the page's scroll position.
//!
//! As the reader scrolls through the hero region, a normalized progress value picks one frame
//! of the sequence and draws it cover-fitted onto a host-provided surface. The same progress
//! drives declarative section animations (opacity, scale, offset, blur) through breakpoint
//! curves, and a small set of helpers covers the gallery crossfade and one-shot reveal effects.
//!
//! # Pipeline overview
//!
//! 1. **Sample**: scroll/resize notifications are coalesced into one [`ScrollSample`] per
//!    animation frame ([`ScrollSampler`]).
//! 2. **Map**: `offset -> progress` ([`ProgressMapper`]), `progress -> frame` ([`select`]).
//! 3. **Load**: frames decode off-thread in a [`FrameStore`]; completions are applied on the
//!    owning thread, never drawn from a worker.
//! 4. **Draw**: [`FrameRenderer`] paints onto a [`RenderSurface`], skipping identical redraws and
//!    falling back to the last good frame when the selected one is unavailable.
//!
//! [`Scrubber`] owns all of the above with explicit initialization and teardown.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Pure math**: progress, selection, curves and cover-fit geometry have no side effects.
//! - **Documented surface**: `missing_docs` is denied.
//! - **Premultiplied RGBA8** on every surface; [`FrameRGBA::to_straight`] converts for export.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod assets;
mod engine;
mod foundation;
mod render;
mod scroll;

pub use animation::curve::{Breakpoint, Curve};
pub use animation::ease::Ease;
pub use animation::gallery::gallery_opacities;
pub use animation::reveal::{RevealLatch, visible_ratio};
pub use animation::section::{
    Property, PropertySink, PropertyValue, ProgressWindow, SectionAnimator, SectionBinding,
};
pub use assets::decode::{DecodedFrame, decode_frame};
pub use assets::source::{FrameSource, FsFrameSource, normalize_rel_path};
pub use assets::store::{FrameState, FrameStore, LoadEvent, StoreOpts};
pub use assets::template::FrameTemplate;
pub use engine::config::{ReelConfig, SectionPreset};
pub use engine::scheduler::{FrameRequest, FrameScheduler, ManualScheduler};
pub use engine::scrubber::{Probe, Scrubber, ScrubberOpts, TickReport};
pub use foundation::core::{Point, Rect, Rgba8Premul, ScrollSample, Size, Viewport};
pub use foundation::error::{ReelError, ReelResult};
pub use render::geometry::{cover_fit, covers};
pub use render::renderer::{FrameRenderer, RenderOpts, RenderOutcome};
pub use render::surface::{CpuSurface, FrameRGBA, RenderSurface};
pub use scroll::progress::{Overscroll, ProgressMapper, progress};
pub use scroll::sampler::{ScrollSampler, TickInput};
pub use scroll::select::{FrameSelection, select};
