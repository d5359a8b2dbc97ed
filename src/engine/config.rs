//! JSON configuration for a scrubber: frame sequence, loader, progress, rendering and sections.

use std::io::Read;

use crate::{
    animation::section::{SectionAnimator, SectionBinding},
    assets::{store::StoreOpts, template::FrameTemplate},
    foundation::error::{ReelError, ReelResult},
    render::renderer::RenderOpts,
    scroll::progress::ProgressMapper,
};

/// Built-in binding sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionPreset {
    /// See [`SectionAnimator::hero_preset`].
    Hero,
}

/// Complete scrubber configuration.
///
/// Only `frames` is required:
///
/// ```json
/// { "frames": { "template": "hero/frame_{index}.webp", "first": 1, "last": 365 } }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReelConfig {
    /// Frame sequence on disk or behind the host's source.
    pub frames: FrameTemplate,
    /// Frames requested eagerly at initialization, frame 0 first.
    #[serde(default = "default_preload")]
    pub preload: usize,
    /// Frames requested ahead of the selected one each tick.
    #[serde(default = "default_lookahead")]
    pub lookahead: usize,
    /// Loader threads and residency budget.
    #[serde(default)]
    pub loader: StoreOpts,
    /// Scroll distance and overscroll handling.
    #[serde(default)]
    pub progress: ProgressMapper,
    /// Cover-fit and crossfade settings.
    #[serde(default)]
    pub render: RenderOpts,
    /// Preset bindings, applied before `sections`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<SectionPreset>,
    /// Extra bindings, applied after the preset.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<SectionBinding>,
}

fn default_preload() -> usize {
    5
}

fn default_lookahead() -> usize {
    3
}

impl ReelConfig {
    /// Minimal configuration for a frame sequence, everything else defaulted.
    pub fn for_frames(frames: FrameTemplate) -> Self {
        Self {
            frames,
            preload: default_preload(),
            lookahead: default_lookahead(),
            loader: StoreOpts::default(),
            progress: ProgressMapper::default(),
            render: RenderOpts::default(),
            preset: None,
            sections: Vec::new(),
        }
    }

    /// Parse and validate JSON text.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate JSON from a reader.
    pub fn from_reader(r: impl Read) -> ReelResult<Self> {
        let cfg: Self = serde_json::from_reader(r)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every nested setting and the combined section bindings.
    pub fn validate(&self) -> ReelResult<()> {
        self.frames.validate()?;
        self.progress.validate()?;
        if self.loader.threads == 0 {
            return Err(ReelError::validation("loader.threads must be > 0"));
        }
        if self.loader.max_resident == Some(0) {
            return Err(ReelError::validation("loader.max_resident must be > 0 when set"));
        }
        if let Some(max) = self.loader.max_resident {
            // Selected, next and lookahead frames must all fit at once.
            let needed = self.lookahead + 2;
            if max < needed {
                return Err(ReelError::validation(format!(
                    "loader.max_resident ({max}) must hold at least lookahead + 2 ({needed}) frames"
                )));
            }
        }
        let m = self.render.cover_margin;
        if !m.is_finite() || m < 1.0 {
            return Err(ReelError::validation("render.cover_margin must be finite and >= 1"));
        }
        // Rejects duplicate (target, property) pairs across preset and custom bindings.
        self.section_animator()?;
        Ok(())
    }

    /// Preset bindings followed by the configured ones.
    pub fn section_animator(&self) -> ReelResult<SectionAnimator> {
        let mut bindings = match self.preset {
            Some(SectionPreset::Hero) => SectionAnimator::hero_preset()?.bindings().to_vec(),
            None => Vec::new(),
        };
        bindings.extend(self.sections.iter().cloned());
        SectionAnimator::new(bindings)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/config.rs"]
mod tests;
