use crate::foundation::error::{ReelError, ReelResult};

const PLACEHOLDER: &str = "{index}";

/// Upper bound on frames in one sequence. Paths are built eagerly at store initialization.
pub const MAX_FRAMES: usize = 100_000;

/// Zero-padded frame path pattern, e.g. `frames/frame_{index}.webp` with width 4.
///
/// A run of `#` is accepted in place of `{index}` and its length becomes the pad width
/// (`frames/frame_####.webp`).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameTemplate {
    /// Path pattern containing `{index}` or a run of `#`.
    pub template: String,
    /// First frame number on disk (inclusive).
    pub first: u32,
    /// Last frame number on disk (inclusive).
    pub last: u32,
    /// Zero-pad width of the substituted number.
    #[serde(default = "default_pad")]
    pub pad: usize,
}

fn default_pad() -> usize {
    4
}

impl FrameTemplate {
    /// Build and validate a template.
    pub fn new(template: impl Into<String>, first: u32, last: u32, pad: usize) -> ReelResult<Self> {
        let out = Self {
            template: template.into(),
            first,
            last,
            pad,
        };
        out.validate()?;
        Ok(out)
    }

    /// Infer a template from one concrete frame file name such as `seq/frame_0001.webp`.
    ///
    /// The trailing digit run of the file stem becomes the index; its length the pad width.
    pub fn from_sample(sample: &str, last: u32) -> ReelResult<Self> {
        let (dir, file) = match sample.rfind('/') {
            Some(i) => (&sample[..=i], &sample[i + 1..]),
            None => ("", sample),
        };
        let (stem, ext) = match file.rfind('.') {
            Some(i) => (&file[..i], &file[i..]),
            None => (file, ""),
        };
        let digits = stem.len() - stem.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return Err(ReelError::validation(format!(
                "sample frame '{sample}' has no trailing frame number"
            )));
        }
        let prefix = &stem[..stem.len() - digits];
        let number = &stem[stem.len() - digits..];
        let first = number
            .parse::<u32>()
            .map_err(|e| ReelError::validation(format!("frame number '{number}': {e}")))?;

        Self::new(format!("{dir}{prefix}{PLACEHOLDER}{ext}"), first, last, digits)
    }

    /// Reject inverted ranges, oversized sequences, pad widths above 12 and patterns without a
    /// placeholder.
    pub fn validate(&self) -> ReelResult<()> {
        if self.first > self.last {
            return Err(ReelError::validation("frame template first must be <= last"));
        }
        if self.frame_count() > MAX_FRAMES {
            return Err(ReelError::validation(format!(
                "frame template covers {} frames, at most {MAX_FRAMES} are supported",
                self.frame_count()
            )));
        }
        if self.pad > 12 {
            return Err(ReelError::validation("frame template pad must be <= 12"));
        }
        if !self.template.contains(PLACEHOLDER) && hash_run(&self.template).is_none() {
            return Err(ReelError::validation(format!(
                "frame template '{}' needs a {PLACEHOLDER} placeholder or a '#' run",
                self.template
            )));
        }
        Ok(())
    }

    /// Frames in `first..=last`. Never zero for a valid template.
    pub fn frame_count(&self) -> usize {
        usize::try_from(self.last.saturating_sub(self.first))
            .map_or(usize::MAX, |span| span.saturating_add(1))
    }

    /// Path of the frame at sequence position `index` (0-based).
    pub fn path_for(&self, index: usize) -> String {
        let number = u64::from(self.first) + index as u64;
        if self.template.contains(PLACEHOLDER) {
            let padded = format!("{number:0width$}", width = self.pad);
            return self.template.replace(PLACEHOLDER, &padded);
        }
        match hash_run(&self.template) {
            Some((start, len)) => {
                let padded = format!("{number:0len$}");
                format!(
                    "{}{}{}",
                    &self.template[..start],
                    padded,
                    &self.template[start + len..]
                )
            }
            None => self.template.clone(),
        }
    }

    /// Every frame path in sequence order.
    pub fn paths(&self) -> Vec<String> {
        (0..self.frame_count()).map(|i| self.path_for(i)).collect()
    }
}

/// Byte offset and length of the last run of `#` in `s`.
fn hash_run(s: &str) -> Option<(usize, usize)> {
    let end = s.rfind('#')? + 1;
    let start = s[..end].trim_end_matches('#').len();
    Some((start, end - start))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/template.rs"]
mod tests;
