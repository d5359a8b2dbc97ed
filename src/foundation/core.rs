use crate::foundation::error::{ReelError, ReelResult};

pub use kurbo::{Point, Rect, Size};

/// Visible viewport size in device pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Non-zero viewport.
    pub fn new(width: u32, height: u32) -> ReelResult<Self> {
        if width == 0 || height == 0 {
            return Err(ReelError::validation("viewport width and height must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Size as floating-point geometry.
    pub fn size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// `width * height`, saturating.
    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl std::str::FromStr for Viewport {
    type Err = ReelError;

    /// Parses `WIDTHxHEIGHT`, e.g. `1920x1080`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| ReelError::validation(format!("viewport '{s}' is not WIDTHxHEIGHT")))?;
        let width = w
            .trim()
            .parse::<u32>()
            .map_err(|e| ReelError::validation(format!("viewport width '{w}': {e}")))?;
        let height = h
            .trim()
            .parse::<u32>()
            .map_err(|e| ReelError::validation(format!("viewport height '{h}': {e}")))?;
        Self::new(width, height)
    }
}

/// One coalesced reading of the host's scroll state.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollSample {
    /// Pixels scrolled from the top of the document.
    pub offset: f64,
    /// Viewport at the time of the reading.
    pub viewport: Viewport,
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red, premultiplied.
    pub r: u8,
    /// Green, premultiplied.
    pub g: u8,
    /// Blue, premultiplied.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8Premul {
    /// Premultiply a straight-alpha color.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        use crate::foundation::math::mul_div255_u8;
        Self {
            r: mul_div255_u8(u16::from(r), u16::from(a)),
            g: mul_div255_u8(u16::from(g), u16::from(a)),
            b: mul_div255_u8(u16::from(b), u16::from(a)),
            a,
        }
    }

    /// `[r, g, b, a]` bytes.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
