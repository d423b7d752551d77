use crate::foundation::error::{KitError, KitResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Largest frame width produced by [`Canvas::for_container`].
pub const MAX_FRAME_WIDTH: u32 = 400;

/// Horizontal breathing room reserved around the frame inside its container.
const CONTAINER_GUTTER: u32 = 40;

/// Output frame dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: MAX_FRAME_WIDTH,
            height: MAX_FRAME_WIDTH * 6 / 5,
        }
    }
}

impl Canvas {
    /// Build a canvas, rejecting zero-sized or oversized frames.
    pub fn new(width: u32, height: u32) -> KitResult<Self> {
        if width == 0 || height == 0 {
            return Err(KitError::validation("canvas width and height must be > 0"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(KitError::validation(
                "canvas width and height must fit in u16",
            ));
        }
        Ok(Self { width, height })
    }

    /// Size the frame for a container of `container_width` pixels.
    ///
    /// The frame keeps a 5:6 aspect and never exceeds [`MAX_FRAME_WIDTH`].
    pub fn for_container(container_width: u32) -> KitResult<Self> {
        let width = container_width
            .saturating_sub(CONTAINER_GUTTER)
            .min(MAX_FRAME_WIDTH);
        let height = (f64::from(width) * 1.2).round() as u32;
        Self::new(width, height)
    }

    /// Frame center in pixel coordinates.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Number of bytes in a tightly packed RGBA8 frame of this size.
    pub fn byte_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }

    pub(crate) fn width_u16(self) -> KitResult<u16> {
        self.width
            .try_into()
            .map_err(|_| KitError::validation("canvas width exceeds u16"))
    }

    pub(crate) fn height_u16(self) -> KitResult<u16> {
        self.height
            .try_into()
            .map_err(|_| KitError::validation("canvas height exceeds u16"))
    }
}

/// Which face of the garment is being customized.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Front face: logo overlay applies.
    #[default]
    Front,
    /// Back face: player name and number overlays apply.
    Back,
}

impl Side {
    /// Both sides, front first.
    pub const ALL: [Side; 2] = [Side::Front, Side::Back];

    /// Lowercase name used in asset labels and export file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Front => "front",
            Side::Back => "back",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Side {
    type Err = KitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(Side::Front),
            "back" => Ok(Side::Back),
            other => Err(KitError::validation(format!(
                "unknown side \"{other}\" (expected front or back)"
            ))),
        }
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
