use crate::foundation::error::{KandinskyError, KandinskyResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Monotonic frame counter, advanced once per compositor tick.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub fn since(self, earlier: FrameIndex) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Canvas extent in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> KandinskyResult<Self> {
        if width == 0 || height == 0 {
            return Err(KandinskyError::config("canvas extent must be non-zero"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(KandinskyError::config("canvas extent exceeds u16"));
        }
        Ok(Self { width, height })
    }

    pub fn w(self) -> f64 {
        f64::from(self.width)
    }

    pub fn h(self) -> f64 {
        f64::from(self.height)
    }

    /// Shorter side of the canvas; all relative geometry scales against it.
    pub fn base_unit(self) -> f64 {
        self.w().min(self.h())
    }

    pub fn center(self) -> Point {
        Point::new(self.w() / 2.0, self.h() / 2.0)
    }

    pub fn pixel_len(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
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
