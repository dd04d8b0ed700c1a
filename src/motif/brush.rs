use crate::{
    foundation::core::Point,
    palette::Hsla,
    render::DrawList,
};

/// Width, color and texture shared by the segment-drawing motifs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pen {
    pub color: Hsla,
    pub width: f64,
    pub brush: bool, // pressure-modulated with shadow strokes
}

impl Pen {
    pub fn plain(color: Hsla, width: f64) -> Self {
        Self {
            color,
            width,
            brush: false,
        }
    }

    /// Emphasized stroke: pressure swells towards the middle of the path.
    pub fn brush(color: Hsla, width: f64) -> Self {
        Self {
            color,
            width,
            brush: true,
        }
    }

    /// Draw the fragment `a -> b` found at `progress` (0..1) along the whole path.
    pub fn segment(&self, dl: &mut DrawList, a: Point, b: Point, progress: f64) {
        if self.brush {
            brush_segment(dl, a, b, self.width, progress, self.color);
        } else {
            dl.line(a, b, self.width, self.color);
        }
    }
}

/// Brush width at `progress`: thin at both ends, ×1.5 in the middle.
pub fn pressure_width(weight: f64, progress: f64) -> f64 {
    let pressure = (progress.clamp(0.0, 1.0) * std::f64::consts::PI).sin();
    weight * (1.0 + 0.5 * pressure)
}

/// One brush fragment: a main stroke and two thin shadows offset by half the weight.
pub fn brush_segment(
    dl: &mut DrawList,
    a: Point,
    b: Point,
    weight: f64,
    progress: f64,
    color: Hsla,
) {
    let d = b - a;
    let len = d.hypot();
    if len <= f64::EPSILON {
        return;
    }
    let perp = kurbo::Vec2::new(-d.y / len, d.x / len) * (weight * 0.5);
    let r = pressure_width(weight, progress);

    dl.line(a, b, r, color);
    dl.line(a + perp, b + perp, r * 0.4, color);
    dl.line(a - perp, b - perp, r * 0.4, color);
}

#[cfg(test)]
#[path = "../../tests/unit/motif/brush.rs"]
mod tests;
