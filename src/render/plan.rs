use kurbo::{PathEl, Shape as _};

use crate::{
    foundation::core::{Affine, BezPath, Point, Rect},
    palette::Hsla,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Hsla,
}

impl GradientStop {
    pub fn new(offset: f64, color: Hsla) -> Self {
        Self { offset, color }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Hsla),
    Linear {
        start: Point,
        end: Point,
        stops: Vec<GradientStop>,
    },
    /// Concentric two-circle gradient; offset 0 sits on `r0`, offset 1 on `r1`.
    Radial {
        center: Point,
        r0: f64,
        r1: f64,
        stops: Vec<GradientStop>,
    },
}

impl Paint {
    fn transformed(self, a: Affine) -> Self {
        match self {
            Paint::Solid(c) => Paint::Solid(c),
            Paint::Linear { start, end, stops } => Paint::Linear {
                start: a * start,
                end: a * end,
                stops,
            },
            Paint::Radial {
                center,
                r0,
                r1,
                stops,
            } => {
                let k = uniform_scale(a);
                Paint::Radial {
                    center: a * center,
                    r0: r0 * k,
                    r1: r1 * k,
                    stops,
                }
            }
        }
    }

    pub fn is_gradient(&self) -> bool {
        !matches!(self, Paint::Solid(_))
    }

    /// Premultiplied color at `p`, channels in `0..=1`. Gradients pad past their ends.
    pub fn sample(&self, p: Point) -> [f64; 4] {
        match self {
            Paint::Solid(c) => premul(*c),
            Paint::Linear { start, end, stops } => {
                let d = *end - *start;
                let len2 = d.hypot2();
                let t = if len2 <= f64::EPSILON {
                    0.0
                } else {
                    (p - *start).dot(d) / len2
                };
                sample_stops(stops, t)
            }
            Paint::Radial {
                center,
                r0,
                r1,
                stops,
            } => {
                let dist = (p - *center).hypot();
                let span = r1 - r0;
                let t = if span.abs() <= f64::EPSILON {
                    if dist < *r1 { 0.0 } else { 1.0 }
                } else {
                    (dist - r0) / span
                };
                sample_stops(stops, t)
            }
        }
    }
}

fn premul(c: Hsla) -> [f64; 4] {
    let [r, g, b, a] = c.to_rgba_f64();
    [r * a, g * a, b * a, a]
}

fn sample_stops(stops: &[GradientStop], t: f64) -> [f64; 4] {
    let Some(first) = stops.first() else {
        return [0.0; 4];
    };
    let t = t.clamp(0.0, 1.0);
    if t <= first.offset {
        return premul(first.color);
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let k = if span <= f64::EPSILON {
                1.0
            } else {
                (t - a.offset) / span
            };
            let ca = premul(a.color);
            let cb = premul(b.color);
            return std::array::from_fn(|i| ca[i] + (cb[i] - ca[i]) * k);
        }
    }
    stops.last().map(|s| premul(s.color)).unwrap_or([0.0; 4])
}

fn uniform_scale(a: Affine) -> f64 {
    a.determinant().abs().sqrt()
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Fill { path: BezPath, paint: Paint },
    Stroke { path: BezPath, width: f64, color: Hsla },
}

impl DrawOp {
    pub fn bounds(&self) -> Rect {
        match self {
            DrawOp::Fill { path, .. } => path.bounding_box(),
            DrawOp::Stroke { path, width, .. } => path.bounding_box().inflate(width / 2.0, width / 2.0),
        }
    }
}

/// Backend-agnostic recording target every motif draws into.
///
/// Geometry is transformed into world space when it is recorded, so a replayed list
/// never needs the transform stack. Degenerate geometry is dropped here.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    ops: Vec<DrawOp>,
    transform: Affine,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
        self.transform = Affine::IDENTITY;
    }

    pub fn transform(&self) -> Affine {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    /// Run `f` with `local` applied on top of the current transform, then restore it.
    pub fn with_transform<R>(&mut self, local: Affine, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.transform;
        self.transform = saved * local;
        let out = f(self);
        self.transform = saved;
        out
    }

    pub fn fill(&mut self, path: &BezPath, paint: Paint) {
        if let Paint::Solid(c) = paint
            && c.a <= 0.0
        {
            return;
        }
        let path = self.transform * path.clone();
        if !has_area(&path) {
            return;
        }
        let paint = paint.transformed(self.transform);
        self.ops.push(DrawOp::Fill { path, paint });
    }

    pub fn fill_color(&mut self, path: &BezPath, color: Hsla) {
        self.fill(path, Paint::Solid(color));
    }

    pub fn stroke(&mut self, path: &BezPath, width: f64, color: Hsla) {
        if !(width.is_finite() && width > 0.0) || color.a <= 0.0 {
            return;
        }
        let path = self.transform * path.clone();
        if !has_extent(&path) {
            return;
        }
        let width = width * uniform_scale(self.transform);
        if width <= 0.0 {
            return;
        }
        self.ops.push(DrawOp::Stroke { path, width, color });
    }

    /// Straight segment. Coincident endpoints draw nothing.
    pub fn line(&mut self, a: Point, b: Point, width: f64, color: Hsla) {
        if (b - a).hypot2() <= f64::EPSILON {
            return;
        }
        let mut path = BezPath::new();
        path.move_to(a);
        path.line_to(b);
        self.stroke(&path, width, color);
    }

    pub fn polyline(&mut self, points: &[Point], width: f64, color: Hsla) {
        let Some(path) = polyline_path(points, false) else {
            return;
        };
        self.stroke(&path, width, color);
    }

    pub fn append(&mut self, other: &mut DrawList) {
        self.ops.append(&mut other.ops);
    }
}

/// Open or closed path through `points`; `None` for fewer than two points.
pub fn polyline_path(points: &[Point], closed: bool) -> Option<BezPath> {
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let mut path = BezPath::new();
    path.move_to(*first);
    for p in rest {
        path.line_to(*p);
    }
    if closed {
        path.close_path();
    }
    Some(path)
}

fn all_finite(path: &BezPath) -> bool {
    let ok = |p: Point| p.x.is_finite() && p.y.is_finite();
    path.elements().iter().all(|el| match *el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => ok(p),
        PathEl::QuadTo(a, b) => ok(a) && ok(b),
        PathEl::CurveTo(a, b, c) => ok(a) && ok(b) && ok(c),
        PathEl::ClosePath => true,
    })
}

fn has_extent(path: &BezPath) -> bool {
    if path.elements().len() < 2 || !all_finite(path) {
        return false;
    }
    let bb = path.bounding_box();
    bb.width() > 0.0 || bb.height() > 0.0
}

fn has_area(path: &BezPath) -> bool {
    if path.elements().len() < 3 || !all_finite(path) {
        return false;
    }
    let bb = path.bounding_box();
    bb.width() > 0.0 && bb.height() > 0.0
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
