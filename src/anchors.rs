use crate::{
    config::{AnchorLayout, VanishingStyle},
    foundation::core::{Canvas, Point},
    palette::Hsla,
    render::DrawList,
    rng::SessionRng,
};

/// A candidate trigger location.
///
/// `rel` is the position normalized against the canvas the anchor was placed on; it is
/// what survives a resize under [`AnchorLayout::Relative`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub position: Point,
    pub rel: Point,
}

/// Fixed-cardinality set of anchors with a nearest-within-radius query.
#[derive(Clone, Debug)]
pub struct AnchorField {
    anchors: Vec<Anchor>,
    layout: AnchorLayout,
    trigger_distance: f64,
    canvas: Canvas,
}

/// Uniform coordinate in `[margin, extent - margin]`; centered when the extent is too small.
fn inset_coord(rng: &mut SessionRng, extent: f64, margin: f64) -> f64 {
    if extent < 2.0 * margin {
        return extent / 2.0;
    }
    rng.range(margin, extent - margin)
}

impl AnchorField {
    pub fn generate(
        rng: &mut SessionRng,
        canvas: Canvas,
        count: usize,
        trigger_distance: f64,
        layout: AnchorLayout,
    ) -> Self {
        let mut field = Self {
            anchors: Vec::with_capacity(count),
            layout,
            trigger_distance,
            canvas,
        };
        field.scatter(rng, count);
        field
    }

    /// Field with explicit positions, e.g. a hand-placed layout.
    pub fn from_positions(
        canvas: Canvas,
        positions: impl IntoIterator<Item = Point>,
        trigger_distance: f64,
        layout: AnchorLayout,
    ) -> Self {
        let anchors = positions
            .into_iter()
            .map(|p| Anchor {
                position: p,
                rel: Point::new(p.x / canvas.w(), p.y / canvas.h()),
            })
            .collect();
        Self {
            anchors,
            layout,
            trigger_distance,
            canvas,
        }
    }

    fn scatter(&mut self, rng: &mut SessionRng, count: usize) {
        let (w, h) = (self.canvas.w(), self.canvas.h());
        self.anchors.clear();
        for _ in 0..count {
            let x = inset_coord(rng, w, self.trigger_distance);
            let y = inset_coord(rng, h, self.trigger_distance);
            self.anchors.push(Anchor {
                position: Point::new(x, y),
                rel: Point::new(x / w, y / h),
            });
        }
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn trigger_distance(&self) -> f64 {
        self.trigger_distance
    }

    /// Closest anchor strictly within `max_distance` of `p`. Ties keep the earliest anchor.
    pub fn nearest(&self, p: Point, max_distance: f64) -> Option<&Anchor> {
        let mut best: Option<(&Anchor, f64)> = None;
        for a in &self.anchors {
            let d = a.position.distance(p);
            if d >= max_distance {
                continue;
            }
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((a, d));
            }
        }
        best.map(|(a, _)| a)
    }

    /// Random anchor position, used for stroke endpoints and control points.
    pub fn random_position(&self, rng: &mut SessionRng) -> Option<Point> {
        rng.pick(&self.anchors).map(|a| a.position)
    }

    /// Rebuild positions for a new canvas extent according to the layout.
    pub fn resize(&mut self, rng: &mut SessionRng, canvas: Canvas) {
        self.canvas = canvas;
        match self.layout {
            AnchorLayout::Relative => {
                for a in &mut self.anchors {
                    a.position = Point::new(a.rel.x * canvas.w(), a.rel.y * canvas.h());
                }
            }
            AnchorLayout::Regenerate => {
                let count = self.anchors.len();
                self.scatter(rng, count);
            }
        }
    }

    /// Faint debug dots; nothing is recorded for a non-positive radius.
    pub fn draw_markers(&self, dl: &mut DrawList, radius: f64) {
        if radius <= 0.0 {
            return;
        }
        let color = Hsla::new(0.0, 0.0, 0.0, 0.07);
        for a in &self.anchors {
            let circle = kurbo::Circle::new(a.position, radius);
            dl.fill_color(&kurbo::Shape::to_path(&circle, 0.1), color);
        }
    }
}

/// Perspective targets that some lines and beziers are aimed at.
///
/// Stored normalized so they follow the canvas on resize.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VanishingPoints {
    rel: Vec<Point>,
    canvas: Option<Canvas>,
}

impl VanishingPoints {
    pub fn generate(rng: &mut SessionRng, canvas: Canvas, style: VanishingStyle) -> Self {
        let rel = match style {
            // Top, right and left, all off-canvas.
            VanishingStyle::Fixed => vec![
                Point::new(0.5, -0.5),
                Point::new(1.5, 0.5),
                Point::new(-0.5, 0.5),
            ],
            VanishingStyle::Random => {
                let mut rel = Vec::new();
                if rng.chance(0.5) {
                    rel.push(Point::new(rng.unit(), rng.unit()));
                    if rng.chance(0.3) {
                        rel.push(Point::new(rng.unit(), rng.unit()));
                    }
                }
                rel
            }
        };
        Self {
            rel,
            canvas: Some(canvas),
        }
    }

    pub fn resize(&mut self, canvas: Canvas) {
        self.canvas = Some(canvas);
    }

    pub fn is_empty(&self) -> bool {
        self.rel.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rel.len()
    }

    pub fn points(&self) -> Vec<Point> {
        let Some(c) = self.canvas else {
            return Vec::new();
        };
        self.rel
            .iter()
            .map(|r| Point::new(r.x * c.w(), r.y * c.h()))
            .collect()
    }

    pub fn pick(&self, rng: &mut SessionRng) -> Option<Point> {
        let points = self.points();
        rng.pick(&points).copied()
    }
}

#[cfg(test)]
#[path = "../tests/unit/anchors.rs"]
mod tests;
