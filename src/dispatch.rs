use std::f64::consts::PI;

use crate::{
    foundation::core::Point,
    motif::{
        ArcAnim, BezierAnim, KandinskyShape, LatticeAnim, LatticeParams, LineAnim, Motif,
        MotifKind, ShapeRole, ShapeSeed, SpiralAnim, brush::Pen,
    },
    palette::{Hsla, contrasting_color, first_skeleton_color, ornament_color, pick_colorful},
    session::{Layer, SessionState},
};

/// Screens whose short side is below this get smaller lattices.
const SMALL_SCREEN: f64 = 600.0;
const SMALL_LATTICES: [(u32, u32); 3] = [(1, 1), (1, 2), (2, 1)];
const LARGE_LATTICES: [(u32, u32); 5] = [(1, 2), (1, 3), (1, 4), (2, 2), (2, 3)];
const SKELETON_COUNT: usize = 2;

/// A pointer drag as the host reports it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DragEvent {
    pub prev: Point,
    pub cur: Point,
    pub time_ms: f64,
}

impl DragEvent {
    pub fn new(prev: Point, cur: Point, time_ms: f64) -> Self {
        Self { prev, cur, time_ms }
    }

    /// Direction of travel; 0 for a stationary pointer.
    pub fn angle(&self) -> f64 {
        let d = self.cur - self.prev;
        d.y.atan2(d.x)
    }
}

/// What a drag event turned into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum DispatchOutcome {
    Finished,
    Debounced,
    NoAnchor,
    Skeleton { index: u32 },
    ThickStroke { kind: MotifKind },
    Motif { kind: MotifKind, layer: Layer },
    Ornament { index: u32 },
}

impl DispatchOutcome {
    /// Whether a new element was created.
    pub fn spawned(&self) -> bool {
        matches!(
            self,
            DispatchOutcome::Skeleton { .. }
                | DispatchOutcome::ThickStroke { .. }
                | DispatchOutcome::Motif { .. }
                | DispatchOutcome::Ornament { .. }
        )
    }
}

impl SessionState {
    /// Handle one drag: at most one new element per call.
    #[tracing::instrument(skip(self), fields(cur = ?drag.cur, t = drag.time_ms))]
    pub fn dispatch(&mut self, drag: DragEvent) -> DispatchOutcome {
        if self.is_finished() {
            return DispatchOutcome::Finished;
        }
        if let Some(last) = self.last_accept_ms
            && drag.time_ms - last < self.config.debounce_ms
        {
            return DispatchOutcome::Debounced;
        }
        self.last_accept_ms = Some(drag.time_ms);

        let Some(anchor) = self
            .anchors
            .nearest(drag.cur, self.config.trigger_distance)
            .map(|a| a.position)
        else {
            return DispatchOutcome::NoAnchor;
        };

        let outcome = self.spawn_at(anchor, &drag);
        self.counters.accepted_drags += 1;
        tracing::debug!(?outcome, live = self.live_elements(), "dispatched");
        self.check_lifecycle();
        outcome
    }

    fn spawn_at(&mut self, a: Point, drag: &DragEvent) -> DispatchOutcome {
        if self.skeletons.len() < SKELETON_COUNT {
            return self.spawn_skeleton(a, drag.angle());
        }

        if self.counters.thick_strokes < self.config.thick_stroke_cap
            && self.rng.chance(self.config.thick_stroke_chance)
        {
            let kind = self.spawn_thick_stroke(a);
            self.counters.thick_strokes += 1;
            return DispatchOutcome::ThickStroke { kind };
        }

        let r = self.rng.unit();
        let lattice_open = self.counters.lattices_spawned < self.config.lattice_cap;
        match table_branch(&self.config.dispatch, r, lattice_open) {
            Some(MotifKind::Line) => {
                let layer = self.ink_layer();
                self.spawn_line(a, layer);
                DispatchOutcome::Motif {
                    kind: MotifKind::Line,
                    layer,
                }
            }
            Some(MotifKind::Arc) => {
                self.spawn_arc(a);
                DispatchOutcome::Motif {
                    kind: MotifKind::Arc,
                    layer: Layer::BackgroundInk,
                }
            }
            Some(MotifKind::Bezier) => {
                let layer = self.ink_layer();
                self.spawn_bezier(a, layer);
                DispatchOutcome::Motif {
                    kind: MotifKind::Bezier,
                    layer,
                }
            }
            Some(MotifKind::Lattice) => {
                self.spawn_lattice(a);
                self.counters.lattices_spawned += 1;
                DispatchOutcome::Motif {
                    kind: MotifKind::Lattice,
                    layer: Layer::Lattice,
                }
            }
            Some(MotifKind::Spiral) => {
                self.spawn_spiral(a);
                DispatchOutcome::Motif {
                    kind: MotifKind::Spiral,
                    layer: Layer::BackgroundInk,
                }
            }
            None => {
                let index = self.spawn_ornament(a);
                DispatchOutcome::Ornament { index }
            }
        }
    }

    fn base_unit(&self) -> f64 {
        self.canvas.base_unit()
    }

    fn ink_layer(&mut self) -> Layer {
        if self.rng.chance(self.config.foreground_chance) {
            Layer::ForegroundInk
        } else {
            Layer::BackgroundInk
        }
    }

    fn push(&mut self, layer: Layer, motif: Motif) {
        if let Some(list) = self.list_mut(layer) {
            list.push(motif);
        }
    }

    /// Random anchor, falling back to `fallback` for an empty field.
    fn any_anchor(&mut self, fallback: Point) -> Point {
        self.anchors.random_position(&mut self.rng).unwrap_or(fallback)
    }

    fn spawn_skeleton(&mut self, a: Point, angle: f64) -> DispatchOutcome {
        let b = self.base_unit();
        let index = self.counters.next_shape_index();
        let size = self.rng.range(b * 0.3, b * 0.45);
        let color = match self.skeleton_colors.first() {
            None => first_skeleton_color(&mut self.rng, &self.palette),
            Some(first) => contrasting_color(&mut self.rng, *first, &self.palette, self.config.color_variety),
        };
        self.skeleton_colors.push(color);
        let seed = ShapeSeed {
            anchor: a,
            index,
            role: ShapeRole::Skeleton,
            color,
            size: Some(size),
            angle: Some(angle),
        };
        let shape = KandinskyShape::new(&mut self.rng, seed, &self.config, b, &self.palette);
        self.skeletons.push(shape);
        DispatchOutcome::Skeleton { index }
    }

    fn spawn_thick_stroke(&mut self, a: Point) -> MotifKind {
        let b = self.base_unit();
        let pen = Pen::brush(Hsla::ink(0.85), self.rng.range(b * 0.02, b * 0.05));
        if self.rng.chance(0.5) {
            let to = self.any_anchor(a);
            let m = LineAnim::new(a, to, self.config.line_steps, pen);
            self.push(Layer::ForegroundInk, m.into());
            MotifKind::Line
        } else {
            let c1 = self.any_anchor(a);
            let c2 = self.any_anchor(a);
            let d = self.any_anchor(a);
            let m = BezierAnim::new(a, c1, c2, d, self.config.bezier_steps, pen);
            self.push(Layer::ForegroundInk, m.into());
            MotifKind::Bezier
        }
    }

    fn perspective_target(&mut self) -> Option<Point> {
        if self.vanishing.is_empty() || !self.rng.chance(self.config.perspective_chance) {
            return None;
        }
        self.vanishing.pick(&mut self.rng)
    }

    fn spawn_line(&mut self, a: Point, layer: Layer) {
        let b = self.base_unit();
        let to = match self.perspective_target() {
            // Aim through the vanishing point, well past the canvas edge.
            Some(vp) if (vp - a).hypot() > f64::EPSILON => {
                a + (vp - a).normalize() * (self.canvas.w() * 2.0)
            }
            _ => self.any_anchor(a),
        };
        let pen = Pen::plain(Hsla::ink(0.8), self.rng.range(b * 0.001, b * 0.005));
        let m = LineAnim::new(a, to, self.config.line_steps, pen);
        self.push(layer, m.into());
    }

    fn spawn_arc(&mut self, a: Point) {
        let b = self.base_unit();
        let radius = self.rng.range(b * 0.1, b * 0.3);
        let start = self.rng.angle();
        let sweep = self.rng.range(PI * 0.3, PI * 0.8);
        let width = self.rng.range(b * 0.001, b * 0.005);
        let m = ArcAnim::new(a, radius, start, sweep, self.config.arc_steps, Hsla::ink(0.6), width);
        self.push(Layer::BackgroundInk, m.into());
    }

    fn spawn_bezier(&mut self, a: Point, layer: Layer) {
        let b = self.base_unit();
        let (c1, c2, d) = match self.perspective_target() {
            Some(vp) => {
                let c1 = self.any_anchor(a);
                let d = self.any_anchor(a);
                (c1, d, vp)
            }
            None => {
                let c1 = self.any_anchor(a);
                let c2 = self.any_anchor(a);
                let d = self.any_anchor(a);
                (c1, c2, d)
            }
        };
        let pen = Pen::plain(Hsla::ink(0.8), self.rng.range(b * 0.0005, b * 0.0015));
        let m = BezierAnim::new(a, c1, c2, d, self.config.bezier_steps, pen);
        self.push(layer, m.into());
    }

    fn spawn_lattice(&mut self, a: Point) {
        let b = self.base_unit();
        let rng = &mut self.rng;
        let angle1 = rng.angle();
        let mut diff = rng.range(PI / 6.0, 2.0 * PI / 3.0);
        if rng.chance(0.5) {
            diff = -diff;
        }
        let pairs: &[(u32, u32)] = if b < SMALL_SCREEN {
            &SMALL_LATTICES
        } else {
            &LARGE_LATTICES
        };
        let (mut n1, mut n2) = rng.pick(pairs).copied().unwrap_or((1, 1));
        if rng.chance(0.5) {
            std::mem::swap(&mut n1, &mut n2);
        }
        let params = LatticeParams {
            n1,
            n2,
            angle1,
            angle2: angle1 + diff,
            spacing: rng.range(b * 0.02, b * 0.05),
            fill_alpha: rng.range(0.6, 0.9),
            frame_delay: self.config.lattice_frame_delay,
        };
        let m = LatticeAnim::new(a, params, &mut self.rng, &self.palette);
        self.push(Layer::Lattice, m.into());
    }

    fn spawn_spiral(&mut self, a: Point) {
        let b = self.base_unit();
        let color = pick_colorful(&mut self.rng, &self.palette).with_alpha(0.8);
        let revolutions = self.rng.range(2.0, 5.0);
        let radius = self.rng.range(b * 0.02, b * 0.05);
        let width = self.rng.range(b * 0.0005, b * 0.0015);
        let m = SpiralAnim::new(a, self.config.spiral_steps, revolutions, radius, color, width);
        self.push(Layer::BackgroundInk, m.into());
    }

    fn spawn_ornament(&mut self, a: Point) -> u32 {
        let index = self.counters.next_shape_index();
        let color = ornament_color(&mut self.rng, &self.palette, self.config.color_variety, None);
        let seed = ShapeSeed {
            anchor: a,
            index,
            role: ShapeRole::Ornament,
            color,
            size: None,
            angle: None,
        };
        let base_unit = self.base_unit();
        let shape = KandinskyShape::new(&mut self.rng, seed, &self.config, base_unit, &self.palette);
        self.ornaments.push(shape);
        index
    }
}

/// Branch of the main table for the uniform draw `r`; `None` means an ornament.
///
/// A closed lattice branch falls through to the spiral branch.
pub fn table_branch(weights: &crate::config::DispatchWeights, r: f64, lattice_open: bool) -> Option<MotifKind> {
    let line = weights.line;
    let arc = line + weights.arc;
    let bezier = arc + weights.bezier;
    let lattice = bezier + weights.lattice;
    let spiral = lattice + weights.spiral;
    if r < line {
        Some(MotifKind::Line)
    } else if r < arc {
        Some(MotifKind::Arc)
    } else if r < bezier {
        Some(MotifKind::Bezier)
    } else if r < lattice && lattice_open {
        Some(MotifKind::Lattice)
    } else if r < spiral {
        Some(MotifKind::Spiral)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "../tests/unit/dispatch.rs"]
mod tests;
