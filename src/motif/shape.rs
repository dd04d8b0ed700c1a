use std::f64::consts::{PI, TAU};

use kurbo::{Circle, Shape as _};

use super::{Easing, StepCtx};
use crate::{
    config::SessionConfig,
    ease::Ease,
    foundation::{
        core::{Affine, BezPath, Point, Rect, Vec2},
        math::{map_clamped, map_range},
    },
    palette::{Hsla, Palette, ornament_color},
    render::{DrawList, GradientStop, Paint},
    rng::SessionRng,
};

const PATH_TOLERANCE: f64 = 0.1;
/// Load slowdown floor for shape growth.
const SHAPE_SLOWDOWN_FLOOR: f64 = 0.1;
const HALO_ALPHA: f64 = 0.85;
/// Gradient stop at which open fills reach full transparency.
const OPEN_FADE_END: f64 = 0.9;
const SQUIGGLE_SEGMENTS: usize = 15;
const MIN_RINGS: u32 = 3;
const MAX_RINGS: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeRole {
    /// One of the two large shapes that open a composition.
    Skeleton,
    Ornament,
}

/// Raw entries of the style tables before they resolve into a [`ShapeForm`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeStyle {
    Circle,
    Rect,
    Triangle,
    SemiCircle,
    OpenRect,
    OpenTriangle,
    OpenSemiCircle,
    Halo,
    ConcentricCircle,
    ConcentricArc,
    Squiggle,
    Arc,
}

pub const SKELETON_STYLES: [ShapeStyle; 2] = [ShapeStyle::OpenRect, ShapeStyle::OpenTriangle];

/// Uniformly sampled; repeated entries weight a style up.
pub const ORNAMENT_STYLES: [ShapeStyle; 15] = [
    ShapeStyle::Circle,
    ShapeStyle::Rect,
    ShapeStyle::Triangle,
    ShapeStyle::SemiCircle,
    ShapeStyle::OpenRect,
    ShapeStyle::OpenTriangle,
    ShapeStyle::OpenSemiCircle,
    ShapeStyle::OpenSemiCircle,
    ShapeStyle::OpenSemiCircle,
    ShapeStyle::Halo,
    ShapeStyle::Halo,
    ShapeStyle::ConcentricCircle,
    ShapeStyle::ConcentricArc,
    ShapeStyle::Squiggle,
    ShapeStyle::Arc,
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HaloRing {
    pub color: Hsla,
    pub gradient_angle: f64,
}

/// Resolved geometry family with its style-specific state.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeForm {
    Circle,
    Halo { rings: Vec<HaloRing> },
    SemiCircle { open: bool },
    /// `open` carries the gradient angle that picks the unstroked edge.
    Rect { open: Option<f64> },
    Triangle { open: Option<f64> },
    /// `rings` outlines at evenly spaced radii up to the current size.
    ConcentricCircle { rings: u32 },
    ConcentricArc { rings: u32, start: f64, sweep: f64 },
    /// Unit-size vertices, scaled by the current size when drawn.
    Squiggle { points: Vec<Point> },
    Arc { start: f64, sweep: f64 },
}

impl ShapeForm {
    pub fn is_open(&self) -> bool {
        match self {
            ShapeForm::SemiCircle { open } => *open,
            ShapeForm::Rect { open } | ShapeForm::Triangle { open } => open.is_some(),
            _ => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShapeForm::Circle => "circle",
            ShapeForm::Halo { .. } => "halo",
            ShapeForm::SemiCircle { .. } => "semi_circle",
            ShapeForm::Rect { .. } => "rect",
            ShapeForm::Triangle { .. } => "triangle",
            ShapeForm::ConcentricCircle { .. } => "concentric_circle",
            ShapeForm::ConcentricArc { .. } => "concentric_arc",
            ShapeForm::Squiggle { .. } => "squiggle",
            ShapeForm::Arc { .. } => "arc",
        }
    }
}

/// Everything the dispatcher decides before a shape is built.
#[derive(Clone, Copy, Debug)]
pub struct ShapeSeed {
    pub anchor: Point,
    pub index: u32, // 1-based creation order
    pub role: ShapeRole,
    pub color: Hsla,
    pub size: Option<f64>,  // base size before the index multiplier
    pub angle: Option<f64>, // rotation; random when absent
}

/// Compound shape that eases from nothing to its target size and stays forever.
#[derive(Clone, Debug)]
pub struct KandinskyShape {
    center: Point,
    index: u32,
    role: ShapeRole,
    target_size: f64,
    rotation: f64,
    t: f64,
    speed: f64,
    ease: Ease,
    color: Hsla,
    stroke_width: f64,
    form: ShapeForm,
}

impl KandinskyShape {
    pub fn new(
        rng: &mut SessionRng,
        seed: ShapeSeed,
        config: &SessionConfig,
        base_unit: f64,
        palette: &Palette,
    ) -> Self {
        let index = f64::from(seed.index);
        let base = seed
            .size
            .unwrap_or_else(|| rng.range(base_unit * 0.05, base_unit * 0.25));
        let multiplier = match seed.role {
            ShapeRole::Skeleton => rng.span(config.skeleton_multiplier),
            ShapeRole::Ornament => map_clamped(
                index,
                3.0,
                100.0,
                config.ornament_scale.lo,
                config.ornament_scale.hi,
            ),
        };
        let target_size = base * multiplier;

        let may_offset = seed.role == ShapeRole::Ornament || config.tangent_skeletons;
        let center = if may_offset && rng.chance(0.5) {
            // The anchor ends up on the final circumference.
            seed.anchor + Vec2::from_angle(rng.angle()) * (target_size / 2.0)
        } else {
            seed.anchor
        };

        let max_speed = map_clamped(
            index,
            3.0,
            50.0,
            config.shape_speed.hi,
            config.shape_speed.hi * config.shape_speed_boost,
        );
        let speed = rng.range(config.shape_speed.lo, max_speed);
        let rotation = seed.angle.unwrap_or_else(|| rng.angle());
        let stroke_width = target_size * rng.range(0.005, 0.02);

        let table: &[ShapeStyle] = match seed.role {
            ShapeRole::Skeleton => &SKELETON_STYLES,
            ShapeRole::Ornament => &ORNAMENT_STYLES,
        };
        let style = rng.pick(table).copied().unwrap_or(ShapeStyle::Circle);
        let mut form = resolve_form(rng, style, target_size, config, palette);

        let too_small = target_size < config.open_min_size * base_unit;
        if too_small {
            form = match form {
                ShapeForm::Rect { open: Some(_) } => ShapeForm::Rect { open: None },
                ShapeForm::Triangle { open: Some(_) } => ShapeForm::Triangle { open: None },
                other => other,
            };
        }

        Self {
            center,
            index: seed.index,
            role: seed.role,
            target_size,
            rotation,
            t: 0.0,
            speed,
            ease: config.shape_ease,
            color: seed.color,
            stroke_width,
            form,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn role(&self) -> ShapeRole {
        self.role
    }

    pub fn target_size(&self) -> f64 {
        self.target_size
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn color(&self) -> Hsla {
        self.color
    }

    pub fn form(&self) -> &ShapeForm {
        &self.form
    }

    /// Rendered size at the current easing parameter.
    pub fn current_size(&self) -> f64 {
        self.target_size * self.ease.apply(self.t)
    }

    fn draw_at(&self, dl: &mut DrawList, s: f64) {
        let black = Hsla::black();
        let sw = self.stroke_width;
        let c = self.color;
        match &self.form {
            ShapeForm::Circle => {
                let path = circle_path(s / 2.0);
                dl.fill_color(&path, c);
                dl.stroke(&path, sw, black);
            }
            ShapeForm::Halo { rings } => draw_halo(dl, rings, s),
            ShapeForm::SemiCircle { open } => {
                let r = s / 2.0;
                let disc = half_disc_path(r);
                if *open {
                    let clear = c.with_alpha(0.0);
                    dl.fill(
                        &disc,
                        Paint::Linear {
                            start: Point::new(0.0, r),
                            end: Point::ZERO,
                            stops: fade_stops(c, clear),
                        },
                    );
                    dl.stroke(&arc_path(r, 0.0, PI), sw, black);
                } else {
                    dl.fill_color(&disc, c);
                    dl.stroke(&arc_path(r, 0.0, PI), sw, black);
                }
            }
            ShapeForm::Rect { open } => {
                let (w, h) = (s, s * 0.6);
                let verts = [
                    Point::new(-w / 2.0, -h / 2.0),
                    Point::new(w / 2.0, -h / 2.0),
                    Point::new(w / 2.0, h / 2.0),
                    Point::new(-w / 2.0, h / 2.0),
                ];
                let rect = Rect::new(-w / 2.0, -h / 2.0, w / 2.0, h / 2.0).to_path(PATH_TOLERANCE);
                match open {
                    Some(angle) => {
                        let open_idx = rect_open_edge(*angle);
                        let opposite = (open_idx + 2) % 4;
                        let mid = |i: usize| verts[i].midpoint(verts[(i + 1) % 4]);
                        dl.fill(
                            &rect,
                            Paint::Linear {
                                start: mid(opposite),
                                end: mid(open_idx),
                                stops: fade_stops(c, c.with_alpha(0.0)),
                            },
                        );
                        for i in (0..4).filter(|i| *i != open_idx) {
                            dl.line(verts[i], verts[(i + 1) % 4], sw, black);
                        }
                    }
                    None => {
                        dl.fill_color(&rect, c);
                        dl.stroke(&rect, sw, black);
                    }
                }
            }
            ShapeForm::Triangle { open } => {
                let v = triangle_vertices(s);
                let Some(tri) = crate::render::plan::polyline_path(&v, true) else {
                    return;
                };
                match open {
                    Some(angle) => {
                        let open_idx = triangle_open_edge(&v, *angle);
                        let apex = v[(open_idx + 2) % 3];
                        let mid = v[open_idx].midpoint(v[(open_idx + 1) % 3]);
                        dl.fill(
                            &tri,
                            Paint::Linear {
                                start: apex,
                                end: mid,
                                stops: fade_stops(c, c.with_alpha(0.0)),
                            },
                        );
                        for i in (0..3).filter(|i| *i != open_idx) {
                            dl.line(v[i], v[(i + 1) % 3], sw, black);
                        }
                    }
                    None => {
                        dl.fill_color(&tri, c);
                        dl.stroke(&tri, sw, black);
                    }
                }
            }
            ShapeForm::ConcentricCircle { rings } => {
                for r in ring_radii(*rings, s) {
                    dl.stroke(&circle_path(r), sw, c);
                }
            }
            ShapeForm::ConcentricArc { rings, start, sweep } => {
                for r in ring_radii(*rings, s) {
                    dl.stroke(&arc_path(r, *start, *sweep), sw, c);
                }
            }
            ShapeForm::Squiggle { points } => {
                let k = s / self.target_size;
                let scaled: Vec<Point> =
                    points.iter().map(|p| Point::new(p.x * k, p.y * k)).collect();
                dl.polyline(&scaled, sw, c);
            }
            ShapeForm::Arc { start, sweep } => {
                dl.stroke(&arc_path(s / 2.0, *start, *sweep), sw, c);
            }
        }
    }
}

impl Easing for KandinskyShape {
    fn advance(&mut self, ctx: &StepCtx) {
        if self.t < 1.0 {
            self.t = (self.t + self.speed * ctx.slowdown(SHAPE_SLOWDOWN_FLOOR)).min(1.0);
        }
    }

    fn t(&self) -> f64 {
        self.t
    }

    fn draw(&self, dl: &mut DrawList) {
        let s = self.current_size();
        if !(s.is_finite() && s > 0.0 && self.target_size > 0.0) {
            return;
        }
        let local = Affine::translate(self.center.to_vec2()) * Affine::rotate(self.rotation);
        dl.with_transform(local, |dl| self.draw_at(dl, s));
    }
}

fn resolve_form(
    rng: &mut SessionRng,
    style: ShapeStyle,
    target_size: f64,
    config: &SessionConfig,
    palette: &Palette,
) -> ShapeForm {
    match style {
        ShapeStyle::Circle => ShapeForm::Circle,
        ShapeStyle::Rect => ShapeForm::Rect { open: None },
        ShapeStyle::Triangle => ShapeForm::Triangle { open: None },
        ShapeStyle::SemiCircle => ShapeForm::SemiCircle { open: false },
        ShapeStyle::OpenRect => ShapeForm::Rect {
            open: Some(rng.angle()),
        },
        ShapeStyle::OpenTriangle => ShapeForm::Triangle {
            open: Some(rng.angle()),
        },
        ShapeStyle::OpenSemiCircle => ShapeForm::SemiCircle { open: true },
        ShapeStyle::Halo => {
            let source = palette.colorful().halo_source();
            let count = rng.int(3, 6);
            let mut rings: Vec<HaloRing> = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let prev = rings.last().map(|r| r.color);
                let color = ornament_color(rng, &source, config.color_variety, prev);
                rings.push(HaloRing {
                    color,
                    gradient_angle: rng.angle(),
                });
            }
            ShapeForm::Halo { rings }
        }
        ShapeStyle::ConcentricCircle | ShapeStyle::ConcentricArc => {
            let rings = rng.int(MIN_RINGS, MAX_RINGS + 1);
            if style == ShapeStyle::ConcentricCircle {
                ShapeForm::ConcentricCircle { rings }
            } else {
                ShapeForm::ConcentricArc {
                    rings,
                    start: rng.angle(),
                    sweep: rng.range(PI / 3.0, TAU),
                }
            }
        }
        ShapeStyle::Squiggle => {
            let len = target_size * 2.0;
            let segs = SQUIGGLE_SEGMENTS as f64;
            let points = (0..=SQUIGGLE_SEGMENTS)
                .map(|i| {
                    let i = i as f64;
                    Point::new(
                        map_range(i, 0.0, segs, -len / 2.0, len / 2.0),
                        (i / segs * PI).sin() * target_size * 0.2,
                    )
                })
                .collect();
            ShapeForm::Squiggle { points }
        }
        ShapeStyle::Arc => ShapeForm::Arc {
            start: rng.angle(),
            sweep: rng.range(PI / 3.0, PI),
        },
    }
}

/// Radii `s * i / rings` for `i` in `1..=rings`.
fn ring_radii(rings: u32, s: f64) -> impl Iterator<Item = f64> {
    let n = f64::from(rings.max(1));
    (1..=rings).map(move |i| s * f64::from(i) / n)
}

fn fade_stops(from: Hsla, clear: Hsla) -> Vec<GradientStop> {
    vec![
        GradientStop::new(0.0, from),
        GradientStop::new(OPEN_FADE_END, clear),
        GradientStop::new(1.0, clear),
    ]
}

fn circle_path(r: f64) -> BezPath {
    Circle::new(Point::ZERO, r).to_path(PATH_TOLERANCE)
}

fn arc_path(r: f64, start: f64, sweep: f64) -> BezPath {
    kurbo::Arc::new(Point::ZERO, Vec2::new(r, r), start, sweep, 0.0)
        .path_elements(PATH_TOLERANCE)
        .collect()
}

/// Lower half disc in y-down space: angles `0..PI` closed through the centre line.
fn half_disc_path(r: f64) -> BezPath {
    let mut path = arc_path(r, 0.0, PI);
    path.close_path();
    path
}

fn triangle_vertices(s: f64) -> [Point; 3] {
    let hgt = s * 3f64.sqrt() / 2.0;
    [
        Point::new(-s / 2.0, hgt / 3.0),
        Point::new(s / 2.0, hgt / 3.0),
        Point::new(0.0, -2.0 * hgt / 3.0),
    ]
}

/// Edge of the centered rect whose outward normal best matches `angle`.
/// Edges are top, right, bottom, left.
pub fn rect_open_edge(angle: f64) -> usize {
    const NORMALS: [Vec2; 4] = [
        Vec2::new(0.0, -1.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(-1.0, 0.0),
    ];
    let dir = Vec2::from_angle(angle);
    argmax(NORMALS.iter().map(|n| n.dot(dir)))
}

/// Edge `i -> i+1` whose midpoint projects furthest along `angle`.
pub fn triangle_open_edge(v: &[Point; 3], angle: f64) -> usize {
    let dir = Vec2::from_angle(angle);
    argmax((0..3).map(|i| v[i].midpoint(v[(i + 1) % 3]).to_vec2().dot(dir)))
}

/// First index of the maximum.
fn argmax(values: impl Iterator<Item = f64>) -> usize {
    let mut best = (0, f64::NEG_INFINITY);
    for (i, v) in values.enumerate() {
        if v > best.1 {
            best = (i, v);
        }
    }
    best.0
}

fn draw_halo(dl: &mut DrawList, rings: &[HaloRing], s: f64) {
    let n = rings.len() as f64;
    let max_r = s * 0.5;
    for (i, ring) in rings.iter().enumerate() {
        let r = max_r * ((n - i as f64) / n);
        let c = ring.color.with_alpha(HALO_ALPHA);
        let paint = if i == 0 {
            Paint::Radial {
                center: Point::ZERO,
                r0: r * 0.7,
                r1: r,
                stops: vec![
                    GradientStop::new(0.0, c),
                    GradientStop::new(1.0, c.with_alpha(0.0)),
                ],
            }
        } else {
            let d = Vec2::from_angle(ring.gradient_angle) * r;
            Paint::Linear {
                start: (-d).to_point(),
                end: d.to_point(),
                stops: vec![
                    GradientStop::new(0.0, c),
                    GradientStop::new(1.0, c.with_lightness(c.l * 0.8)),
                ],
            }
        };
        dl.fill(&circle_path(r), paint);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/motif/shape.rs"]
mod tests;
