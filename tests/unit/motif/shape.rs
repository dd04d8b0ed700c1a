use super::*;
use crate::{foundation::core::FrameIndex, render::DrawOp};

const BASE: f64 = 600.0;

fn palette() -> Palette {
    Palette::new(vec![
        Hsla::hsl(0.0, 0.0, 10.0),
        Hsla::hsl(20.0, 80.0, 45.0),
        Hsla::hsl(140.0, 70.0, 40.0),
        Hsla::hsl(260.0, 60.0, 35.0),
    ])
}

fn seed(index: u32, role: ShapeRole) -> ShapeSeed {
    ShapeSeed {
        anchor: Point::new(300.0, 300.0),
        index,
        role,
        color: Hsla::hsl(20.0, 80.0, 45.0),
        size: None,
        angle: None,
    }
}

fn build(rng_seed: u64, index: u32, role: ShapeRole, config: &SessionConfig) -> KandinskyShape {
    let mut rng = SessionRng::seeded(rng_seed);
    KandinskyShape::new(&mut rng, seed(index, role), config, BASE, &palette())
}

#[test]
fn skeletons_are_large_open_polygons_centered_on_the_anchor() {
    let config = SessionConfig::default();
    for s in 0..50 {
        let mut rng = SessionRng::seeded(s);
        let mut sd = seed(1, ShapeRole::Skeleton);
        sd.size = Some(200.0);
        sd.angle = Some(0.25);
        let shape = KandinskyShape::new(&mut rng, sd, &config, BASE, &palette());
        assert!(shape.target_size() >= 200.0 * 1.8 && shape.target_size() <= 200.0 * 2.5);
        assert!(shape.form().is_open());
        assert!(matches!(shape.form(), ShapeForm::Rect { .. } | ShapeForm::Triangle { .. }));
        assert_eq!(shape.center(), sd.anchor);
        assert_eq!(shape.rotation(), 0.25);
    }
}

#[test]
fn ornament_offset_puts_anchor_on_the_circumference() {
    let config = SessionConfig::default();
    let mut offset_seen = 0;
    for s in 0..60 {
        let shape = build(s, 5, ShapeRole::Ornament, &config);
        let d = shape.center().distance(Point::new(300.0, 300.0));
        if d > 1e-9 {
            offset_seen += 1;
            assert!((d - shape.target_size() / 2.0).abs() < 1e-9);
        }
    }
    assert!(offset_seen > 10 && offset_seen < 50);
}

#[test]
fn ornament_size_shrinks_with_creation_index() {
    let config = SessionConfig::default();
    for s in 0..20 {
        let mut rng = SessionRng::seeded(s);
        let mut sd = seed(3, ShapeRole::Ornament);
        sd.size = Some(100.0);
        let early = KandinskyShape::new(&mut rng, sd, &config, BASE, &palette());
        sd.index = 100;
        let late = KandinskyShape::new(&mut rng, sd, &config, BASE, &palette());
        sd.index = 400;
        let clamped = KandinskyShape::new(&mut rng, sd, &config, BASE, &palette());
        assert!((early.target_size() - 120.0).abs() < 1e-9);
        assert!((late.target_size() - 50.0).abs() < 1e-9);
        assert!((clamped.target_size() - 50.0).abs() < 1e-9);
    }
}

#[test]
fn later_shapes_may_grow_faster() {
    let config = SessionConfig::default();
    let lo = config.shape_speed.lo;
    let hi = config.shape_speed.hi;
    for s in 0..40 {
        let early = build(s, 3, ShapeRole::Ornament, &config);
        assert!(early.speed() >= lo && early.speed() <= hi);
        let late = build(s, 60, ShapeRole::Ornament, &config);
        assert!(late.speed() >= lo && late.speed() <= hi * config.shape_speed_boost);
    }
}

#[test]
fn small_open_polygons_degrade_to_filled() {
    let config = SessionConfig {
        open_min_size: 10.0,
        ..SessionConfig::default()
    };
    for s in 0..100 {
        let shape = build(s, 4, ShapeRole::Ornament, &config);
        assert!(!matches!(
            shape.form(),
            ShapeForm::Rect { open: Some(_) } | ShapeForm::Triangle { open: Some(_) }
        ));
    }
}

#[test]
fn every_ornament_style_shows_up() {
    let config = SessionConfig::default();
    let mut names = std::collections::BTreeSet::new();
    for s in 0..400 {
        names.insert(build(s, 4, ShapeRole::Ornament, &config).form().name());
    }
    for name in [
        "circle",
        "halo",
        "semi_circle",
        "rect",
        "triangle",
        "concentric_circle",
        "concentric_arc",
        "squiggle",
        "arc",
    ] {
        assert!(names.contains(name), "{name} never drawn");
    }
}

#[test]
fn growth_follows_cubic_ease_out_and_saturates() {
    let config = SessionConfig::default();
    let mut shape = build(9, 4, ShapeRole::Ornament, &config);
    let ctx = StepCtx::new(FrameIndex(1), 0);
    assert_eq!(shape.current_size(), 0.0);
    shape.advance(&ctx);
    let t = shape.t();
    assert!((t - shape.speed()).abs() < 1e-12);
    let expected = shape.target_size() * (1.0 - (1.0 - t).powi(3));
    assert!((shape.current_size() - expected).abs() < 1e-9);

    for _ in 0..10_000 {
        shape.advance(&ctx);
    }
    assert!(shape.is_grown());
    assert_eq!(shape.t(), 1.0);
    assert!((shape.current_size() - shape.target_size()).abs() < 1e-9);
}

#[test]
fn load_slows_growth() {
    let config = SessionConfig::default();
    let mut calm = build(2, 4, ShapeRole::Ornament, &config);
    let mut busy = calm.clone();
    calm.advance(&StepCtx::new(FrameIndex(1), 0));
    busy.advance(&StepCtx::new(FrameIndex(1), 40));
    assert!((busy.t() - calm.t() * 0.1).abs() < 1e-12);
}

#[test]
fn open_edge_selection_matches_gradient_direction() {
    use std::f64::consts::FRAC_PI_2;
    assert_eq!(rect_open_edge(-FRAC_PI_2), 0);
    assert_eq!(rect_open_edge(0.0), 1);
    assert_eq!(rect_open_edge(FRAC_PI_2), 2);
    assert_eq!(rect_open_edge(PI), 3);

    let v = triangle_vertices(60.0);
    // Straight down points at the flat bottom edge.
    assert_eq!(triangle_open_edge(&v, FRAC_PI_2), 0);
}

#[test]
fn open_rect_strokes_three_edges_over_a_gradient() {
    let config = SessionConfig::default();
    let mut shape = build(1, 1, ShapeRole::Skeleton, &config);
    shape.form = ShapeForm::Rect { open: Some(0.0) };
    shape.t = 1.0;
    let mut dl = DrawList::new();
    shape.draw(&mut dl);
    let fills = dl.ops().iter().filter(|op| matches!(op, DrawOp::Fill { paint, .. } if paint.is_gradient())).count();
    let strokes = dl.ops().iter().filter(|op| matches!(op, DrawOp::Stroke { .. })).count();
    assert_eq!(fills, 1);
    assert_eq!(strokes, 3);
}

#[test]
fn concentric_forms_draw_three_to_five_single_color_rings() {
    let config = SessionConfig::default();
    let mut seen = 0;
    for s in 0..400 {
        let mut shape = build(s, 4, ShapeRole::Ornament, &config);
        let rings = match shape.form() {
            ShapeForm::ConcentricCircle { rings } | ShapeForm::ConcentricArc { rings, .. } => *rings,
            _ => continue,
        };
        seen += 1;
        assert!((3..=5).contains(&rings), "ring count {rings}");

        let ctx = StepCtx::new(FrameIndex(1), 0);
        while !shape.is_grown() {
            shape.advance(&ctx);
        }
        let mut dl = DrawList::new();
        shape.draw(&mut dl);
        let strokes: Vec<_> = dl
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Stroke { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(strokes.len(), rings as usize);
        assert!(strokes.iter().all(|p| *p == strokes[0]));
    }
    assert!(seen > 0);
}

#[test]
fn every_ease_grows_a_shape_monotonically_to_full_size() {
    for ease in [Ease::Linear, Ease::OutQuad, Ease::OutCubic, Ease::InOutCubic] {
        let config = SessionConfig {
            shape_ease: ease,
            ..SessionConfig::default()
        };
        let mut shape = build(11, 2, ShapeRole::Ornament, &config);
        let ctx = StepCtx::new(FrameIndex(1), 0);
        let mut prev = shape.current_size();
        assert_eq!(prev, 0.0);
        let mut steps = 0;
        while !shape.is_grown() {
            shape.advance(&ctx);
            let size = shape.current_size();
            assert!(size + 1e-9 >= prev, "{ease:?} shrank at step {steps}");
            prev = size;
            steps += 1;
            assert!(steps < 10_000, "{ease:?} never finished");
        }
        assert!((shape.current_size() - shape.target_size()).abs() < 1e-9, "{ease:?}");
    }
}

#[test]
fn nothing_is_drawn_before_growth_starts() {
    let config = SessionConfig::default();
    let shape = build(4, 4, ShapeRole::Ornament, &config);
    let mut dl = DrawList::new();
    shape.draw(&mut dl);
    assert!(dl.is_empty());
}
