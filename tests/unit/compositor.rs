use super::*;
use crate::{
    anchors::AnchorField,
    background::BackgroundStyle,
    config::{AnchorLayout, CapPolicy, DispatchWeights, SessionConfig},
    dispatch::DragEvent,
    foundation::core::Point,
    motif::{LineAnim, brush::Pen},
    palette::Hsla,
};

const A: Point = Point::new(60.0, 50.0);

fn weights(line: f64, lattice: f64) -> DispatchWeights {
    DispatchWeights {
        line,
        arc: 0.0,
        bezier: 0.0,
        lattice,
        spiral: 0.0,
    }
}

fn config() -> SessionConfig {
    SessionConfig {
        background: BackgroundStyle::Noise,
        thick_stroke_chance: 0.0,
        foreground_chance: 0.0,
        perspective_chance: 0.0,
        line_steps: 5,
        lattice_frame_delay: 1,
        cap: CapPolicy::AcceptedDrags(1000),
        ..SessionConfig::default()
    }
    .with_seed(21)
}

fn session(config: SessionConfig) -> SessionState {
    let canvas = Canvas::new(160, 120).unwrap();
    let mut s = SessionState::new(config, canvas).unwrap();
    s.set_anchors(AnchorField::from_positions(canvas, [A], 25.0, AnchorLayout::Relative));
    s
}

fn drag(s: &mut SessionState, t: f64) {
    s.dispatch(DragEvent::new(Point::new(58.0, 49.0), A, t));
}

fn has_ink(surface: &Surface) -> bool {
    surface.data().chunks_exact(4).any(|px| px[3] > 0)
}

#[test]
fn step_and_prune_drops_exactly_the_finished_entry() {
    let pen = Pen::plain(Hsla::ink(0.8), 1.0);
    let mut list: Vec<Motif> = vec![
        LineAnim::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 3, pen).into(),
        LineAnim::new(Point::new(0.0, 5.0), Point::new(10.0, 5.0), 1, pen).into(),
        LineAnim::new(Point::new(0.0, 9.0), Point::new(10.0, 9.0), 2, pen).into(),
    ];
    let mut dl = DrawList::new();
    let ctx = StepCtx::new(FrameIndex(1), 0);

    assert_eq!(step_and_prune(&mut list, &ctx, &mut dl), 1);
    assert_eq!(list.len(), 2);
    assert_eq!(step_and_prune(&mut list, &ctx, &mut dl), 1);
    assert_eq!(list.len(), 1);
    assert_eq!(step_and_prune(&mut list, &ctx, &mut dl), 1);
    assert!(list.is_empty());
    assert_eq!(dl.len(), 6);
}

#[test]
fn tick_produces_a_frame_of_the_canvas_extent() {
    let mut s = session(config());
    let mut comp = FrameCompositor::new(&s).unwrap();
    let frame = comp.tick(&mut s).unwrap();
    assert_eq!((frame.width, frame.height), (160, 120));
    assert_eq!(frame.data.len(), 160 * 120 * 4);
    assert!(frame.premultiplied);
    assert_eq!(comp.frame_index(), FrameIndex(1));
    // The noise backdrop is opaque.
    assert_eq!(comp.frame().pixel(10, 10).map(|p| p[3]), Some(255));
}

#[test]
fn line_fragments_accumulate_on_the_ink_surface_until_pruned() {
    let mut s = session(SessionConfig {
        dispatch: weights(1.0, 0.0),
        ..config()
    });
    let mut comp = FrameCompositor::new(&s).unwrap();
    drag(&mut s, 0.0);
    drag(&mut s, 1000.0);
    drag(&mut s, 2000.0);
    assert_eq!(s.line_anims().len(), 1);
    assert!(!has_ink(comp.ink()));

    for _ in 0..4 {
        comp.tick(&mut s).unwrap();
        assert_eq!(s.line_anims().len(), 1);
    }
    comp.tick(&mut s).unwrap();
    assert!(s.line_anims().is_empty());
    assert!(has_ink(comp.ink()));
    assert!(!has_ink(comp.foreground_ink()));
}

#[test]
fn finished_lattice_is_counted_once() {
    let mut s = session(SessionConfig {
        dispatch: weights(0.0, 1.0),
        ..config()
    });
    let mut comp = FrameCompositor::new(&s).unwrap();
    drag(&mut s, 0.0);
    drag(&mut s, 1000.0);
    drag(&mut s, 2000.0);
    assert_eq!(s.lattice_anims().len(), 1);
    let budget = s.lattice_anims()[0].budget();

    for _ in 0..budget {
        comp.tick(&mut s).unwrap();
    }
    assert!(s.lattice_anims().is_empty());
    assert_eq!(s.counters().lattices_completed, 1);
    comp.tick(&mut s).unwrap();
    assert_eq!(s.counters().lattices_completed, 1);
}

#[test]
fn shapes_grow_while_running_and_freeze_once_finished() {
    let mut s = session(SessionConfig {
        cap: CapPolicy::AcceptedDrags(2),
        ..config()
    });
    let mut comp = FrameCompositor::new(&s).unwrap();
    drag(&mut s, 0.0);
    comp.tick(&mut s).unwrap();
    let grown = s.skeletons()[0].current_size();
    assert!(grown > 0.0);

    drag(&mut s, 1000.0);
    assert!(s.is_finished());
    let sizes: Vec<f64> = s.skeletons().iter().map(|k| k.current_size()).collect();
    for _ in 0..5 {
        comp.tick(&mut s).unwrap();
    }
    let after: Vec<f64> = s.skeletons().iter().map(|k| k.current_size()).collect();
    assert_eq!(sizes, after);
}

#[test]
fn preserve_resize_rescales_ink() {
    let mut s = session(SessionConfig {
        dispatch: weights(1.0, 0.0),
        ..config()
    });
    let mut comp = FrameCompositor::new(&s).unwrap();
    for t in [0.0, 1000.0, 2000.0] {
        drag(&mut s, t);
    }
    for _ in 0..5 {
        comp.tick(&mut s).unwrap();
    }
    let canvas = Canvas::new(80, 60).unwrap();
    s.resize(canvas);
    comp.resize(&s).unwrap();
    assert_eq!(comp.ink().canvas(), canvas);
    assert_eq!(comp.background().canvas(), canvas);
    assert_eq!(s.skeletons().len(), 2);
    let frame = comp.tick(&mut s).unwrap();
    assert_eq!((frame.width, frame.height), (80, 60));
}

#[test]
fn reset_policy_resize_drops_ink() {
    let mut s = session(SessionConfig {
        dispatch: weights(1.0, 0.0),
        resize: crate::config::ResizePolicy::Reset,
        ..config()
    });
    let mut comp = FrameCompositor::new(&s).unwrap();
    for t in [0.0, 1000.0, 2000.0] {
        drag(&mut s, t);
    }
    for _ in 0..5 {
        comp.tick(&mut s).unwrap();
    }
    s.resize(Canvas::new(100, 100).unwrap());
    comp.resize(&s).unwrap();
    assert!(!has_ink(comp.ink()));
    assert_eq!(comp.frame_index(), FrameIndex(0));
}

#[test]
fn background_follows_the_session_seed() {
    let s = session(config());
    let mut a = FrameCompositor::new(&s).unwrap();
    let b = FrameCompositor::new(&s).unwrap();
    assert_eq!(a.background().data(), b.background().data());
    a.reset(&s).unwrap();
    assert_eq!(a.background().data(), b.background().data());
}
