use super::*;
use crate::{foundation::core::Point, palette::Hsla};

fn ctx(frame: u64) -> StepCtx {
    StepCtx::new(FrameIndex(frame), 0)
}

/// Drive `m` until it reports completion; returns how many calls that took.
fn run_to_end(m: &mut Motif, dl: &mut DrawList) -> usize {
    let mut calls = 0;
    let mut frame = 1;
    loop {
        calls += 1;
        let running = m.step(&ctx(frame), dl);
        frame += 1;
        if !running {
            return calls;
        }
        assert!(calls < 100_000, "motif never finished");
    }
}

#[test]
fn slowdown_kicks_in_past_sixteen_elements() {
    assert_eq!(StepCtx::new(FrameIndex(0), 0).slowdown(0.1), 1.0);
    assert_eq!(StepCtx::new(FrameIndex(0), 16).slowdown(0.1), 1.0);
    assert!((StepCtx::new(FrameIndex(0), 33).slowdown(0.1) - 0.1).abs() < 1e-12);
    assert!((StepCtx::new(FrameIndex(0), 80).slowdown(0.4) - 0.4).abs() < 1e-12);
    let mid = StepCtx::new(FrameIndex(0), 24).slowdown(0.1);
    assert!(mid < 1.0 && mid > 0.1);
}

#[test]
fn segment_motifs_finish_on_exactly_their_budget() {
    let ink = Hsla::ink(0.8);
    let pen = brush::Pen::plain(ink, 1.5);
    let mut motifs: Vec<Motif> = vec![
        LineAnim::new(Point::new(0.0, 0.0), Point::new(90.0, 40.0), 9, pen).into(),
        ArcAnim::new(Point::new(50.0, 50.0), 20.0, 0.0, 2.0, 5, Hsla::ink(0.6), 1.0).into(),
        BezierAnim::new(
            Point::new(0.0, 0.0),
            Point::new(30.0, 80.0),
            Point::new(60.0, -20.0),
            Point::new(90.0, 10.0),
            7,
            pen,
        )
        .into(),
        SpiralAnim::new(Point::new(40.0, 40.0), 12, 3.0, 20.0, ink, 1.0).into(),
    ];
    for m in &mut motifs {
        let mut dl = DrawList::new();
        let budget = m.budget();
        assert_eq!(run_to_end(m, &mut dl), budget, "{:?}", m.kind());
        let drawn = dl.len();
        assert!(!m.step(&ctx(999), &mut dl));
        assert_eq!(dl.len(), drawn, "finished motifs draw nothing");
    }
}

#[test]
fn line_segments_tile_the_whole_stroke() {
    let mut m = LineAnim::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 4, brush::Pen::plain(Hsla::ink(1.0), 2.0));
    let mut dl = DrawList::new();
    while m.step(&ctx(1), &mut dl) {}
    assert_eq!(dl.len(), 4);
    let first = dl.ops()[0].bounds();
    let last = dl.ops()[3].bounds();
    assert!((first.x0 + 1.0).abs() < 1e-9);
    assert!((last.x1 - 101.0).abs() < 1e-9);
}

#[test]
fn kinds_report_their_names() {
    let m: Motif = ArcAnim::new(Point::ZERO, 1.0, 0.0, 1.0, 1, Hsla::ink(0.6), 1.0).into();
    assert_eq!(m.kind(), MotifKind::Arc);
    assert_eq!(m.kind().as_str(), "arc");
}

#[test]
#[should_panic(expected = "step count must be positive")]
fn zero_steps_is_a_contract_violation() {
    let _ = LineAnim::new(Point::ZERO, Point::new(1.0, 1.0), 0, brush::Pen::plain(Hsla::ink(1.0), 1.0));
}
