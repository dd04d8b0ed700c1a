use super::*;
use crate::palette::Hsla;

#[test]
fn brush_line_draws_three_strokes_per_step() {
    let pen = Pen::brush(Hsla::ink(0.85), 6.0);
    let mut m = LineAnim::new(Point::new(0.0, 0.0), Point::new(0.0, 300.0), 3, pen);
    let mut dl = DrawList::new();
    let ctx = StepCtx::new(crate::foundation::core::FrameIndex(1), 0);
    assert!(m.step(&ctx, &mut dl));
    assert_eq!(dl.len(), 3);
    assert!(m.step(&ctx, &mut dl));
    assert!(!m.step(&ctx, &mut dl));
    assert_eq!(dl.len(), 9);
    assert!(m.pen().brush);
}

#[test]
fn degenerate_line_still_counts_steps() {
    let p = Point::new(5.0, 5.0);
    let mut m = LineAnim::new(p, p, 2, Pen::plain(Hsla::ink(0.8), 1.0));
    let mut dl = DrawList::new();
    let ctx = StepCtx::new(crate::foundation::core::FrameIndex(1), 0);
    assert!(m.step(&ctx, &mut dl));
    assert!(!m.step(&ctx, &mut dl));
    assert!(dl.is_empty());
    assert_eq!(m.endpoints(), (p, p));
}
