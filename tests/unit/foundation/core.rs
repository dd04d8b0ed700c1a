use super::*;

#[test]
fn canvas_rejects_degenerate_extents() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    let c = Canvas::new(800, 600).unwrap();
    assert_eq!(c.base_unit(), 600.0);
    assert_eq!(c.center(), Point::new(400.0, 300.0));
}

#[test]
fn frame_index_distance_saturates() {
    let a = FrameIndex(5);
    let b = FrameIndex(17);
    assert_eq!(b.since(a), 12);
    assert_eq!(a.since(b), 0);
    assert_eq!(a.next(), FrameIndex(6));
}

#[test]
fn premultiply_rounds_like_straight_alpha_blend() {
    let p = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(p.a, 128);
    assert_eq!(p.r, 128);
    assert_eq!(p.g, 64);
    assert_eq!(p.b, 0);
    assert_eq!(Rgba8Premul::transparent().to_array(), [0, 0, 0, 0]);
}
