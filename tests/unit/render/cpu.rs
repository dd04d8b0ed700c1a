use super::*;
use crate::{
    foundation::core::BezPath,
    palette::Hsla,
    render::plan::{GradientStop, polyline_path},
};

fn rect_path(x0: f64, y0: f64, x1: f64, y1: f64) -> BezPath {
    polyline_path(
        &[
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ],
        true,
    )
    .unwrap()
}

fn px(s: &Surface, x: u32, y: u32) -> [u8; 4] {
    s.to_frame().pixel(x, y).unwrap()
}

#[test]
fn solid_fill_covers_interior_only() {
    let canvas = Canvas::new(32, 32).unwrap();
    let mut target = Surface::new(canvas).unwrap();
    let mut dl = DrawList::new();
    dl.fill_color(&rect_path(4.0, 4.0, 20.0, 20.0), Hsla::hsl(0.0, 100.0, 50.0));

    let mut r = CpuRasterizer::new();
    r.render(&dl, &mut target).unwrap();
    assert_eq!(px(&target, 10, 10), [255, 0, 0, 255]);
    assert_eq!(px(&target, 28, 28), [0, 0, 0, 0]);
}

#[test]
fn render_composites_over_existing_content() {
    let canvas = Canvas::new(16, 16).unwrap();
    let mut target = Surface::new(canvas).unwrap();
    target.fill(crate::foundation::core::Rgba8Premul::from_straight_rgba(0, 0, 255, 255));

    let mut dl = DrawList::new();
    dl.fill_color(&rect_path(0.0, 0.0, 8.0, 16.0), Hsla::hsl(0.0, 100.0, 50.0));
    let mut r = CpuRasterizer::new();
    r.render(&dl, &mut target).unwrap();
    assert_eq!(px(&target, 2, 8), [255, 0, 0, 255]);
    assert_eq!(px(&target, 12, 8), [0, 0, 255, 255]);
}

#[test]
fn stroke_marks_pixels_along_the_segment() {
    let canvas = Canvas::new(32, 32).unwrap();
    let mut target = Surface::new(canvas).unwrap();
    let mut dl = DrawList::new();
    dl.line(Point::new(2.0, 16.0), Point::new(30.0, 16.0), 4.0, Hsla::black());
    let mut r = CpuRasterizer::new();
    r.render(&dl, &mut target).unwrap();
    assert_eq!(px(&target, 16, 16)[3], 255);
    assert_eq!(px(&target, 16, 4)[3], 0);
}

#[test]
fn linear_gradient_fades_across_the_shape() {
    let canvas = Canvas::new(40, 10).unwrap();
    let mut target = Surface::new(canvas).unwrap();
    let c = Hsla::hsl(0.0, 100.0, 50.0);
    let mut dl = DrawList::new();
    dl.fill(
        &rect_path(0.0, 0.0, 40.0, 10.0),
        Paint::Linear {
            start: Point::new(0.0, 5.0),
            end: Point::new(40.0, 5.0),
            stops: vec![GradientStop::new(0.0, c), GradientStop::new(1.0, c.with_alpha(0.0))],
        },
    );
    let mut r = CpuRasterizer::new();
    r.render(&dl, &mut target).unwrap();
    let left = px(&target, 1, 5)[3];
    let right = px(&target, 38, 5)[3];
    assert!(left > 200, "left={left}");
    assert!(right < 40, "right={right}");
}

#[test]
fn empty_list_and_offscreen_gradient_are_noops() {
    let canvas = Canvas::new(8, 8).unwrap();
    let mut target = Surface::new(canvas).unwrap();
    let mut r = CpuRasterizer::new();
    r.render(&DrawList::new(), &mut target).unwrap();

    let mut dl = DrawList::new();
    dl.fill(
        &rect_path(100.0, 100.0, 120.0, 120.0),
        Paint::Radial {
            center: Point::new(110.0, 110.0),
            r0: 0.0,
            r1: 10.0,
            stops: vec![GradientStop::new(0.0, Hsla::black())],
        },
    );
    r.render(&dl, &mut target).unwrap();
    assert!(target.data().iter().all(|&b| b == 0));
}

#[test]
fn rasterizer_follows_target_extent_changes() {
    let mut r = CpuRasterizer::new();
    let mut dl = DrawList::new();
    dl.fill_color(&rect_path(0.0, 0.0, 4.0, 4.0), Hsla::black());
    for (w, h) in [(8, 8), (16, 4), (8, 8)] {
        let mut target = Surface::new(Canvas::new(w, h).unwrap()).unwrap();
        r.render(&dl, &mut target).unwrap();
        assert_eq!(px(&target, 1, 1), [0, 0, 0, 255]);
    }
}
