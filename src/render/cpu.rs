use std::sync::Arc;

use kurbo::Shape as _;

use crate::{
    foundation::{
        core::{Canvas, Point, Rect},
        error::{KandinskyError, KandinskyResult},
    },
    render::{
        composite,
        plan::{DrawList, DrawOp, Paint},
        surface::{Surface, extent_u16},
    },
};

/// Rasterizes recorded [`DrawList`]s with `vello_cpu` and composites the result onto a
/// [`Surface`] (premultiplied source-over).
///
/// The render context and the scratch pixmap are reused across calls while the extent
/// stays the same.
#[derive(Default)]
pub struct CpuRasterizer {
    ctx: Option<vello_cpu::RenderContext>,
    scratch: Option<(Canvas, vello_cpu::Pixmap)>,
}

impl std::fmt::Debug for CpuRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuRasterizer")
            .field("has_ctx", &self.ctx.is_some())
            .finish_non_exhaustive()
    }
}

impl CpuRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, list: &DrawList, target: &mut Surface) -> KandinskyResult<()> {
        if list.is_empty() {
            return Ok(());
        }
        let canvas = target.canvas();
        let (w, h) = extent_u16(canvas)?;

        let mut scratch = match self.scratch.take() {
            Some((c, p)) if c == canvas => p,
            _ => vello_cpu::Pixmap::new(w, h),
        };
        clear_pixmap(&mut scratch);

        self.with_ctx_mut(w, h, |ctx| {
            for op in list.ops() {
                draw_op(ctx, op, canvas)?;
            }
            ctx.flush();
            ctx.render_to_pixmap(&mut scratch);
            Ok(())
        })?;

        let out = composite::premul_over_in_place(target.data_mut(), scratch.data_as_u8_slice());
        self.scratch = Some((canvas, scratch));
        out
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> KandinskyResult<R>,
    ) -> KandinskyResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx);
        self.ctx = Some(ctx);
        out
    }
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn draw_op(ctx: &mut vello_cpu::RenderContext, op: &DrawOp, canvas: Canvas) -> KandinskyResult<()> {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

    match op {
        DrawOp::Stroke { path, width, color } => {
            let [r, g, b, a] = color.to_rgba8();
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.set_stroke(
                vello_cpu::kurbo::Stroke::new(*width)
                    .with_caps(vello_cpu::kurbo::Cap::Round)
                    .with_join(vello_cpu::kurbo::Join::Round),
            );
            ctx.stroke_path(&bezpath_to_cpu(path));
        }
        DrawOp::Fill {
            path,
            paint: Paint::Solid(color),
        } => {
            let [r, g, b, a] = color.to_rgba8();
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_path(&bezpath_to_cpu(path));
        }
        DrawOp::Fill { path, paint } => {
            let Some(bounds) = pixel_bounds(path.bounding_box(), canvas) else {
                return Ok(());
            };
            let image = gradient_image(paint, bounds)?;
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::translate((
                f64::from(bounds.x0),
                f64::from(bounds.y0),
            )));
            ctx.set_paint(image);
            ctx.fill_path(&bezpath_to_cpu(path));
        }
    }
    Ok(())
}

#[derive(Clone, Copy, Debug)]
struct PixelBounds {
    x0: u32,
    y0: u32,
    w: u32,
    h: u32,
}

/// Integer pixel box covering `rect`, clipped to the canvas.
fn pixel_bounds(rect: Rect, canvas: Canvas) -> Option<PixelBounds> {
    let x0 = rect.x0.floor().max(0.0);
    let y0 = rect.y0.floor().max(0.0);
    let x1 = rect.x1.ceil().min(canvas.w());
    let y1 = rect.y1.ceil().min(canvas.h());
    if !(x1 > x0 && y1 > y0) {
        return None;
    }
    Some(PixelBounds {
        x0: x0 as u32,
        y0: y0 as u32,
        w: (x1 - x0) as u32,
        h: (y1 - y0) as u32,
    })
}

/// Evaluate a gradient paint into an image covering `bounds`, sampled at pixel centers.
fn gradient_image(paint: &Paint, bounds: PixelBounds) -> KandinskyResult<vello_cpu::Image> {
    let w: u16 = bounds
        .w
        .try_into()
        .map_err(|_| KandinskyError::render("gradient width exceeds u16"))?;
    let h: u16 = bounds
        .h
        .try_into()
        .map_err(|_| KandinskyError::render("gradient height exceeds u16"))?;

    let to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    let mut pixels = Vec::with_capacity(bounds.w as usize * bounds.h as usize);
    let mut may_have_opacities = false;
    for y in 0..bounds.h {
        for x in 0..bounds.w {
            let p = Point::new(
                f64::from(bounds.x0 + x) + 0.5,
                f64::from(bounds.y0 + y) + 0.5,
            );
            let [r, g, b, a] = paint.sample(p);
            let a = to_u8(a);
            may_have_opacities |= a != 255;
            pixels.push(vello_cpu::peniko::color::PremulRgba8 {
                r: to_u8(r).min(a),
                g: to_u8(g).min(a),
                b: to_u8(b).min(a),
                a,
            });
        }
    }

    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
