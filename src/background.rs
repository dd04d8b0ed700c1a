use crate::{
    foundation::{
        core::{Affine, Canvas, Point, Vec2},
        error::KandinskyResult,
        math::{hash_unit, lerp, map_range, smoothstep01},
    },
    palette::Hsla,
    render::{CpuRasterizer, DrawList, Surface, plan::polyline_path},
    rng::SessionRng,
};

/// Procedural backdrop painted once per reset or resize.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundStyle {
    /// Three independent fractal value-noise channels.
    Noise,
    /// Warm paper with translucent multiply-blended splotches.
    #[default]
    Watercolor,
}

const NOISE_SCALE: f64 = 0.002;
const NOISE_OCTAVES: u32 = 4;
const NOISE_FALLOFF: f64 = 0.5;
const CHANNEL_OFFSETS: [f64; 3] = [0.0, 10_000.0, 20_000.0];

const POLYS_PER_SPLOTCH: usize = 150;
const DISPLACEMENT_ROUNDS: usize = 4;
const DISPLACEMENT_VARIANCE: f64 = 0.5;
const PLACEMENT_ATTEMPTS: usize = 20;

/// Paint the backdrop for `canvas`. The same `seed` always yields the same image.
pub fn paint_background(
    style: BackgroundStyle,
    seed: u64,
    canvas: Canvas,
    raster: &mut CpuRasterizer,
) -> KandinskyResult<Surface> {
    let mut surface = Surface::new(canvas)?;
    match style {
        BackgroundStyle::Noise => paint_noise(&mut surface, seed),
        BackgroundStyle::Watercolor => paint_watercolor(&mut surface, seed, raster)?,
    }
    Ok(surface)
}

/// Smooth value noise on the integer lattice.
fn value_noise(seed: u64, x: f64, y: f64) -> f64 {
    let xf = x.floor();
    let yf = y.floor();
    let (xi, yi) = (xf as i64, yf as i64);
    let tx = smoothstep01(x - xf);
    let ty = smoothstep01(y - yf);

    let v00 = hash_unit(seed, xi, yi);
    let v10 = hash_unit(seed, xi + 1, yi);
    let v01 = hash_unit(seed, xi, yi + 1);
    let v11 = hash_unit(seed, xi + 1, yi + 1);
    lerp(lerp(v00, v10, tx), lerp(v01, v11, tx), ty)
}

/// Octave sum in `[0, 1)`; each octave doubles frequency and halves amplitude.
pub fn fractal_noise(seed: u64, x: f64, y: f64) -> f64 {
    let mut amp = NOISE_FALLOFF;
    let mut freq = 1.0;
    let mut sum = 0.0;
    for octave in 0..NOISE_OCTAVES {
        sum += amp * value_noise(seed.wrapping_add(u64::from(octave)), x * freq, y * freq);
        amp *= NOISE_FALLOFF;
        freq *= 2.0;
    }
    sum
}

fn paint_noise(surface: &mut Surface, seed: u64) {
    let canvas = surface.canvas();
    let width = canvas.width as usize;
    let data = surface.data_mut();
    for (i, px) in data.chunks_exact_mut(4).enumerate() {
        let x = (i % width) as f64 * NOISE_SCALE;
        let y = (i / width) as f64 * NOISE_SCALE;
        for (c, offset) in CHANNEL_OFFSETS.iter().enumerate() {
            let v = fractal_noise(seed, x + offset, y);
            px[c] = (v * 255.0).round().clamp(0.0, 255.0) as u8;
        }
        px[3] = 255;
    }
}

#[derive(Clone, Copy, Debug)]
struct Splotch {
    center: Point,
    radius: f64,
}

fn place_splotches(rng: &mut SessionRng, canvas: Canvas) -> Vec<Splotch> {
    let base = canvas.base_unit();
    let count = rng.int(4, 10);
    let base_radius = map_range(f64::from(count), 4.0, 10.0, base * 0.22, base * 0.08);

    let mut placed: Vec<Splotch> = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let radius = rng.range(base_radius * 0.85, base_radius * 1.15);
        let mut center = Point::ZERO;
        for _ in 0..PLACEMENT_ATTEMPTS {
            center = Point::new(
                rng.range(radius, canvas.w() - radius),
                rng.range(radius, canvas.h() - radius),
            );
            let overlapping = placed
                .iter()
                .any(|s| (s.center - center).hypot() < (radius + s.radius) * 0.65);
            if !overlapping {
                break;
            }
        }
        // After the last attempt the final candidate is kept regardless.
        placed.push(Splotch { center, radius });
    }
    placed
}

/// Regular `sides`-gon of `radius` around the origin with a random start angle.
fn base_polygon(rng: &mut SessionRng, radius: f64, sides: usize) -> Vec<Point> {
    let start = rng.angle();
    let step = std::f64::consts::TAU / sides as f64;
    (0..sides)
        .map(|i| {
            let a = start + step * i as f64;
            Point::new(a.cos() * radius, a.sin() * radius)
        })
        .collect()
}

/// Midpoint displacement, one pass per round: every edge gains a jittered midpoint whose
/// deviation scales with the edge length.
fn deform(rng: &mut SessionRng, points: Vec<Point>, rounds: usize, variance: f64) -> Vec<Point> {
    let mut current = points;
    let mut next = Vec::with_capacity(current.len() * 2);
    for _ in 0..rounds {
        next.clear();
        let n = current.len();
        for i in 0..n {
            let p1 = current[i];
            let p2 = current[(i + 1) % n];
            next.push(p1);
            let len = (p2 - p1).hypot();
            let mid = p1.midpoint(p2)
                + Vec2::new(
                    rng.gaussian(0.0, variance * len),
                    rng.gaussian(0.0, variance * len),
                );
            next.push(mid);
        }
        std::mem::swap(&mut current, &mut next);
    }
    current
}

fn paint_watercolor(surface: &mut Surface, seed: u64, raster: &mut CpuRasterizer) -> KandinskyResult<()> {
    let canvas = surface.canvas();
    let mut rng = SessionRng::seeded(seed);
    surface.fill(Hsla::from_hsb(40.0, 20.0, 90.0, 1.0).to_premul());

    let alpha = (100.0 / POLYS_PER_SPLOTCH as f64) * 2.0 / 100.0;
    let mut dl = DrawList::new();
    for splotch in place_splotches(&mut rng, canvas) {
        let zone_hue = rng.range(0.0, 360.0);
        let forms: Vec<Vec<Point>> = (0..POLYS_PER_SPLOTCH)
            .map(|k| {
                let sides = 3 + (hash_unit(seed, k as i64, 0) * 7.0) as usize;
                let poly = base_polygon(&mut rng, splotch.radius, sides);
                deform(&mut rng, poly, DISPLACEMENT_ROUNDS, DISPLACEMENT_VARIANCE)
            })
            .collect();

        let std = splotch.radius / 10.0;
        for form in forms {
            let jitter = Vec2::new(rng.gaussian(0.0, std), rng.gaussian(0.0, std));
            let color = Hsla::from_hsb(rng.gaussian(zone_hue, 5.0), 80.0, 90.0, alpha);
            let Some(path) = polyline_path(&form, true) else {
                continue;
            };
            dl.with_transform(Affine::translate(splotch.center.to_vec2() + jitter), |dl| {
                dl.fill_color(&path, color);
            });
        }
    }

    let mut layer = Surface::new(canvas)?;
    raster.render(&dl, &mut layer)?;
    surface.multiply(&layer)?;
    // Paper stays opaque wherever the multiply touched it.
    for px in surface.data_mut().chunks_exact_mut(4) {
        px[3] = 255;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/background.rs"]
mod tests;
