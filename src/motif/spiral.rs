use std::f64::consts::TAU;

use super::{StepCtx, Steppable};
use crate::{
    foundation::{
        core::{Point, Vec2},
        math::map_range,
    },
    palette::Hsla,
    render::DrawList,
};

/// Slowdown floor for spirals; shapes slow down further.
const SPIRAL_SLOWDOWN_FLOOR: f64 = 0.4;

/// Archimedean spiral whose polyline is revealed point by point.
///
/// The whole revealed polyline is redrawn each step. Under load the reveal advances by
/// less than one point per step, but the step count is fixed and the final step always
/// reveals the complete spiral.
#[derive(Clone, Debug)]
pub struct SpiralAnim {
    center: Point,
    points: Vec<Point>, // steps + 1, relative to `center`
    steps: u32,
    i: u32,
    progress: f64,
    color: Hsla,
    width: f64,
}

impl SpiralAnim {
    pub fn new(
        center: Point,
        steps: u32,
        revolutions: f64,
        end_radius: f64,
        color: Hsla,
        width: f64,
    ) -> Self {
        assert!(steps > 0, "spiral step count must be positive");
        let n = f64::from(steps);
        let points = (0..=steps)
            .map(|i| {
                let i = f64::from(i);
                let angle = map_range(i, 0.0, n, 0.0, TAU * revolutions);
                let radius = map_range(i, 0.0, n, 0.0, end_radius);
                (Vec2::from_angle(angle) * radius).to_point()
            })
            .collect();
        Self {
            center,
            points,
            steps,
            i: 0,
            progress: 0.0,
            color,
            width,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Revealed points including the interpolated tip.
    fn revealed(&self) -> Vec<Point> {
        let whole = (self.progress.floor() as usize).min(self.points.len() - 1);
        let mut out: Vec<Point> = self.points[..=whole]
            .iter()
            .map(|p| *p + self.center.to_vec2())
            .collect();
        let partial = self.progress - whole as f64;
        if whole < self.steps as usize && partial > 0.0 {
            let tip = self.points[whole].lerp(self.points[whole + 1], partial);
            out.push(tip + self.center.to_vec2());
        }
        out
    }
}

impl Steppable for SpiralAnim {
    fn step(&mut self, ctx: &StepCtx, dl: &mut DrawList) -> bool {
        if self.i >= self.steps {
            return false;
        }
        self.i += 1;
        let done = self.i >= self.steps;
        self.progress = if done {
            f64::from(self.steps)
        } else {
            (self.progress + ctx.slowdown(SPIRAL_SLOWDOWN_FLOOR)).min(f64::from(self.steps))
        };
        dl.polyline(&self.revealed(), self.width, self.color);
        !done
    }

    fn budget(&self) -> usize {
        self.steps as usize
    }
}
