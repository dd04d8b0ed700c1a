use super::{StepCtx, Steppable};
use crate::{
    foundation::core::{Point, Vec2},
    palette::Hsla,
    render::DrawList,
};

/// Circular arc grown as a chain of chords.
#[derive(Clone, Debug)]
pub struct ArcAnim {
    center: Point,
    radius: f64,
    start: f64,
    sweep: f64,
    steps: u32,
    i: u32,
    color: Hsla,
    width: f64,
}

impl ArcAnim {
    pub fn new(
        center: Point,
        radius: f64,
        start: f64,
        sweep: f64,
        steps: u32,
        color: Hsla,
        width: f64,
    ) -> Self {
        assert!(steps > 0, "arc step count must be positive");
        Self {
            center,
            radius,
            start,
            sweep,
            steps,
            i: 0,
            color,
            width,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn sweep(&self) -> f64 {
        self.sweep
    }

    fn at(&self, t: f64) -> Point {
        let a = self.start + self.sweep * t;
        self.center + Vec2::from_angle(a) * self.radius
    }
}

impl Steppable for ArcAnim {
    fn step(&mut self, _ctx: &StepCtx, dl: &mut DrawList) -> bool {
        if self.i >= self.steps {
            return false;
        }
        let n = f64::from(self.steps);
        let a = self.at(f64::from(self.i) / n);
        let b = self.at(f64::from(self.i + 1) / n);
        dl.line(a, b, self.width, self.color);
        self.i += 1;
        self.i < self.steps
    }

    fn budget(&self) -> usize {
        self.steps as usize
    }
}
