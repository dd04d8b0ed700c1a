use super::{StepCtx, Steppable, brush::Pen};
use crate::{
    foundation::{core::Point, math::lerp},
    render::DrawList,
};

/// Straight stroke revealed one sub-segment per step.
#[derive(Clone, Debug)]
pub struct LineAnim {
    from: Point,
    to: Point,
    steps: u32,
    i: u32,
    pen: Pen,
}

impl LineAnim {
    pub fn new(from: Point, to: Point, steps: u32, pen: Pen) -> Self {
        assert!(steps > 0, "line step count must be positive");
        Self {
            from,
            to,
            steps,
            i: 0,
            pen,
        }
    }

    pub fn pen(&self) -> &Pen {
        &self.pen
    }

    pub fn endpoints(&self) -> (Point, Point) {
        (self.from, self.to)
    }

    fn at(&self, t: f64) -> Point {
        Point::new(lerp(self.from.x, self.to.x, t), lerp(self.from.y, self.to.y, t))
    }
}

impl Steppable for LineAnim {
    fn step(&mut self, _ctx: &StepCtx, dl: &mut DrawList) -> bool {
        if self.i >= self.steps {
            return false;
        }
        let n = f64::from(self.steps);
        let t0 = f64::from(self.i) / n;
        let t1 = f64::from(self.i + 1) / n;
        self.pen.segment(dl, self.at(t0), self.at(t1), (t0 + t1) * 0.5);
        self.i += 1;
        self.i < self.steps
    }

    fn budget(&self) -> usize {
        self.steps as usize
    }
}

#[cfg(test)]
#[path = "../../tests/unit/motif/line.rs"]
mod tests;
