use kurbo::{CubicBez, ParamCurve};

use super::{StepCtx, Steppable, brush::Pen};
use crate::{foundation::core::Point, render::DrawList};

/// Cubic bezier revealed one parameter slice per step.
#[derive(Clone, Debug)]
pub struct BezierAnim {
    curve: CubicBez,
    steps: u32,
    i: u32,
    pen: Pen,
}

impl BezierAnim {
    pub fn new(p0: Point, p1: Point, p2: Point, p3: Point, steps: u32, pen: Pen) -> Self {
        assert!(steps > 0, "bezier step count must be positive");
        Self {
            curve: CubicBez::new(p0, p1, p2, p3),
            steps,
            i: 0,
            pen,
        }
    }

    pub fn curve(&self) -> CubicBez {
        self.curve
    }

    pub fn pen(&self) -> &Pen {
        &self.pen
    }
}

impl Steppable for BezierAnim {
    fn step(&mut self, _ctx: &StepCtx, dl: &mut DrawList) -> bool {
        if self.i >= self.steps {
            return false;
        }
        let n = f64::from(self.steps);
        let t0 = f64::from(self.i) / n;
        let t1 = f64::from(self.i + 1) / n;
        let a = self.curve.eval(t0);
        let b = self.curve.eval(t1);
        self.pen.segment(dl, a, b, t1);
        self.i += 1;
        self.i < self.steps
    }

    fn budget(&self) -> usize {
        self.steps as usize
    }
}
