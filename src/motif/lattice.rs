use super::{StepCtx, Steppable};
use crate::{
    foundation::core::{FrameIndex, Point, Vec2},
    palette::{Hsla, Palette},
    render::{DrawList, plan::polyline_path},
    rng::SessionRng,
};

/// Grid lines overshoot the cell block by this factor.
const LINE_OVERSHOOT: f64 = 1.2;
const LINE_WIDTH: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticeParams {
    pub n1: u32,
    pub n2: u32,
    pub angle1: f64,
    pub angle2: f64,
    pub spacing: f64,
    pub fill_alpha: f64,
    pub frame_delay: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Cells,
    Family1,
    Family2,
    Done,
}

#[derive(Clone, Debug)]
struct Cell {
    poly: [Point; 4],
    color: Hsla,
}

/// Parallelogram grid: cells filled one per step, then both line families outlined.
///
/// Steps are throttled: a call only does work once `frame_delay` frames have passed since
/// the last productive call, otherwise it is a no-op that reports "still running".
#[derive(Clone, Debug)]
pub struct LatticeAnim {
    origin: Point,
    v1: Vec2,
    v2: Vec2,
    n1: i64,
    n2: i64,
    cells: Vec<Cell>,
    stage: Stage,
    cell_idx: usize,
    l1: i64,
    l2: i64,
    delay: u64,
    last_frame: FrameIndex,
}

impl LatticeAnim {
    /// Cell colors are drawn from `palette` with the configured fill alpha.
    pub fn new(origin: Point, params: LatticeParams, rng: &mut SessionRng, palette: &Palette) -> Self {
        assert!(params.frame_delay > 0, "lattice frame delay must be positive");
        let v1 = Vec2::from_angle(params.angle1) * params.spacing;
        let v2 = Vec2::from_angle(params.angle2) * params.spacing;
        let (n1, n2) = (i64::from(params.n1), i64::from(params.n2));

        let mut cells = Vec::with_capacity(((2 * n1 + 1) * (2 * n2 + 1)) as usize);
        for i in -n1..=n1 {
            for j in -n2..=n2 {
                let at = |a: i64, b: i64| (v1 * a as f64 + v2 * b as f64).to_point();
                let base = palette
                    .pick(rng)
                    .unwrap_or_else(|| Hsla::hsl(rng.range(0.0, 360.0), 70.0, 50.0));
                cells.push(Cell {
                    poly: [at(i, j), at(i + 1, j), at(i + 1, j + 1), at(i, j + 1)],
                    color: base.with_alpha(params.fill_alpha),
                });
            }
        }

        Self {
            origin,
            v1,
            v2,
            n1,
            n2,
            cells,
            stage: Stage::Cells,
            cell_idx: 0,
            l1: -n1,
            l2: -n2,
            delay: params.frame_delay,
            last_frame: FrameIndex(0),
        }
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn line_count(&self) -> usize {
        (2 * self.n1 + 1 + 2 * self.n2 + 1) as usize
    }

    pub fn is_done(&self) -> bool {
        self.stage == Stage::Done
    }

    /// Line through `k * along` running parallel to `dir`, spanning the cell block of
    /// half-width `n` in that direction.
    fn grid_line(&self, along: Vec2, k: i64, dir: Vec2, n: i64) -> (Point, Point) {
        let base = self.origin + along * k as f64;
        // Cells along `dir` cover indices -n..=n+1; centre the segment on that block.
        let mid = base + dir * 0.5;
        let half = dir * ((2 * n + 1) as f64 * 0.5 * LINE_OVERSHOOT);
        (mid - half, mid + half)
    }

    fn draw_cell(&self, idx: usize, dl: &mut DrawList) {
        let Some(cell) = self.cells.get(idx) else {
            return;
        };
        let pts: Vec<Point> = cell.poly.iter().map(|p| *p + self.origin.to_vec2()).collect();
        if let Some(path) = polyline_path(&pts, true) {
            dl.fill_color(&path, cell.color);
        }
    }
}

impl Steppable for LatticeAnim {
    fn step(&mut self, ctx: &StepCtx, dl: &mut DrawList) -> bool {
        if self.stage == Stage::Done {
            return false;
        }
        if ctx.frame.since(self.last_frame) < self.delay {
            return true;
        }
        self.last_frame = ctx.frame;

        let ink = Hsla::ink(1.0);
        match self.stage {
            Stage::Cells => {
                self.draw_cell(self.cell_idx, dl);
                self.cell_idx += 1;
                if self.cell_idx >= self.cells.len() {
                    self.stage = Stage::Family1;
                }
            }
            Stage::Family1 => {
                let (a, b) = self.grid_line(self.v1, self.l1, self.v2, self.n2);
                dl.line(a, b, LINE_WIDTH, ink);
                self.l1 += 1;
                if self.l1 > self.n1 {
                    self.stage = Stage::Family2;
                }
            }
            Stage::Family2 => {
                let (a, b) = self.grid_line(self.v2, self.l2, self.v1, self.n1);
                dl.line(a, b, LINE_WIDTH, ink);
                self.l2 += 1;
                if self.l2 > self.n2 {
                    self.stage = Stage::Done;
                }
            }
            Stage::Done => {}
        }
        self.stage != Stage::Done
    }

    fn budget(&self) -> usize {
        self.cell_count() + self.line_count()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/motif/lattice.rs"]
mod tests;
