//! Animated motifs.
//!
//! Two progress models live here. [`Steppable`] motifs advance through a fixed budget of
//! discrete steps, draw only the new fragment each step into an ink layer, and report when
//! they are finished so their owner can drop them. [`Easing`] shapes grow continuously
//! towards a target size and are redrawn in full every frame; they never finish.

pub mod arc;
pub mod bezier;
pub mod brush;
pub mod lattice;
pub mod line;
pub mod shape;
pub mod spiral;

pub use arc::ArcAnim;
pub use bezier::BezierAnim;
pub use lattice::{LatticeAnim, LatticeParams};
pub use line::LineAnim;
pub use shape::{KandinskyShape, ShapeForm, ShapeRole, ShapeSeed};
pub use spiral::SpiralAnim;

use crate::{foundation::core::FrameIndex, foundation::math::map_clamped, render::DrawList};

/// Element count above which animations start to slow down.
pub const SLOWDOWN_START: usize = 16;
/// Element count at which the slowdown bottoms out.
pub const SLOWDOWN_FULL: usize = 33;

#[derive(Clone, Copy, Debug)]
pub struct StepCtx {
    pub frame: FrameIndex, // frames ticked since reset
    pub load: usize,       // live elements, or 0 with slowdown disabled
}

impl StepCtx {
    pub fn new(frame: FrameIndex, load: usize) -> Self {
        Self { frame, load }
    }

    /// Progress multiplier under the current load, bottoming out at `floor`.
    pub fn slowdown(&self, floor: f64) -> f64 {
        if self.load <= SLOWDOWN_START {
            return 1.0;
        }
        map_clamped(
            self.load as f64,
            SLOWDOWN_START as f64,
            SLOWDOWN_FULL as f64,
            1.0,
            floor,
        )
    }
}

/// Discrete-step animation drawing into an ink layer.
pub trait Steppable {
    /// Draw the next fragment. Returns `false` on the call that finishes the motif; calling
    /// again afterwards draws nothing and keeps returning `false`.
    fn step(&mut self, ctx: &StepCtx, dl: &mut DrawList) -> bool;

    /// Total number of calls to [`Steppable::step`] that perform work.
    fn budget(&self) -> usize;
}

/// Continuous growth towards a target size.
pub trait Easing {
    fn advance(&mut self, ctx: &StepCtx);

    /// Easing parameter in `[0, 1]`.
    fn t(&self) -> f64;

    /// Draw at the current eased size.
    fn draw(&self, dl: &mut DrawList);

    fn is_grown(&self) -> bool {
        self.t() >= 1.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotifKind {
    Line,
    Arc,
    Bezier,
    Spiral,
    Lattice,
}

impl MotifKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MotifKind::Line => "line",
            MotifKind::Arc => "arc",
            MotifKind::Bezier => "bezier",
            MotifKind::Spiral => "spiral",
            MotifKind::Lattice => "lattice",
        }
    }
}

/// Every steppable motif, closed over its variants.
#[derive(Clone, Debug)]
pub enum Motif {
    Line(LineAnim),
    Arc(ArcAnim),
    Bezier(BezierAnim),
    Spiral(SpiralAnim),
    Lattice(LatticeAnim),
}

impl Motif {
    pub fn kind(&self) -> MotifKind {
        match self {
            Motif::Line(_) => MotifKind::Line,
            Motif::Arc(_) => MotifKind::Arc,
            Motif::Bezier(_) => MotifKind::Bezier,
            Motif::Spiral(_) => MotifKind::Spiral,
            Motif::Lattice(_) => MotifKind::Lattice,
        }
    }
}

impl Steppable for Motif {
    fn step(&mut self, ctx: &StepCtx, dl: &mut DrawList) -> bool {
        match self {
            Motif::Line(m) => m.step(ctx, dl),
            Motif::Arc(m) => m.step(ctx, dl),
            Motif::Bezier(m) => m.step(ctx, dl),
            Motif::Spiral(m) => m.step(ctx, dl),
            Motif::Lattice(m) => m.step(ctx, dl),
        }
    }

    fn budget(&self) -> usize {
        match self {
            Motif::Line(m) => m.budget(),
            Motif::Arc(m) => m.budget(),
            Motif::Bezier(m) => m.budget(),
            Motif::Spiral(m) => m.budget(),
            Motif::Lattice(m) => m.budget(),
        }
    }
}

impl From<LineAnim> for Motif {
    fn from(m: LineAnim) -> Self {
        Motif::Line(m)
    }
}

impl From<ArcAnim> for Motif {
    fn from(m: ArcAnim) -> Self {
        Motif::Arc(m)
    }
}

impl From<BezierAnim> for Motif {
    fn from(m: BezierAnim) -> Self {
        Motif::Bezier(m)
    }
}

impl From<SpiralAnim> for Motif {
    fn from(m: SpiralAnim) -> Self {
        Motif::Spiral(m)
    }
}

impl From<LatticeAnim> for Motif {
    fn from(m: LatticeAnim) -> Self {
        Motif::Lattice(m)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/motif/mod.rs"]
mod tests;
