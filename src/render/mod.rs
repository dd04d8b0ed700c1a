//! CPU rendering: draw-list recording, rasterization and premultiplied compositing.

pub mod composite;
pub mod cpu;
pub mod plan;
pub mod surface;

pub use cpu::CpuRasterizer;
pub use plan::{DrawList, DrawOp, GradientStop, Paint};
pub use surface::{FrameRGBA, Surface};
