#![forbid(unsafe_code)]

pub mod anchors;
pub mod background;
pub mod compositor;
pub mod config;
pub mod dispatch;
pub mod ease;
mod foundation;
pub mod input;
pub mod lifecycle;
pub mod motif;
pub mod palette;
pub mod render;
pub mod rng;
pub mod script;
pub mod session;
pub mod sketch;

pub use anchors::{Anchor, AnchorField, VanishingPoints};
pub use background::BackgroundStyle;
pub use compositor::FrameCompositor;
pub use config::{
    AnchorLayout, CapPolicy, DispatchWeights, ResizePolicy, SessionConfig, Span, VanishingStyle,
};
pub use dispatch::{DispatchOutcome, DragEvent};
pub use ease::Ease;
pub use foundation::core::{Affine, BezPath, Canvas, FrameIndex, Point, Rect, Rgba8Premul, Vec2};
pub use foundation::error::{KandinskyError, KandinskyResult};
pub use foundation::math::{lerp, map_clamped, map_range};
pub use input::{InputEvent, Touch, TouchTracker};
pub use lifecycle::{Counters, Lifecycle};
pub use motif::{Easing, KandinskyShape, Motif, MotifKind, StepCtx, Steppable};
pub use palette::{ColorVariety, Hsla, Palette, PaletteStyle, Scheme};
pub use render::{CpuRasterizer, DrawList, FrameRGBA, Surface};
pub use rng::SessionRng;
pub use script::{InputScript, ScriptReport, TimedEvent};
pub use session::{Layer, SessionState};
pub use sketch::{Sketch, SketchAction};
