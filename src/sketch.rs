use crate::{
    compositor::FrameCompositor,
    config::SessionConfig,
    dispatch::{DispatchOutcome, DragEvent},
    foundation::{
        core::{Canvas, Point},
        error::KandinskyResult,
    },
    input::{InputEvent, Touch, TouchTracker},
    render::FrameRGBA,
    session::SessionState,
};

/// Something the host should do on the sketch's behalf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SketchAction {
    /// Save the current frame; `file_stem` carries no extension.
    ExportFrame { file_stem: String },
}

/// Host-facing façade: one session, its compositor and the touch adapter.
#[derive(Debug)]
pub struct Sketch {
    state: SessionState,
    compositor: FrameCompositor,
    touch: TouchTracker,
}

impl Sketch {
    pub fn new(config: SessionConfig, width: u32, height: u32) -> KandinskyResult<Self> {
        let state = SessionState::new(config, Canvas::new(width, height)?)?;
        let compositor = FrameCompositor::new(&state)?;
        Ok(Self {
            state,
            compositor,
            touch: TouchTracker::new(),
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Direct access for hosts that inject anchors or drive dispatch themselves.
    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn compositor(&self) -> &FrameCompositor {
        &self.compositor
    }

    pub fn frame(&self) -> &FrameRGBA {
        self.compositor.frame()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn pointer_pressed(&mut self, _pos: Point, _time_ms: f64) {
        self.state.pointer_pressed();
    }

    pub fn pointer_dragged(&mut self, prev: Point, cur: Point, time_ms: f64) -> DispatchOutcome {
        self.state.dispatch(DragEvent::new(prev, cur, time_ms))
    }

    /// Returns `true` when the host should suppress its default scrolling.
    pub fn touch_started(&mut self, touches: &[Touch], time_ms: f64) -> bool {
        if let Some(pos) = self.touch.start(touches) {
            self.pointer_pressed(pos, time_ms);
        }
        true
    }

    /// Single-finger moves dispatch like a pointer drag. Always suppresses scrolling.
    pub fn touch_moved(&mut self, touches: &[Touch], time_ms: f64) -> bool {
        if let Some((prev, cur)) = self.touch.moved(touches) {
            self.pointer_dragged(prev, cur, time_ms);
        }
        true
    }

    pub fn touch_ended(&mut self, remaining: &[Touch]) -> bool {
        self.touch.end(remaining);
        true
    }

    pub fn key_pressed(&mut self, key: char) -> Option<SketchAction> {
        match key {
            's' | 'S' => Some(SketchAction::ExportFrame {
                file_stem: format!("kandinsky-{}", self.state.seed()),
            }),
            _ => None,
        }
    }

    pub fn tick(&mut self) -> KandinskyResult<&FrameRGBA> {
        self.compositor.tick(&mut self.state)
    }

    pub fn resize(&mut self, width: u32, height: u32) -> KandinskyResult<()> {
        let canvas = Canvas::new(width, height)?;
        if canvas == self.state.canvas() {
            return Ok(());
        }
        self.state.resize(canvas);
        self.compositor.resize(&self.state)
    }

    pub fn reset(&mut self) -> KandinskyResult<()> {
        self.state.reset();
        self.touch = TouchTracker::new();
        self.compositor.reset(&self.state)
    }

    /// Route one host event. Returns the action the host should carry out, if any.
    pub fn handle(&mut self, event: &InputEvent, time_ms: f64) -> KandinskyResult<Option<SketchAction>> {
        match event {
            InputEvent::PointerPressed { pos } => self.pointer_pressed(*pos, time_ms),
            InputEvent::PointerDragged { prev, cur } => {
                self.pointer_dragged(*prev, *cur, time_ms);
            }
            InputEvent::TouchStarted { touches } => {
                self.touch_started(touches, time_ms);
            }
            InputEvent::TouchMoved { touches } => {
                self.touch_moved(touches, time_ms);
            }
            InputEvent::TouchEnded { touches } => {
                self.touch_ended(touches);
            }
            InputEvent::Key { key } => return Ok(self.key_pressed(*key)),
            InputEvent::Resize { width, height } => self.resize(*width, *height)?,
            InputEvent::Reset => self.reset()?,
        }
        Ok(None)
    }
}

#[cfg(test)]
#[path = "../tests/unit/sketch.rs"]
mod tests;
