//! Headless driving: a timed list of host events replayed against a [`Sketch`].

use crate::{
    anchors::AnchorField,
    foundation::{
        core::{FrameIndex, Point, Vec2},
        error::{KandinskyError, KandinskyResult},
    },
    input::InputEvent,
    render::FrameRGBA,
    rng::SessionRng,
    sketch::{Sketch, SketchAction},
};

/// Gap between autopilot strokes; comfortably above the default debounce window.
const AUTOPILOT_GAP_MS: f64 = 450.0;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimedEvent {
    pub at_ms: f64,
    #[serde(flatten)]
    pub event: InputEvent,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InputScript {
    /// Simulated time between two ticks.
    pub frame_ms: f64,
    /// Sorted by `at_ms`.
    pub events: Vec<TimedEvent>,
}

impl Default for InputScript {
    fn default() -> Self {
        Self {
            frame_ms: 1000.0 / 60.0,
            events: Vec::new(),
        }
    }
}

/// What a script run produced besides frames.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct ScriptReport {
    pub frames: u64,
    pub events_applied: usize,
    pub exports: Vec<String>,
    pub finished: bool,
}

impl InputScript {
    pub fn from_json_str(s: &str) -> KandinskyResult<Self> {
        let mut script: Self = serde_json::from_str(s)?;
        script.validate()?;
        script.sort();
        Ok(script)
    }

    pub fn validate(&self) -> KandinskyResult<()> {
        if !(self.frame_ms.is_finite() && self.frame_ms > 0.0) {
            return Err(KandinskyError::config("frame_ms must be > 0"));
        }
        if self.events.iter().any(|e| !e.at_ms.is_finite()) {
            return Err(KandinskyError::config("event times must be finite"));
        }
        Ok(())
    }

    fn sort(&mut self) {
        self.events.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));
    }

    /// Synthesize `strokes` press-and-drag gestures, each ending on a random anchor.
    pub fn autopilot(anchors: &AnchorField, strokes: usize, seed: u64, frame_ms: f64) -> Self {
        let mut rng = SessionRng::seeded(seed);
        let reach = (anchors.trigger_distance() * 0.5).max(1.0);
        let mut events = Vec::with_capacity(strokes * 2);
        for k in 0..strokes {
            let Some(anchor) = rng.pick(anchors.anchors()) else {
                break;
            };
            let cur = anchor.position;
            let prev: Point = cur - Vec2::from_angle(rng.angle()) * reach;
            let at_ms = AUTOPILOT_GAP_MS * (k + 1) as f64;
            events.push(TimedEvent {
                at_ms,
                event: InputEvent::PointerPressed { pos: prev },
            });
            events.push(TimedEvent {
                at_ms,
                event: InputEvent::PointerDragged { prev, cur },
            });
        }
        Self { frame_ms, events }
    }

    /// Time of the last event.
    pub fn duration_ms(&self) -> f64 {
        self.events.last().map_or(0.0, |e| e.at_ms)
    }
}

impl Sketch {
    /// Run `frames` ticks. Before tick `n`, every event due at `n * frame_ms` is applied;
    /// `on_frame` sees each assembled frame.
    #[tracing::instrument(skip_all, fields(frames = frames, events = script.events.len()))]
    pub fn run_script(
        &mut self,
        script: &InputScript,
        frames: u64,
        mut on_frame: impl FnMut(FrameIndex, &FrameRGBA) -> KandinskyResult<()>,
    ) -> KandinskyResult<ScriptReport> {
        script.validate()?;
        let mut report = ScriptReport::default();
        let mut pending = script.events.iter().peekable();
        for n in 0..frames {
            let now = n as f64 * script.frame_ms;
            while let Some(e) = pending.next_if(|e| e.at_ms <= now) {
                if let Some(SketchAction::ExportFrame { file_stem }) = self.handle(&e.event, e.at_ms)? {
                    report.exports.push(file_stem);
                }
                report.events_applied += 1;
            }
            self.tick()?;
            report.frames += 1;
            on_frame(self.compositor().frame_index(), self.frame())?;
        }
        report.finished = self.is_finished();
        tracing::info!(
            frames = report.frames,
            events = report.events_applied,
            finished = report.finished,
            "script done"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "../tests/unit/script.rs"]
mod tests;
