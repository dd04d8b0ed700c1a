use crate::foundation::core::Point;

/// One contact point reported by a touch host.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Touch {
    pub id: u64,
    pub pos: Point,
}

/// Host input, already reduced to canvas coordinates and a millisecond timestamp.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerPressed { pos: Point },
    PointerDragged { prev: Point, cur: Point },
    TouchStarted { touches: Vec<Touch> },
    TouchMoved { touches: Vec<Touch> },
    TouchEnded { touches: Vec<Touch> },
    Key { key: char },
    Resize { width: u32, height: u32 },
    Reset,
}

/// Turns single-finger touch moves into the `(prev, cur)` pairs a pointer drag carries.
///
/// Gestures with more than one finger are ignored for their whole duration.
#[derive(Clone, Copy, Debug, Default)]
pub struct TouchTracker {
    active: Option<Touch>,
    multi: bool,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the press position when a single-finger gesture begins.
    pub fn start(&mut self, touches: &[Touch]) -> Option<Point> {
        match touches {
            [t] if !self.multi => {
                self.active = Some(*t);
                Some(t.pos)
            }
            [] => None,
            _ => {
                self.active = None;
                self.multi = true;
                None
            }
        }
    }

    /// Returns the synthesized `(prev, cur)` pair for a tracked finger.
    pub fn moved(&mut self, touches: &[Touch]) -> Option<(Point, Point)> {
        if self.multi {
            return None;
        }
        let [t] = touches else {
            self.active = None;
            self.multi = touches.len() > 1;
            return None;
        };
        let prev = match self.active {
            Some(a) if a.id == t.id => a.pos,
            _ => t.pos,
        };
        self.active = Some(*t);
        Some((prev, t.pos))
    }

    /// `remaining` lists the fingers still down after the release.
    pub fn end(&mut self, remaining: &[Touch]) {
        if remaining.is_empty() {
            self.active = None;
            self.multi = false;
        } else if let Some(a) = self.active
            && !remaining.iter().any(|t| t.id == a.id)
        {
            self.active = None;
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.active.is_some()
    }
}
