use crate::config::CapPolicy;

/// Monotonic per-session counters. Only dispatch and the compositor advance them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct Counters {
    pub shapes: u32,             // last assigned shape index
    pub thick_strokes: u32,      // emphasized strokes dispatched
    pub lattices_spawned: u32,   // gates the lattice branch
    pub lattices_completed: u32, // lattices that ran to the end
    pub accepted_drags: u32,     // drags that reached an anchor
    pub pointer_presses: u32,
}

impl Counters {
    /// Assign the next shape index (1-based).
    pub fn next_shape_index(&mut self) -> u32 {
        self.shapes += 1;
        self.shapes
    }
}

/// Terminal "composition finished" flag and the cap that sets it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lifecycle {
    policy: CapPolicy,
    finished: bool,
}

impl Lifecycle {
    pub fn new(policy: CapPolicy) -> Self {
        Self {
            policy,
            finished: false,
        }
    }

    pub fn policy(&self) -> CapPolicy {
        self.policy
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn cap_reached(&self, counters: &Counters, live_elements: usize) -> bool {
        match self.policy {
            CapPolicy::AcceptedDrags(n) => counters.accepted_drags >= n,
            CapPolicy::PointerPresses(n) => counters.pointer_presses >= n,
            CapPolicy::LiveElements(n) => live_elements >= n,
        }
    }

    /// Latch the finished flag once the cap is reached. Returns `true` only on the call
    /// that finishes the composition.
    pub fn check(&mut self, counters: &Counters, live_elements: usize) -> bool {
        if self.finished || !self.cap_reached(counters, live_elements) {
            return false;
        }
        self.finished = true;
        tracing::info!(
            policy = ?self.policy,
            live_elements,
            accepted_drags = counters.accepted_drags,
            "composition finished"
        );
        true
    }
}
