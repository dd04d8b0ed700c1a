use crate::{
    anchors::{AnchorField, VanishingPoints},
    config::{ResizePolicy, SessionConfig},
    foundation::{core::Canvas, error::KandinskyResult},
    lifecycle::{Counters, Lifecycle},
    motif::{KandinskyShape, Motif},
    palette::{Hsla, Palette},
    rng::{SessionRng, time_seed},
};

/// Which live list a motif was placed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    /// Strokes accumulating under the shapes.
    BackgroundInk,
    /// Lattices; they share the background ink surface.
    Lattice,
    /// Strokes accumulating over the shapes.
    ForegroundInk,
    /// Permanent easing shapes.
    Shapes,
}

/// The whole mutable state of one composition.
///
/// Dispatch and the frame compositor are the only writers. `reset` rebuilds everything
/// from a single seed.
#[derive(Debug)]
pub struct SessionState {
    pub(crate) config: SessionConfig,
    pub(crate) canvas: Canvas,
    pub(crate) rng: SessionRng,
    pub(crate) seed: u64,
    pub(crate) bg_seed: u64,
    pub(crate) palette: Palette,
    pub(crate) anchors: AnchorField,
    pub(crate) vanishing: VanishingPoints,

    pub(crate) skeletons: Vec<KandinskyShape>,
    pub(crate) ornaments: Vec<KandinskyShape>,
    pub(crate) line_anims: Vec<Motif>,
    pub(crate) lattice_anims: Vec<Motif>,
    pub(crate) foreground_anims: Vec<Motif>,

    pub(crate) skeleton_colors: Vec<Hsla>,
    pub(crate) counters: Counters,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) last_accept_ms: Option<f64>,
}

impl SessionState {
    /// Validate `config` and build a session seeded from `config.seed`, or the clock.
    pub fn new(config: SessionConfig, canvas: Canvas) -> KandinskyResult<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(time_seed);
        Ok(Self::build(config, canvas, seed))
    }

    fn build(config: SessionConfig, canvas: Canvas, seed: u64) -> Self {
        let mut rng = SessionRng::seeded(seed);
        let palette = Palette::generate(&mut rng, config.palette);
        let bg_seed = rng.next_u64();
        let anchors = AnchorField::generate(
            &mut rng,
            canvas,
            config.anchor_count,
            config.trigger_distance,
            config.anchor_layout,
        );
        let vanishing = VanishingPoints::generate(&mut rng, canvas, config.vanishing);
        let lifecycle = Lifecycle::new(config.cap);
        Self {
            config,
            canvas,
            rng,
            seed,
            bg_seed,
            palette,
            anchors,
            vanishing,
            skeletons: Vec::new(),
            ornaments: Vec::new(),
            line_anims: Vec::new(),
            lattice_anims: Vec::new(),
            foreground_anims: Vec::new(),
            skeleton_colors: Vec::new(),
            counters: Counters::default(),
            lifecycle,
            last_accept_ms: None,
        }
    }

    /// Start over with the configured seed, or a fresh one from the clock.
    pub fn reset(&mut self) {
        let seed = self.config.seed.unwrap_or_else(time_seed);
        self.reset_with_seed(seed);
    }

    #[tracing::instrument(skip(self), fields(canvas = ?self.canvas))]
    pub fn reset_with_seed(&mut self, seed: u64) {
        *self = Self::build(self.config.clone(), self.canvas, seed);
        tracing::info!(palette = self.palette.len(), anchors = self.anchors.len(), "session reset");
    }

    /// Adapt to a new canvas extent. Surfaces are the compositor's concern.
    pub fn resize(&mut self, canvas: Canvas) {
        match self.config.resize {
            ResizePolicy::Preserve => {
                self.canvas = canvas;
                self.anchors.resize(&mut self.rng, canvas);
                self.vanishing.resize(canvas);
            }
            ResizePolicy::Reset => {
                let bg_seed = self.bg_seed;
                let seed = self.config.seed.unwrap_or_else(time_seed);
                *self = Self::build(self.config.clone(), canvas, seed);
                self.bg_seed = bg_seed;
            }
        }
        tracing::info!(width = canvas.width, height = canvas.height, policy = ?self.config.resize, "session resized");
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn background_seed(&self) -> u64 {
        self.bg_seed
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn anchors(&self) -> &AnchorField {
        &self.anchors
    }

    /// Swap in a different anchor field, e.g. one built with [`AnchorField::from_positions`].
    pub fn set_anchors(&mut self, anchors: AnchorField) {
        self.anchors = anchors;
    }

    pub fn vanishing_points(&self) -> &VanishingPoints {
        &self.vanishing
    }

    pub fn skeletons(&self) -> &[KandinskyShape] {
        &self.skeletons
    }

    pub fn ornaments(&self) -> &[KandinskyShape] {
        &self.ornaments
    }

    pub fn line_anims(&self) -> &[Motif] {
        &self.line_anims
    }

    pub fn lattice_anims(&self) -> &[Motif] {
        &self.lattice_anims
    }

    pub fn foreground_anims(&self) -> &[Motif] {
        &self.foreground_anims
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn is_finished(&self) -> bool {
        self.lifecycle.is_finished()
    }

    /// Total length of every live list.
    pub fn live_elements(&self) -> usize {
        self.skeletons.len()
            + self.ornaments.len()
            + self.line_anims.len()
            + self.lattice_anims.len()
            + self.foreground_anims.len()
    }

    /// Element count that drives the load slowdown, or 0 when slowdown is off.
    pub(crate) fn load(&self) -> usize {
        if self.config.load_slowdown {
            self.live_elements()
        } else {
            0
        }
    }

    /// Record a pointer press towards the press cap.
    pub fn pointer_pressed(&mut self) {
        if self.is_finished() {
            return;
        }
        self.counters.pointer_presses += 1;
        self.check_lifecycle();
    }

    /// Latch the finished flag if the configured cap is reached.
    pub fn check_lifecycle(&mut self) -> bool {
        let live = self.live_elements();
        self.lifecycle.check(&self.counters, live)
    }

    pub(crate) fn list_mut(&mut self, layer: Layer) -> Option<&mut Vec<Motif>> {
        match layer {
            Layer::BackgroundInk => Some(&mut self.line_anims),
            Layer::Lattice => Some(&mut self.lattice_anims),
            Layer::ForegroundInk => Some(&mut self.foreground_anims),
            Layer::Shapes => None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
