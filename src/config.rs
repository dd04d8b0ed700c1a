use crate::{
    background::BackgroundStyle,
    ease::Ease,
    foundation::error::{KandinskyError, KandinskyResult},
    palette::{ColorVariety, PaletteStyle},
};

/// Closed numeric interval sampled uniformly (or used as a map endpoint pair).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Span {
    pub lo: f64,
    pub hi: f64,
}

impl Span {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    fn is_finite(self) -> bool {
        self.lo.is_finite() && self.hi.is_finite()
    }
}

/// How anchors survive a canvas resize.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorLayout {
    /// Anchors keep normalized coordinates and are re-projected onto the new extent.
    #[default]
    Relative,
    /// Anchors are sampled afresh for the new extent.
    Regenerate,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VanishingStyle {
    /// Three points around the canvas: above center, right and left of the middle row.
    Fixed,
    /// Zero, one or two random points inside the canvas.
    #[default]
    Random,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizePolicy {
    /// Rescale the ink layers and keep every live motif.
    #[default]
    Preserve,
    /// Start a fresh composition, keeping only the background seed.
    Reset,
}

/// Threshold that finishes a composition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapPolicy {
    /// Count drag events that passed debounce and found an anchor.
    AcceptedDrags(u32),
    /// Count every pointer press, anchored or not.
    PointerPresses(u32),
    /// Sum of all live list lengths.
    LiveElements(usize),
}

impl Default for CapPolicy {
    fn default() -> Self {
        Self::AcceptedDrags(20)
    }
}

/// Cumulative-probability cut points of the main dispatch table.
/// Whatever probability mass is left over spawns an ornament shape.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DispatchWeights {
    pub line: f64,
    pub arc: f64,
    pub bezier: f64,
    pub lattice: f64,
    pub spiral: f64,
}

impl Default for DispatchWeights {
    fn default() -> Self {
        Self {
            line: 0.35,
            arc: 0.10,
            bezier: 0.05,
            lattice: 0.05,
            spiral: 0.05,
        }
    }
}

impl DispatchWeights {
    pub fn total(&self) -> f64 {
        self.line + self.arc + self.bezier + self.lattice + self.spiral
    }

    fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("line", self.line),
            ("arc", self.arc),
            ("bezier", self.bezier),
            ("lattice", self.lattice),
            ("spiral", self.spiral),
        ]
    }
}

/// Every tunable of a session. Fixed for the lifetime of a sketch.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub anchor_count: usize,
    pub trigger_distance: f64,
    pub anchor_layout: AnchorLayout,
    pub anchor_marker_radius: f64,

    pub line_steps: u32,
    pub arc_steps: u32,
    pub bezier_steps: u32,
    pub spiral_steps: u32,
    pub lattice_frame_delay: u64,

    pub shape_speed: Span,
    /// Upper speed bound multiplier reached at shape index 50.
    pub shape_speed_boost: f64,
    pub shape_ease: Ease,
    pub skeleton_multiplier: Span,
    /// Size multiplier at shape index 3 (`lo`) and 100 (`hi`).
    pub ornament_scale: Span,
    pub tangent_skeletons: bool,
    /// Fraction of the base unit below which open rect/triangle fall back to filled.
    pub open_min_size: f64,

    pub thick_stroke_chance: f64,
    pub thick_stroke_cap: u32,
    pub lattice_cap: u32,
    pub foreground_chance: f64,
    pub perspective_chance: f64,
    pub dispatch: DispatchWeights,

    pub cap: CapPolicy,
    pub debounce_ms: f64,
    pub load_slowdown: bool,

    pub palette: PaletteStyle,
    pub color_variety: ColorVariety,
    pub background: BackgroundStyle,
    pub vanishing: VanishingStyle,
    pub resize: ResizePolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            anchor_count: 300,
            trigger_distance: 25.0,
            anchor_layout: AnchorLayout::default(),
            anchor_marker_radius: 0.0,
            line_steps: 900,
            arc_steps: 540,
            bezier_steps: 360,
            spiral_steps: 100,
            lattice_frame_delay: 12,
            shape_speed: Span::new(0.001, 0.004),
            shape_speed_boost: 2.5,
            shape_ease: Ease::OutCubic,
            skeleton_multiplier: Span::new(1.8, 2.5),
            ornament_scale: Span::new(1.2, 0.5),
            tangent_skeletons: false,
            open_min_size: 0.06,
            thick_stroke_chance: 0.2,
            thick_stroke_cap: 2,
            lattice_cap: 2,
            foreground_chance: 0.3,
            perspective_chance: 0.4,
            dispatch: DispatchWeights::default(),
            cap: CapPolicy::default(),
            debounce_ms: 300.0,
            load_slowdown: true,
            palette: PaletteStyle::default(),
            color_variety: ColorVariety::default(),
            background: BackgroundStyle::default(),
            vanishing: VanishingStyle::default(),
            resize: ResizePolicy::default(),
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(s: &str) -> KandinskyResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json_pretty(&self) -> KandinskyResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> KandinskyResult<()> {
        if self.anchor_count == 0 {
            return Err(KandinskyError::config("anchor_count must be > 0"));
        }
        if !(self.trigger_distance.is_finite() && self.trigger_distance > 0.0) {
            return Err(KandinskyError::config("trigger_distance must be > 0"));
        }
        if !(self.anchor_marker_radius.is_finite() && self.anchor_marker_radius >= 0.0) {
            return Err(KandinskyError::config("anchor_marker_radius must be >= 0"));
        }

        for (name, steps) in [
            ("line_steps", self.line_steps),
            ("arc_steps", self.arc_steps),
            ("bezier_steps", self.bezier_steps),
            ("spiral_steps", self.spiral_steps),
        ] {
            if steps == 0 {
                return Err(KandinskyError::config(format!("{name} must be > 0")));
            }
        }
        if self.lattice_frame_delay == 0 {
            return Err(KandinskyError::config("lattice_frame_delay must be > 0"));
        }

        let s = self.shape_speed;
        if !s.is_finite() || s.lo <= 0.0 || s.lo > s.hi {
            return Err(KandinskyError::config(
                "shape_speed must satisfy 0 < lo <= hi",
            ));
        }
        if !(self.shape_speed_boost.is_finite() && self.shape_speed_boost >= 1.0) {
            return Err(KandinskyError::config("shape_speed_boost must be >= 1"));
        }
        let m = self.skeleton_multiplier;
        if !m.is_finite() || m.lo <= 0.0 || m.lo > m.hi {
            return Err(KandinskyError::config(
                "skeleton_multiplier must satisfy 0 < lo <= hi",
            ));
        }
        let o = self.ornament_scale;
        if !o.is_finite() || o.lo <= 0.0 || o.hi <= 0.0 {
            return Err(KandinskyError::config("ornament_scale endpoints must be > 0"));
        }
        if !(self.open_min_size.is_finite() && self.open_min_size >= 0.0) {
            return Err(KandinskyError::config("open_min_size must be >= 0"));
        }

        for (name, p) in [
            ("thick_stroke_chance", self.thick_stroke_chance),
            ("foreground_chance", self.foreground_chance),
            ("perspective_chance", self.perspective_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(KandinskyError::config(format!("{name} must be in [0, 1]")));
            }
        }
        for (name, w) in self.dispatch.entries() {
            if !(w.is_finite() && w >= 0.0) {
                return Err(KandinskyError::config(format!(
                    "dispatch.{name} must be >= 0"
                )));
            }
        }
        if self.dispatch.total() > 1.0 + 1e-9 {
            return Err(KandinskyError::config("dispatch weights must sum to <= 1"));
        }

        match self.cap {
            CapPolicy::AcceptedDrags(0) | CapPolicy::PointerPresses(0) | CapPolicy::LiveElements(0) => {
                return Err(KandinskyError::config("composition cap must be > 0"));
            }
            _ => {}
        }
        if !(self.debounce_ms.is_finite() && self.debounce_ms >= 0.0) {
            return Err(KandinskyError::config("debounce_ms must be >= 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
