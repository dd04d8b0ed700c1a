use crate::{foundation::core::Rgba8Premul, rng::SessionRng};

/// Color in HSL space: hue in degrees, saturation and lightness in percent, alpha in `0..=1`.
///
/// Equality is by value, which is what duplicate exclusion relies on.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Hsla {
    pub h: f64,
    pub s: f64,
    pub l: f64,
    pub a: f64,
}

impl Hsla {
    pub const fn new(h: f64, s: f64, l: f64, a: f64) -> Self {
        Self { h, s, l, a }
    }

    pub const fn hsl(h: f64, s: f64, l: f64) -> Self {
        Self::new(h, s, l, 1.0)
    }

    /// Near-black ink used by strokes and outlines.
    pub const fn ink(a: f64) -> Self {
        Self::new(0.0, 0.0, 15.0, a)
    }

    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Build from HSB/HSV components (percent) with alpha in `0..=1`.
    pub fn from_hsb(h: f64, s: f64, b: f64, a: f64) -> Self {
        let s = (s / 100.0).clamp(0.0, 1.0);
        let v = (b / 100.0).clamp(0.0, 1.0);
        let l = v * (1.0 - s / 2.0);
        let sl = if l <= 0.0 || l >= 1.0 {
            0.0
        } else {
            (v - l) / l.min(1.0 - l)
        };
        Self::new(wrap_hue(h), sl * 100.0, l * 100.0, a)
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    pub fn with_lightness(self, l: f64) -> Self {
        Self { l, ..self }
    }

    pub fn rotate_hue(self, degrees: f64) -> Self {
        Self {
            h: wrap_hue(self.h + degrees),
            ..self
        }
    }

    /// HSB brightness in percent.
    pub fn brightness(self) -> f64 {
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let l = (self.l / 100.0).clamp(0.0, 1.0);
        (l + s * l.min(1.0 - l)) * 100.0
    }

    /// Straight (non-premultiplied) RGBA in `0..=1`.
    pub fn to_rgba_f64(self) -> [f64; 4] {
        let h = wrap_hue(self.h) / 360.0;
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let l = (self.l / 100.0).clamp(0.0, 1.0);
        let a = self.a.clamp(0.0, 1.0);

        if s == 0.0 {
            return [l, l, l, a];
        }

        fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
            if t < 0.0 {
                t += 1.0;
            }
            if t > 1.0 {
                t -= 1.0;
            }
            if t < 1.0 / 6.0 {
                return p + (q - p) * 6.0 * t;
            }
            if t < 1.0 / 2.0 {
                return q;
            }
            if t < 2.0 / 3.0 {
                return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
            }
            p
        }

        let q = if l < 0.5 {
            l * (1.0 + s)
        } else {
            l + s - l * s
        };
        let p = 2.0 * l - q;
        [
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
            a,
        ]
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        self.to_rgba_f64().map(to_u8)
    }

    pub fn to_premul(self) -> Rgba8Premul {
        let [r, g, b, a] = self.to_rgba_f64();
        Rgba8Premul {
            r: to_u8(r * a),
            g: to_u8(g * a),
            b: to_u8(b * a),
            a: to_u8(a),
        }
    }

    pub fn to_hex(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

fn to_u8(x: f64) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub fn wrap_hue(h: f64) -> f64 {
    h.rem_euclid(360.0)
}

/// Shortest angular distance between two hues, in `0..=180`.
pub fn hue_distance(a: f64, b: f64) -> f64 {
    let d = (wrap_hue(a) - wrap_hue(b)).abs();
    if d > 180.0 { 360.0 - d } else { d }
}

/// Hue relationships used to spread a 5-color palette around a base hue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    Monochrome,
    Complementary,
    SplitComplementary,
    Triadic,
    Analogous,
}

impl Scheme {
    pub const ALL: [Scheme; 5] = [
        Scheme::Monochrome,
        Scheme::Complementary,
        Scheme::SplitComplementary,
        Scheme::Triadic,
        Scheme::Analogous,
    ];

    /// Hue offset of the `i`-th palette entry.
    fn offset(self, i: usize) -> f64 {
        match self {
            Scheme::Monochrome => 0.0,
            Scheme::Complementary => (i % 2) as f64 * 180.0,
            Scheme::SplitComplementary => {
                let first = if i % 3 > 0 { 150.0 } else { 0.0 };
                let second = if i % 3 == 2 { 60.0 } else { 0.0 };
                first + second
            }
            Scheme::Triadic => (i % 3) as f64 * 120.0,
            Scheme::Analogous => (i as f64 - 2.0) * 30.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteStyle {
    /// Five colors around one random hue and harmony scheme.
    #[default]
    Scheme,
    /// Near-black, off-white and several well separated vibrant hue families.
    Harmonious,
}

/// How ornaments pick colors, and how the second skeleton contrasts with the first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorVariety {
    /// Stay inside the palette.
    Palette,
    /// Mostly synthesize fresh colors; force a large hue shift for the second skeleton.
    #[default]
    Rogue,
}

const SCHEME_SIZE: usize = 5;
const COLORFUL_MIN_BRIGHTNESS: f64 = 15.0;
const COLORFUL_MAX_BRIGHTNESS: f64 = 85.0;

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Palette {
    colors: Vec<Hsla>,
}

impl Palette {
    pub fn new(colors: Vec<Hsla>) -> Self {
        Self { colors }
    }

    pub fn generate(rng: &mut SessionRng, style: PaletteStyle) -> Self {
        match style {
            PaletteStyle::Scheme => {
                let base_hue = rng.range(0.0, 360.0);
                let scheme = rng.pick(&Scheme::ALL).copied().unwrap_or(Scheme::Monochrome);
                Self::from_scheme(rng, scheme, base_hue)
            }
            PaletteStyle::Harmonious => Self::harmonious(rng),
        }
    }

    pub fn from_scheme(rng: &mut SessionRng, scheme: Scheme, base_hue: f64) -> Self {
        let colors = (0..SCHEME_SIZE)
            .map(|i| {
                let h = wrap_hue(base_hue + scheme.offset(i));
                let s = rng.range(40.0, 95.0);
                let l = rng.range(30.0, 90.0);
                Hsla::hsl(h, s, l)
            })
            .collect();
        Self { colors }
    }

    pub fn harmonious(rng: &mut SessionRng) -> Self {
        const MIN_HUE_SEPARATION: f64 = 45.0;
        const HUE_ATTEMPTS: usize = 100;

        let mut colors = vec![
            Hsla::hsl(0.0, 0.0, 10.0),
            Hsla::hsl(rng.range(0.0, 360.0), 10.0, 90.0),
        ];

        let base_count = rng.int(5, 8);
        let mut base_hues: Vec<f64> = Vec::with_capacity(base_count as usize);
        for _ in 0..base_count {
            for _ in 0..HUE_ATTEMPTS {
                let candidate = rng.range(0.0, 360.0);
                if base_hues
                    .iter()
                    .all(|&h| hue_distance(h, candidate) >= MIN_HUE_SEPARATION)
                {
                    base_hues.push(candidate);
                    break;
                }
            }
        }

        for h in base_hues {
            let variations = rng.int(5, 8);
            for _ in 0..variations {
                let s = rng.range(75.0, 95.0) + rng.range(-10.0, 10.0);
                let l = rng.range(40.0, 65.0) + rng.range(-10.0, 10.0);
                colors.push(Hsla::hsl(h, s.clamp(65.0, 100.0), l.clamp(30.0, 75.0)));
            }
        }
        Self { colors }
    }

    pub fn colors(&self) -> &[Hsla] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn pick(&self, rng: &mut SessionRng) -> Option<Hsla> {
        rng.pick(&self.colors).copied()
    }

    pub fn filter(&self, pred: impl Fn(&Hsla) -> bool) -> Self {
        Self {
            colors: self.colors.iter().copied().filter(|c| pred(c)).collect(),
        }
    }

    /// Entries that are neither near-black nor near-white.
    pub fn colorful(&self) -> Self {
        self.filter(is_colorful)
    }

    /// Darker, saturated entries suitable for halo rings; falls back to `self`.
    pub fn halo_source(&self) -> Self {
        let halo = self.filter(|c| c.brightness() < 75.0 && c.s > 30.0);
        if halo.is_empty() { self.clone() } else { halo }
    }
}

pub fn is_colorful(c: &Hsla) -> bool {
    let b = c.brightness();
    (COLORFUL_MIN_BRIGHTNESS..COLORFUL_MAX_BRIGHTNESS).contains(&b)
}

fn synthesized_vibrant(rng: &mut SessionRng) -> Hsla {
    Hsla::hsl(
        rng.range(0.0, 360.0),
        rng.range(70.0, 100.0),
        rng.range(40.0, 70.0),
    )
}

/// Colorful entry, else any entry, else a synthesized vibrant color.
pub fn pick_colorful(rng: &mut SessionRng, palette: &Palette) -> Hsla {
    if let Some(c) = palette.colorful().pick(rng) {
        return c;
    }
    if let Some(c) = palette.pick(rng) {
        return c;
    }
    synthesized_vibrant(rng)
}

/// Color of the first skeleton shape.
pub fn first_skeleton_color(rng: &mut SessionRng, palette: &Palette) -> Hsla {
    if let Some(c) = palette.colorful().pick(rng) {
        return c;
    }
    match palette.pick(rng) {
        Some(c) => Hsla::hsl(c.h, c.s, rng.range(40.0, 70.0)),
        None => synthesized_vibrant(rng),
    }
}

/// Color of the second skeleton shape, chosen to stand apart from `first`.
pub fn contrasting_color(
    rng: &mut SessionRng,
    first: Hsla,
    palette: &Palette,
    variety: ColorVariety,
) -> Hsla {
    match variety {
        ColorVariety::Rogue => {
            let shift = rng.range(90.0, 270.0);
            Hsla::hsl(
                wrap_hue(first.h + shift),
                rng.range(70.0, 100.0),
                rng.range(50.0, 85.0),
            )
        }
        ColorVariety::Palette => {
            let others = palette.colorful().filter(|c| *c != first);
            if let Some(c) = others.pick(rng) {
                return c;
            }
            let others = palette.filter(|c| *c != first);
            match others.pick(rng) {
                Some(c) => Hsla::hsl(c.h, c.s, rng.range(40.0, 70.0)),
                None => Hsla::from_hsb(wrap_hue(first.h + 180.0), first.s, first.brightness(), 1.0),
            }
        }
    }
}

/// Mostly a freshly synthesized color; sometimes a palette entry.
///
/// A result equal to `avoid` is perturbed deterministically instead of re-drawn.
pub fn rogue_color(rng: &mut SessionRng, palette: Option<&Palette>, avoid: Option<Hsla>) -> Hsla {
    let roll = rng.unit();
    let candidate = match palette.filter(|p| !p.is_empty()) {
        Some(p) if roll >= 0.8 => p.pick(rng),
        _ => None,
    };
    let c = candidate.unwrap_or_else(|| {
        Hsla::hsl(
            rng.range(0.0, 360.0),
            rng.range(50.0, 100.0),
            rng.range(40.0, 90.0),
        )
    });

    if avoid == Some(c) {
        return Hsla::hsl(
            wrap_hue(c.h + 80.0),
            (c.s * 0.85).clamp(40.0, 100.0),
            (c.l * 1.15).clamp(30.0, 90.0),
        );
    }
    c
}

/// Color for an ornament-class shape under the configured variety.
pub fn ornament_color(
    rng: &mut SessionRng,
    palette: &Palette,
    variety: ColorVariety,
    avoid: Option<Hsla>,
) -> Hsla {
    let colorful = palette.colorful();
    match variety {
        ColorVariety::Rogue => {
            let source = (!colorful.is_empty()).then_some(&colorful);
            rogue_color(rng, source, avoid)
        }
        ColorVariety::Palette => {
            let pool = colorful.filter(|c| Some(*c) != avoid);
            match pool.pick(rng) {
                Some(c) => c,
                None => pick_colorful(rng, palette),
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/palette.rs"]
mod tests;
