//! Wedge colors.
//!
//! Colors are drawn one at a time from the configured HSL box. Every color
//! after the first is resampled until it stands apart from its predecessor on
//! at least one channel, so neighbouring wedges never blur together.

use crate::config::PaletteConfig;
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// HSL color with integer channels: hue in degrees, saturation and lightness
/// in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hsl {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl Hsl {
    pub const fn new(hue: u16, saturation: u8, lightness: u8) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// CSS form, e.g. `hsl(120, 35%, 80%)`.
    pub fn to_css(self) -> String {
        format!("hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }

    pub fn to_rgb(self) -> (u8, u8, u8) {
        let h = f64::from(self.hue % 360);
        let s = f64::from(self.saturation.min(100)) / 100.0;
        let l = f64::from(self.lightness.min(100)) / 100.0;

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = if h < 60.0 {
            (c, x, 0.0)
        } else if h < 120.0 {
            (x, c, 0.0)
        } else if h < 180.0 {
            (0.0, c, x)
        } else if h < 240.0 {
            (0.0, x, c)
        } else if h < 300.0 {
            (x, 0.0, c)
        } else {
            (c, 0.0, x)
        };

        let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        (to_byte(r), to_byte(g), to_byte(b))
    }

    fn deltas(self, other: Hsl) -> (u16, u8, u8) {
        (
            self.hue.abs_diff(other.hue),
            self.saturation.abs_diff(other.saturation),
            self.lightness.abs_diff(other.lightness),
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct PaletteGenerator {
    config: PaletteConfig,
}

impl PaletteGenerator {
    pub fn new(config: PaletteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PaletteConfig {
        &self.config
    }

    /// Produces `count` colors. Each call starts fresh; nothing is shared
    /// between calls except the random source.
    pub fn generate(&self, count: usize, rng: &mut impl RandomSource) -> Vec<Hsl> {
        let mut colors: Vec<Hsl> = Vec::with_capacity(count);
        for i in 0..count {
            let color = match colors.last() {
                None => self.sample(rng),
                Some(&prev) => self.sample_apart_from(prev, i, rng),
            };
            colors.push(color);
        }
        colors
    }

    /// True if `candidate` clears at least one of the per-channel thresholds.
    pub fn is_separated(&self, prev: Hsl, candidate: Hsl) -> bool {
        let (dh, ds, dl) = candidate.deltas(prev);
        dh >= self.config.min_hue_delta
            || ds >= self.config.min_saturation_delta
            || dl >= self.config.min_lightness_delta
    }

    fn sample_apart_from(&self, prev: Hsl, index: usize, rng: &mut impl RandomSource) -> Hsl {
        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;
        for _ in 0..self.config.max_attempts {
            let candidate = self.sample(rng);
            if self.is_separated(prev, candidate) {
                return candidate;
            }
            let score = self.separation_score(prev, candidate);
            if score > best_score {
                best_score = score;
                best = Some(candidate);
            }
        }
        warn!(
            index,
            attempts = self.config.max_attempts,
            "palette ranges too narrow to separate neighbours, using closest candidate"
        );
        best.unwrap_or_else(|| self.sample(rng))
    }

    /// Largest per-channel delta relative to its threshold.
    fn separation_score(&self, prev: Hsl, candidate: Hsl) -> f64 {
        let (dh, ds, dl) = candidate.deltas(prev);
        let ratio = |delta: f64, min: f64| delta / min.max(1.0);
        ratio(f64::from(dh), f64::from(self.config.min_hue_delta))
            .max(ratio(f64::from(ds), f64::from(self.config.min_saturation_delta)))
            .max(ratio(f64::from(dl), f64::from(self.config.min_lightness_delta)))
    }

    fn sample(&self, rng: &mut impl RandomSource) -> Hsl {
        let c = &self.config;
        let hue = pick(rng, u32::from(c.hue.min), u32::from(c.hue.max));
        let saturation = pick(rng, u32::from(c.saturation.min), u32::from(c.saturation.max));
        // lightness range is inclusive
        let lightness = pick(rng, u32::from(c.lightness.min), u32::from(c.lightness.max) + 1);
        Hsl::new(hue as u16, saturation as u8, lightness as u8)
    }
}

/// Integer drawn uniformly from `[min, max)`.
fn pick(rng: &mut impl RandomSource, min: u32, max: u32) -> u32 {
    let span = max.saturating_sub(min).max(1);
    let offset = (rng.next_unit() * f64::from(span)).floor() as u32;
    min + offset.min(span - 1)
}

/// Palette with the default ranges and thresholds.
pub fn generate_palette(count: usize, rng: &mut impl RandomSource) -> Vec<Hsl> {
    PaletteGenerator::default().generate(count, rng)
}
