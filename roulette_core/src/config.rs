use crate::error::{RouletteError, RouletteResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range<T> {
    pub min: T,
    pub max: T,
}

impl<T> Range<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    /// Spin duration is drawn from `[min_duration_ms, max_duration_ms)`.
    pub min_duration_ms: u64,
    pub max_duration_ms: u64,
    /// Full revolutions added on top of the random stopping offset.
    pub extra_turns: u32,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            min_duration_ms: 2000,
            max_duration_ms: 5000,
            extra_turns: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Half-open: hue is drawn from `[min, max)`.
    pub hue: Range<u16>,
    /// Half-open.
    pub saturation: Range<u8>,
    /// Inclusive on both ends.
    pub lightness: Range<u8>,
    pub min_hue_delta: u16,
    pub min_saturation_delta: u8,
    pub min_lightness_delta: u8,
    /// Resampling attempts per color before settling for the best candidate.
    pub max_attempts: u32,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            hue: Range::new(0, 360),
            saturation: Range::new(20, 70),
            lightness: Range::new(70, 90),
            min_hue_delta: 30,
            min_saturation_delta: 20,
            min_lightness_delta: 20,
            max_attempts: 256,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { capacity: 10 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouletteConfig {
    pub spin: SpinConfig,
    pub palette: PaletteConfig,
    pub history: HistoryConfig,
}

impl RouletteConfig {
    pub fn from_json_str(raw: &str) -> RouletteResult<Self> {
        let cfg: Self = serde_json::from_str(raw)
            .map_err(|e| RouletteError::InvalidConfig(format!("parse: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> RouletteResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| RouletteError::InvalidConfig(format!("read {}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> RouletteResult<()> {
        let invalid = |msg: &str| Err(RouletteError::InvalidConfig(msg.to_string()));
        let s = &self.spin;
        if s.min_duration_ms == 0 || s.min_duration_ms > s.max_duration_ms {
            return invalid("spin duration range must be non-empty and start above zero");
        }
        let p = &self.palette;
        if p.hue.min >= p.hue.max || p.hue.max > 360 {
            return invalid("hue range must be non-empty and within [0, 360)");
        }
        if p.saturation.min >= p.saturation.max || p.saturation.max > 100 {
            return invalid("saturation range must be non-empty and within [0, 100]");
        }
        if p.lightness.min > p.lightness.max || p.lightness.max > 100 {
            return invalid("lightness range must be within [0, 100]");
        }
        if p.max_attempts == 0 {
            return invalid("palette max_attempts must be at least 1");
        }
        if self.history.capacity == 0 {
            return invalid("history capacity must be at least 1");
        }
        Ok(())
    }
}
