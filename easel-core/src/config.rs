//! # Configuration
//! Per-surface tunables, read from a TOML file. Every key is optional and missing keys take their
//! defaults, so an empty file is a valid configuration.

use crate::geom::Size;
use crate::state::style::{LineStyle, Smoothing};
use crate::stroke::curve::MAX_CHAIKIN_ITERATIONS;
use crate::util::finite_or;

const DOCUMENTATION: &str = r#"# Easel surface settings. Every key is optional.
# Formatting and comments are not preserved when this file is written back.

# [stroke]
# smoothing = "chaikin"      # or "catmull-rom"
# min_distance = 1.0
# [eraser]
# width = 50
# height = 50

"#;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("writing config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(
    serde::Serialize,
    serde::Deserialize,
    strum::AsRefStr,
    PartialEq,
    Eq,
    Copy,
    Clone,
    Hash,
    Debug,
    Default,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SmoothingMode {
    #[default]
    Chaikin,
    CatmullRom,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct StrokeConfig {
    pub smoothing: SmoothingMode,
    /// Input points closer than this to the previous one are dropped.
    pub min_distance: f32,
    pub chaikin_iterations: u32,
    pub catmull_rom_alpha: f32,
    /// Approximate length of each straight piece of a Catmull-Rom span.
    pub target_segment: f32,
}
impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            smoothing: SmoothingMode::default(),
            min_distance: 1.0,
            chaikin_iterations: 2,
            catmull_rom_alpha: 0.5,
            target_segment: 2.0,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct EraserConfig {
    pub width: i32,
    pub height: i32,
}
impl Default for EraserConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Longest explicit cycle of tick delays. Longer plans tick at the GCD of the frame durations.
    pub max_cycle: usize,
}
impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { max_cycle: 256 }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// Lossy encoder quality in `[0, 1]`, used when the caller gives none.
    pub quality: f32,
}
impl Default for ExportConfig {
    fn default() -> Self {
        Self { quality: 0.92 }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct SurfaceConfig {
    pub stroke: StrokeConfig,
    pub eraser: EraserConfig,
    pub schedule: ScheduleConfig,
    pub export: ExportConfig,
}

impl SurfaceConfig {
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml)?;
        Ok(config.normalized())
    }
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let string = std::fs::read_to_string(path)?;
        Self::from_toml_str(&string)
    }
    /// Load, or fall back on defaults if the file is missing or malformed.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<std::path::Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("{}: {err}, defaulting.", path.display());
                Self::default()
            }
        }
    }
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        let string = toml::ser::to_string_pretty(self)?;
        Ok(DOCUMENTATION.to_owned() + &string)
    }
    /// Clamp every value into its usable range.
    #[must_use]
    pub fn normalized(self) -> Self {
        let defaults = Self::default();
        Self {
            stroke: StrokeConfig {
                smoothing: self.stroke.smoothing,
                min_distance: finite_or(self.stroke.min_distance, defaults.stroke.min_distance)
                    .max(0.0),
                chaikin_iterations: self.stroke.chaikin_iterations.min(MAX_CHAIKIN_ITERATIONS),
                catmull_rom_alpha: finite_or(
                    self.stroke.catmull_rom_alpha,
                    defaults.stroke.catmull_rom_alpha,
                )
                .clamp(0.0, 1.0),
                target_segment: finite_or(self.stroke.target_segment, defaults.stroke.target_segment)
                    .max(0.5),
            },
            eraser: EraserConfig {
                width: self.eraser.width.max(1),
                height: self.eraser.height.max(1),
            },
            schedule: ScheduleConfig {
                max_cycle: self.schedule.max_cycle.max(1),
            },
            export: ExportConfig {
                quality: finite_or(self.export.quality, defaults.export.quality).clamp(0.0, 1.0),
            },
        }
    }
    /// The configured line smoothing.
    #[must_use]
    pub fn smoothing(&self) -> Smoothing {
        match self.stroke.smoothing {
            SmoothingMode::Chaikin => Smoothing::Chaikin {
                iterations: self.stroke.chaikin_iterations,
            },
            SmoothingMode::CatmullRom => Smoothing::CatmullRom {
                alpha: self.stroke.catmull_rom_alpha,
                target_segment: self.stroke.target_segment,
            },
        }
    }
    /// Default line style, with the configured smoothing and distance gate.
    #[must_use]
    pub fn line_style(&self) -> LineStyle {
        LineStyle {
            smoothing: self.smoothing(),
            min_distance: self.stroke.min_distance,
            ..Default::default()
        }
    }
    #[must_use]
    pub fn eraser_size(&self) -> Size {
        Size::new(self.eraser.width, self.eraser.height)
    }
}
