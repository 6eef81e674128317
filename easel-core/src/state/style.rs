//! # Styles
//! Per-kind style records. Every field has the default a 2D canvas context would use, except where noted.
//!
//! Styles are normalized when they enter the surface: non-finite numbers fall back to their defaults,
//! negative widths and radii become zero, and media zoom is at least one.

use smallvec::SmallVec;

use crate::blend::Compositing;
use crate::color::Color;
use crate::util::finite_or;

#[derive(
    strum::AsRefStr, strum::Display, strum::EnumString, PartialEq, Eq, Copy, Clone, Hash, Debug, Default,
)]
#[strum(serialize_all = "lowercase")]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

#[derive(
    strum::AsRefStr, strum::Display, strum::EnumString, PartialEq, Eq, Copy, Clone, Hash, Debug, Default,
)]
#[strum(serialize_all = "lowercase")]
pub enum LineJoin {
    #[default]
    Round,
    Bevel,
    Miter,
}

#[derive(
    strum::AsRefStr, strum::Display, strum::EnumString, PartialEq, Eq, Copy, Clone, Hash, Debug, Default,
)]
#[strum(serialize_all = "lowercase")]
pub enum FillRule {
    #[default]
    Nonzero,
    Evenodd,
}

#[derive(
    strum::AsRefStr, strum::Display, strum::EnumString, PartialEq, Eq, Copy, Clone, Hash, Debug, Default,
)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
    Inherit,
}

#[derive(
    strum::AsRefStr, strum::Display, strum::EnumString, PartialEq, Eq, Copy, Clone, Hash, Debug, Default,
)]
#[strum(serialize_all = "lowercase")]
pub enum SmoothingQuality {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(
    strum::AsRefStr, strum::Display, strum::EnumString, PartialEq, Eq, Copy, Clone, Hash, Debug, Default,
)]
#[strum(serialize_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Start,
    End,
    Left,
    Right,
    Center,
}

#[derive(
    strum::AsRefStr, strum::Display, strum::EnumString, PartialEq, Eq, Copy, Clone, Hash, Debug, Default,
)]
#[strum(serialize_all = "lowercase")]
pub enum TextBaseline {
    Top,
    Hanging,
    Middle,
    #[default]
    Alphabetic,
    Ideographic,
    Bottom,
}

#[derive(
    strum::AsRefStr, strum::Display, strum::EnumString, PartialEq, Eq, Copy, Clone, Hash, Debug, Default,
)]
pub enum TextRendering {
    #[default]
    #[strum(serialize = "auto")]
    Auto,
    #[strum(serialize = "optimizeSpeed")]
    OptimizeSpeed,
    #[strum(serialize = "optimizeLegibility")]
    OptimizeLegibility,
    #[strum(serialize = "geometricPrecision")]
    GeometricPrecision,
}

#[derive(
    strum::AsRefStr, strum::Display, strum::EnumString, PartialEq, Eq, Copy, Clone, Hash, Debug, Default,
)]
#[strum(serialize_all = "lowercase")]
pub enum FontKerning {
    #[default]
    Auto,
    Normal,
    None,
}

#[derive(
    strum::AsRefStr, strum::Display, strum::EnumString, PartialEq, Eq, Copy, Clone, Hash, Debug, Default,
)]
#[strum(serialize_all = "kebab-case")]
pub enum FontStretch {
    UltraCondensed,
    ExtraCondensed,
    Condensed,
    SemiCondensed,
    #[default]
    Normal,
    SemiExpanded,
    Expanded,
    ExtraExpanded,
    UltraExpanded,
}

#[derive(
    strum::AsRefStr, strum::Display, strum::EnumString, PartialEq, Eq, Copy, Clone, Hash, Debug, Default,
)]
#[strum(serialize_all = "kebab-case")]
pub enum FontVariantCaps {
    #[default]
    Normal,
    SmallCaps,
    AllSmallCaps,
    PetiteCaps,
    AllPetiteCaps,
    Unicase,
    TitlingCaps,
}

/// Outline settings, shared by every styled kind.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    /// Line width in logical pixels. Zero draws no outline.
    pub width: f32,
    pub color: Color,
    /// Alternating dash and gap lengths. Empty for a solid line.
    pub dash: SmallVec<[f32; 4]>,
    pub dash_offset: f32,
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f32,
}
impl Default for Stroke {
    fn default() -> Self {
        Self {
            width: 3.0,
            color: Color::BLACK,
            dash: SmallVec::new(),
            dash_offset: 0.0,
            cap: LineCap::default(),
            join: LineJoin::default(),
            miter_limit: 2.0,
        }
    }
}
impl Stroke {
    #[must_use]
    pub fn with_width(width: f32) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }
    #[must_use]
    pub fn normalized(self) -> Self {
        // A dash with any bad entry is ignored entirely, same as a 2D context would.
        let dash = if self.dash.iter().all(|d| d.is_finite() && *d >= 0.0) {
            self.dash
        } else {
            SmallVec::new()
        };
        Self {
            width: finite_or(self.width, 0.0).max(0.0),
            dash,
            dash_offset: finite_or(self.dash_offset, 0.0),
            miter_limit: if self.miter_limit.is_finite() && self.miter_limit > 0.0 {
                self.miter_limit
            } else {
                2.0
            },
            ..self
        }
    }
}

/// Interior fill. Objects without one are outlined only.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Fill {
    pub color: Color,
    pub rule: FillRule,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub blur: f32,
    pub offset: [f32; 2],
}
impl Default for Shadow {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            blur: 0.0,
            offset: [0.0; 2],
        }
    }
}
impl Shadow {
    /// Does this shadow draw anything at all?
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.color.a != 0 && (self.blur > 0.0 || self.offset != [0.0; 2])
    }
    /// How far past the object's outline the shadow may draw.
    #[must_use]
    pub fn reach(&self) -> f32 {
        if self.is_visible() {
            self.blur + self.offset[0].abs().max(self.offset[1].abs())
        } else {
            0.0
        }
    }
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            blur: finite_or(self.blur, 0.0).max(0.0),
            offset: self.offset.map(|o| finite_or(o, 0.0)),
            ..self
        }
    }
}

/// How a line's raw input points are turned into a path.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Smoothing {
    /// Corner-cut every buffered triple of points.
    Chaikin { iterations: u32 },
    /// Interpolate every accepted point with a Catmull-Rom spline, sampled at `target_segment` spacing.
    CatmullRom { alpha: f32, target_segment: f32 },
}
impl Default for Smoothing {
    fn default() -> Self {
        Self::Chaikin { iterations: 2 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ImageSmoothing {
    pub enabled: bool,
    pub quality: SmoothingQuality,
}
impl Default for ImageSmoothing {
    fn default() -> Self {
        Self {
            enabled: true,
            quality: SmoothingQuality::default(),
        }
    }
}

/// Font state applied for both measuring and drawing text.
#[derive(Clone, Debug, PartialEq)]
pub struct FontState {
    /// CSS font shorthand, e.g. `"bold 16px serif"`.
    pub font: String,
    pub kerning: FontKerning,
    pub stretch: FontStretch,
    pub variant_caps: FontVariantCaps,
    pub align: TextAlign,
    pub baseline: TextBaseline,
    pub rendering: TextRendering,
    /// In logical pixels.
    pub word_spacing: f32,
}
impl Default for FontState {
    fn default() -> Self {
        Self {
            font: "10px sans-serif".to_owned(),
            kerning: FontKerning::default(),
            stretch: FontStretch::default(),
            variant_caps: FontVariantCaps::default(),
            align: TextAlign::default(),
            baseline: TextBaseline::default(),
            rendering: TextRendering::default(),
            word_spacing: 0.0,
        }
    }
}

/// Settings every styled kind has.
pub trait ObjectStyle: Clone + std::fmt::Debug + PartialEq {
    fn stroke(&self) -> &Stroke;
    fn shadow(&self) -> &Shadow;
    fn compositing(&self) -> &Compositing;
    /// Bring every field into range.
    #[must_use]
    fn normalized(self) -> Self;
    /// Distance past the geometric bounds that drawing may touch: half the outline, plus the shadow.
    fn border(&self) -> f32 {
        self.stroke().width.max(0.0) / 2.0 + self.shadow().reach()
    }
}

macro_rules! common_accessors {
    () => {
        fn stroke(&self) -> &Stroke {
            &self.stroke
        }
        fn shadow(&self) -> &Shadow {
            &self.shadow
        }
        fn compositing(&self) -> &Compositing {
            &self.compositing
        }
    };
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineStyle {
    pub stroke: Stroke,
    pub fill: Option<Fill>,
    pub shadow: Shadow,
    pub compositing: Compositing,
    pub smoothing: Smoothing,
    /// Input points closer than this to the previous accepted point are dropped.
    pub min_distance: f32,
}
impl Default for LineStyle {
    fn default() -> Self {
        Self {
            stroke: Stroke::default(),
            fill: None,
            shadow: Shadow::default(),
            compositing: Compositing::default(),
            smoothing: Smoothing::default(),
            min_distance: 1.0,
        }
    }
}
impl ObjectStyle for LineStyle {
    common_accessors!();
    fn normalized(self) -> Self {
        let smoothing = match self.smoothing {
            Smoothing::Chaikin { iterations } => Smoothing::Chaikin {
                iterations: iterations.min(crate::stroke::curve::MAX_CHAIKIN_ITERATIONS),
            },
            Smoothing::CatmullRom {
                alpha,
                target_segment,
            } => Smoothing::CatmullRom {
                alpha: finite_or(alpha, 0.5).clamp(0.0, 1.0),
                target_segment: finite_or(target_segment, 2.0).max(0.5),
            },
        };
        Self {
            stroke: self.stroke.normalized(),
            shadow: self.shadow.normalized(),
            compositing: self.compositing.normalized(),
            smoothing,
            min_distance: finite_or(self.min_distance, 1.0).max(0.0),
            ..self
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct RectangleStyle {
    pub stroke: Stroke,
    pub fill: Option<Fill>,
    pub shadow: Shadow,
    pub compositing: Compositing,
    pub direction: Direction,
    /// Corner radius.
    pub radius: f32,
}
impl ObjectStyle for RectangleStyle {
    common_accessors!();
    fn normalized(self) -> Self {
        Self {
            stroke: self.stroke.normalized(),
            shadow: self.shadow.normalized(),
            compositing: self.compositing.normalized(),
            radius: finite_or(self.radius, 0.0).max(0.0),
            ..self
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EllipseStyle {
    pub stroke: Stroke,
    pub fill: Option<Fill>,
    pub shadow: Shadow,
    pub compositing: Compositing,
    pub direction: Direction,
    /// Radians.
    pub rotation: f32,
    pub start_angle: f32,
    pub end_angle: f32,
    pub counterclockwise: bool,
}
impl Default for EllipseStyle {
    fn default() -> Self {
        Self {
            stroke: Stroke::default(),
            fill: None,
            shadow: Shadow::default(),
            compositing: Compositing::default(),
            direction: Direction::default(),
            rotation: 0.0,
            start_angle: 0.0,
            end_angle: std::f32::consts::TAU,
            counterclockwise: false,
        }
    }
}
impl ObjectStyle for EllipseStyle {
    common_accessors!();
    fn normalized(self) -> Self {
        Self {
            stroke: self.stroke.normalized(),
            shadow: self.shadow.normalized(),
            compositing: self.compositing.normalized(),
            rotation: finite_or(self.rotation, 0.0),
            start_angle: finite_or(self.start_angle, 0.0),
            end_angle: finite_or(self.end_angle, std::f32::consts::TAU),
            ..self
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MediaStyle {
    /// Border drawn around the media. Defaults to zero width.
    pub stroke: Stroke,
    pub shadow: Shadow,
    pub compositing: Compositing,
    pub direction: Direction,
    /// Corner radius, clipping the media.
    pub radius: f32,
    /// Center crop factor, at least one.
    pub zoom: f32,
    pub smoothing: ImageSmoothing,
}
impl Default for MediaStyle {
    fn default() -> Self {
        Self {
            stroke: Stroke::with_width(0.0),
            shadow: Shadow::default(),
            compositing: Compositing::default(),
            direction: Direction::default(),
            radius: 0.0,
            zoom: 1.0,
            smoothing: ImageSmoothing::default(),
        }
    }
}
impl ObjectStyle for MediaStyle {
    common_accessors!();
    fn normalized(self) -> Self {
        Self {
            stroke: self.stroke.normalized(),
            shadow: self.shadow.normalized(),
            compositing: self.compositing.normalized(),
            radius: finite_or(self.radius, 0.0).max(0.0),
            zoom: finite_or(self.zoom, 1.0).max(1.0),
            ..self
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Outline of the glyphs. Defaults to one pixel wide.
    pub stroke: Stroke,
    pub fill: Option<Fill>,
    pub shadow: Shadow,
    pub compositing: Compositing,
    pub direction: Direction,
    pub font: FontState,
}
impl Default for TextStyle {
    fn default() -> Self {
        Self {
            stroke: Stroke::with_width(1.0),
            fill: None,
            shadow: Shadow::default(),
            compositing: Compositing::default(),
            direction: Direction::default(),
            font: FontState::default(),
        }
    }
}
impl ObjectStyle for TextStyle {
    common_accessors!();
    fn normalized(self) -> Self {
        Self {
            stroke: self.stroke.normalized(),
            shadow: self.shadow.normalized(),
            compositing: self.compositing.normalized(),
            font: FontState {
                word_spacing: finite_or(self.font.word_spacing, 0.0),
                ..self.font
            },
            ..self
        }
    }
}
