/// How an object's pixels combine with what is already on the surface.
/// Names match their 2D canvas spelling, `source-over` and friends.
#[derive(
    strum::AsRefStr,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    PartialEq,
    Eq,
    Copy,
    Clone,
    Hash,
    Debug,
    Default,
)]
#[strum(serialize_all = "kebab-case")]
pub enum CompositeOperation {
    #[default]
    SourceOver,
    SourceIn,
    SourceOut,
    SourceAtop,
    DestinationOver,
    DestinationIn,
    DestinationOut,
    DestinationAtop,
    Lighter,
    Copy,
    Xor,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

/// Compositing for an object: an operation and an opacity modulate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Compositing {
    pub operation: CompositeOperation,
    /// Global alpha, `0..=1`.
    pub alpha: f32,
}
impl Default for Compositing {
    fn default() -> Self {
        Self {
            operation: CompositeOperation::default(),
            alpha: 1.0,
        }
    }
}
impl Compositing {
    /// Clamp alpha into range, non-finite becomes opaque.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            alpha: crate::util::finite_or(self.alpha, 1.0).clamp(0.0, 1.0),
            ..self
        }
    }
}
