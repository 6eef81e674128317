//! # Transforms
//! Each object carries a fixed set of transform *slots*. Setting a slot replaces its previous value.
//! Regardless of the order the slots were set in, they are always applied in the canonical order:
//! translate, then scale, then rotate, then the generic matrix, followed by the clip.

use crate::geom::{Point, Rect};
use crate::state::style::FillRule;

/// An arbitrary affine transform. Units of output are logical pixels.
///
/// Maps `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`, with elements stored column-major as `[[a, b], [c, d], [e, f]]`.
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable, PartialEq, PartialOrd)]
#[repr(C)]
pub struct Matrix {
    /// Column-major matrix elements
    pub elements: [[f32; 2]; 3],
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Self = Self {
        elements: [[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]],
    };
    #[must_use]
    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self {
            elements: [[a, b], [c, d], [e, f]],
        }
    }
    #[must_use]
    pub fn translation(x: f32, y: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, x, y)
    }
    #[must_use]
    pub fn scaling(x: f32, y: f32) -> Self {
        Self::new(x, 0.0, 0.0, y, 0.0, 0.0)
    }
    /// Rotation, in radians *CW* from positive X (as +Y is down).
    #[must_use]
    pub fn rotation(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }
    /// `self` applied *after* `inner`, the same as appending `inner` to a 2D context's current transform.
    #[must_use]
    pub fn then_inner(self, inner: Self) -> Self {
        let [[a, b], [c, d], [e, f]] = self.elements;
        let [[a2, b2], [c2, d2], [e2, f2]] = inner.elements;
        Self::new(
            a * a2 + c * b2,
            b * a2 + d * b2,
            a * c2 + c * d2,
            b * c2 + d * d2,
            a * e2 + c * f2 + e,
            b * e2 + d * f2 + f,
        )
    }
    #[must_use]
    pub fn apply(&self, point: Point) -> Point {
        let [[a, b], [c, d], [e, f]] = self.elements;
        Point::new(
            a * point.x + c * point.y + e,
            b * point.x + d * point.y + f,
        )
    }
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.elements.iter().flatten().all(|e| e.is_finite())
    }
    /// Bounds of `rect` once transformed.
    /// Non-finite matrices leave the rect unchanged rather than producing garbage bounds.
    #[must_use]
    pub fn map_rect(&self, rect: Rect) -> Rect {
        if self.is_identity() || !self.is_finite() {
            return rect;
        }
        Rect::bounding(rect.corners().map(|corner| self.apply(corner))).unwrap_or(rect)
    }
}

impl From<[[f32; 2]; 3]> for Matrix {
    fn from(elements: [[f32; 2]; 3]) -> Self {
        Self { elements }
    }
}

impl From<Matrix> for [[f32; 2]; 3] {
    fn from(value: Matrix) -> Self {
        value.elements
    }
}

/// One step of an object's transform, in the order a renderer should apply them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TransformStep {
    /// Whole-pixel translation.
    Translate { x: i32, y: i32 },
    Scale { x: f32, y: f32 },
    /// Radians, CW.
    Rotate(f32),
    Matrix(Matrix),
}
impl From<TransformStep> for Matrix {
    fn from(value: TransformStep) -> Self {
        match value {
            TransformStep::Translate { x, y } => Self::translation(x as f32, y as f32),
            TransformStep::Scale { x, y } => Self::scaling(x, y),
            TransformStep::Rotate(angle) => Self::rotation(angle),
            TransformStep::Matrix(matrix) => matrix,
        }
    }
}

/// The per-object transform slots. Each slot holds at most one value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformSlots {
    pub translate: Option<[i32; 2]>,
    pub scale: Option<[f32; 2]>,
    pub rotate: Option<f32>,
    pub matrix: Option<Matrix>,
    /// Clip subsequent drawing of this object to its own path, with the given rule.
    pub clip: Option<FillRule>,
}

impl TransformSlots {
    /// Occupied slots in canonical application order. Excludes the clip.
    pub fn steps(&self) -> impl Iterator<Item = TransformStep> {
        [
            self.translate
                .map(|[x, y]| TransformStep::Translate { x, y }),
            self.scale.map(|[x, y]| TransformStep::Scale { x, y }),
            self.rotate.map(TransformStep::Rotate),
            self.matrix.map(TransformStep::Matrix),
        ]
        .into_iter()
        .flatten()
    }
    /// The composition of every step.
    #[must_use]
    pub fn matrix(&self) -> Matrix {
        self.steps()
            .fold(Matrix::IDENTITY, |acc, step| acc.then_inner(step.into()))
    }
    /// Are no slots occupied?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
