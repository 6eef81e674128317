//! # Geometry
//! Points, sizes, and rectangles in surface coordinates (`0,0` top left, +X right, +Y down).
//!
//! Bounding boxes are integer [`Rect`]s, as every geometry input to the surface is truncated.
//! Path vertices produced by smoothing are fractional, and so are [`Point`]s.

use crate::util::truncate;

#[derive(Copy, Clone, PartialEq, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}
impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
    /// Both coordinates truncated towards zero.
    #[must_use]
    pub fn truncated(self) -> Self {
        Self {
            x: self.x.trunc(),
            y: self.y.trunc(),
        }
    }
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
    #[must_use]
    pub fn lerp(self, other: Self, factor: f32) -> Self {
        let inv = 1.0 - factor;
        Self {
            x: self.x * inv + other.x * factor,
            y: self.y * inv + other.y * factor,
        }
    }
    pub(crate) fn scaled(self, by: f32) -> Self {
        Self {
            x: self.x * by,
            y: self.y * by,
        }
    }
    pub(crate) fn plus(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}
impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}
impl Size {
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Integer rectangle. May have negative extents, in which case it spans leftwards/upwards of the origin.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}
impl Rect {
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
    #[must_use]
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }
    #[must_use]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
    /// Same rect with non-negative extents.
    #[must_use]
    pub fn normalized(self) -> Self {
        let (x, width) = if self.width < 0 {
            (self.right(), self.width.saturating_neg())
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0 {
            (self.bottom(), self.height.saturating_neg())
        } else {
            (self.y, self.height)
        };
        Self::new(x, y, width, height)
    }
    /// Grow to include `(x, y)`. Never shrinks.
    pub fn include(&mut self, x: i32, y: i32) {
        let this = self.normalized();
        let left = this.x.min(x);
        let top = this.y.min(y);
        let right = this.right().max(x);
        let bottom = this.bottom().max(y);
        *self = Self::new(left, top, right.saturating_sub(left), bottom.saturating_sub(top));
    }
    /// Grow to include all of `other`. Never shrinks.
    pub fn include_rect(&mut self, other: Self) {
        let other = other.normalized();
        self.include(other.x, other.y);
        self.include(other.right(), other.bottom());
    }
    /// Inclusive on every edge.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let this = self.normalized();
        x >= this.x && x <= this.right() && y >= this.y && y <= this.bottom()
    }
    /// Rectangles that merely share an edge or a corner *do* intersect.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        let a = self.normalized();
        let b = other.normalized();
        !(a.right() < b.x || a.bottom() < b.y || a.x > b.right() || a.y > b.bottom())
    }
    /// Expand by `border` on every side, flooring the near edges and ceiling the far edges.
    #[must_use]
    pub fn expand(self, border: f32) -> Self {
        let this = self.normalized();
        let border = if border.is_finite() { border.max(0.0) } else { 0.0 };
        let left = truncate((this.x as f32 - border).floor());
        let top = truncate((this.y as f32 - border).floor());
        let right = truncate((this.right() as f32 + border).ceil());
        let bottom = truncate((this.bottom() as f32 + border).ceil());
        Self::new(left, top, right.saturating_sub(left), bottom.saturating_sub(top))
    }
    /// Smallest integer rect containing every point, or `None` if there are none.
    pub fn bounding(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (mut min, mut max) = (first, first);
        for p in points {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        let left = truncate(min.x.floor());
        let top = truncate(min.y.floor());
        Some(Self::new(
            left,
            top,
            truncate(max.x.ceil()).saturating_sub(left),
            truncate(max.y.ceil()).saturating_sub(top),
        ))
    }
    /// The four corners, clockwise from the origin.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        let (l, t) = (self.x as f32, self.y as f32);
        let (r, b) = (self.right() as f32, self.bottom() as f32);
        [
            Point::new(l, t),
            Point::new(r, t),
            Point::new(r, b),
            Point::new(l, b),
        ]
    }
}

/// Fractional rectangle, as handed to the renderer.
#[derive(Copy, Clone, PartialEq, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}
impl RectF {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}
impl From<Rect> for RectF {
    fn from(value: Rect) -> Self {
        Self::new(
            value.x as f32,
            value.y as f32,
            value.width as f32,
            value.height as f32,
        )
    }
}

/// A single open polyline: a move to the first vertex, then a line to each following vertex.
#[derive(Clone, PartialEq, Debug)]
pub struct Path {
    vertices: Vec<Point>,
}
impl Path {
    #[must_use]
    pub fn starting_at(point: Point) -> Self {
        Self {
            vertices: vec![point],
        }
    }
    pub fn line_to(&mut self, point: Point) {
        self.vertices.push(point);
    }
    #[must_use]
    pub fn start(&self) -> Point {
        // Never empty, constructed with a start vertex.
        self.vertices[0]
    }
    #[must_use]
    pub fn end(&self) -> Point {
        self.vertices[self.vertices.len() - 1]
    }
    /// Every vertex, including the starting one.
    #[must_use]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }
    /// Vertices as interleaved `x, y` pairs, for uploading.
    #[must_use]
    pub fn as_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }
    /// Count of vertices, including the starting one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }
    /// Does this path draw any lines?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.len() < 2
    }
    #[must_use]
    pub fn bounds(&self) -> Rect {
        // Never empty, so always some.
        Rect::bounding(self.vertices.iter().copied()).unwrap_or_default()
    }
}

#[cfg(test)]
mod test {
    use super::{Path, Point, Rect};

    #[test]
    fn touching_edges_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.intersects(&Rect::new(10, 0, 5, 5)));
        assert!(a.intersects(&Rect::new(10, 10, 5, 5)));
        assert!(!a.intersects(&Rect::new(11, 0, 5, 5)));
        assert!(!a.intersects(&Rect::new(0, -6, 5, 5)));
    }
    #[test]
    fn include_grows_only() {
        let mut r = Rect::new(0, 0, 1, 1);
        r.include(4, 0);
        assert_eq!(r, Rect::new(0, 0, 4, 1));
        r.include(2, 0);
        assert_eq!(r, Rect::new(0, 0, 4, 1));
        r.include(-3, 5);
        assert_eq!(r, Rect::new(-3, 0, 7, 5));
        r.include_rect(Rect::new(10, 10, -2, -2));
        assert_eq!(r, Rect::new(-3, 0, 13, 10));
    }
    #[test]
    fn expand_floors_and_ceils() {
        let r = Rect::new(10, 10, 4, 4).expand(1.5);
        assert_eq!(r, Rect::new(8, 8, 8, 8));
        let r = Rect::new(10, 10, 4, 4).expand(1.0);
        assert_eq!(r, Rect::new(9, 9, 6, 6));
        assert_eq!(Rect::new(10, 10, 4, 4).expand(0.0), Rect::new(10, 10, 4, 4));
        assert_eq!(Rect::new(10, 10, 4, 4).expand(f32::NAN), Rect::new(10, 10, 4, 4));
    }
    #[test]
    fn negative_extents() {
        let r = Rect::new(10, 10, -4, -4);
        assert_eq!(r.normalized(), Rect::new(6, 6, 4, 4));
        assert!(r.contains(7, 7));
        assert!(r.intersects(&Rect::new(0, 0, 6, 6)));
    }
    #[test]
    fn path_bounds() {
        let mut path = Path::starting_at(Point::new(0.5, 0.5));
        assert!(path.is_empty());
        path.line_to(Point::new(3.25, -1.0));
        assert!(!path.is_empty());
        assert_eq!(path.len(), 2);
        assert_eq!(path.bounds(), Rect::new(0, -1, 4, 2));
        assert_eq!(path.as_flat(), &[0.5, 0.5, 3.25, -1.0]);
    }
    #[test]
    fn wide_extents_saturate() {
        let mut r = Rect::new(-2_000_000_000, 0, 0, 0);
        r.include(2_000_000_000, 10);
        assert_eq!(r, Rect::new(-2_000_000_000, 0, i32::MAX, 10));
        let bounds = Rect::bounding([Point::new(-2e9, 0.0), Point::new(2e9, 0.0)]);
        assert_eq!(bounds, Some(Rect::new(-2_000_000_000, 0, i32::MAX, 0)));
    }
}
