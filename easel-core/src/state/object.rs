//! # Scene objects
//! A [`SceneObject`] is the common envelope (id, bounds, transform slots) around one [`Shape`],
//! the closed set of things a surface knows how to draw.

use smallvec::SmallVec;

use super::style::{
    EllipseStyle, LineStyle, MediaStyle, ObjectStyle, RectangleStyle, TextStyle,
};
use super::transform::TransformSlots;
use crate::geom::{Point, Rect, Size};
use crate::id::ObjectId;
use crate::media::{MediaHandle, Playback};
use crate::stroke::StrokeBuilder;
use crate::util::truncate;

#[derive(
    strum::AsRefStr, strum::Display, strum::EnumIter, PartialEq, Eq, Copy, Clone, Hash, Debug,
)]
pub enum ObjectKind {
    Line,
    Rectangle,
    Ellipse,
    Media,
    Text,
    Eraser,
}

/// A freehand stroke.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub(crate) stroke: StrokeBuilder,
    pub(crate) style: LineStyle,
}
impl Line {
    #[must_use]
    pub fn stroke(&self) -> &StrokeBuilder {
        &self.stroke
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rectangle {
    pub(crate) frame: Rect,
    pub(crate) style: RectangleStyle,
}

/// An ellipse inscribed in its frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Ellipse {
    pub(crate) frame: Rect,
    pub(crate) style: EllipseStyle,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Media {
    pub(crate) media: MediaHandle,
    pub(crate) frame: Rect,
    /// Size of the media itself, independent of how large it's drawn.
    pub(crate) intrinsic: Size,
    /// Whole frames per second of each video track.
    pub(crate) frame_rates: SmallVec<[u32; 2]>,
    pub(crate) playback: Playback,
    pub(crate) style: MediaStyle,
}
impl Media {
    #[must_use]
    pub fn media(&self) -> &MediaHandle {
        &self.media
    }
    #[must_use]
    pub fn intrinsic_size(&self) -> Size {
        self.intrinsic
    }
    #[must_use]
    pub fn frame_rates(&self) -> &[u32] {
        &self.frame_rates
    }
    #[must_use]
    pub fn playback(&self) -> Playback {
        self.playback
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    pub(crate) text: String,
    /// Origin is the top left of the text, size is as measured.
    pub(crate) frame: Rect,
    pub(crate) style: TextStyle,
}
impl Text {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A trail of cleared rectangles.
#[derive(Clone, Debug, PartialEq)]
pub struct Eraser {
    pub(crate) size: Size,
    pub(crate) stamps: Vec<Rect>,
    pub(crate) min_distance: f32,
}
impl Eraser {
    #[must_use]
    pub fn stamps(&self) -> &[Rect] {
        &self.stamps
    }
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }
    /// A stamp of `size` centred on `center`.
    #[must_use]
    pub fn stamp_at(size: Size, center: Point) -> Rect {
        Rect::new(
            truncate(center.x - size.width as f32 / 2.0),
            truncate(center.y - size.height as f32 / 2.0),
            size.width,
            size.height,
        )
    }
    fn last_center(&self) -> Option<Point> {
        self.stamps.last().map(|stamp| {
            Point::new(
                stamp.x as f32 + stamp.width as f32 / 2.0,
                stamp.y as f32 + stamp.height as f32 / 2.0,
            )
        })
    }
    /// Stamp at `center`, unless it's too close to the previous stamp.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub(crate) fn push(&mut self, center: Point) -> Option<Rect> {
        if let Some(last) = self.last_center() {
            if !(last.distance(center) > self.min_distance) {
                return None;
            }
        }
        let stamp = Self::stamp_at(self.size, center);
        self.stamps.push(stamp);
        Some(stamp)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Line(Line),
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Media(Media),
    Text(Text),
    Eraser(Eraser),
}
impl Shape {
    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Line(_) => ObjectKind::Line,
            Self::Rectangle(_) => ObjectKind::Rectangle,
            Self::Ellipse(_) => ObjectKind::Ellipse,
            Self::Media(_) => ObjectKind::Media,
            Self::Text(_) => ObjectKind::Text,
            Self::Eraser(_) => ObjectKind::Eraser,
        }
    }
}

/// A kind of shape, usable as the namespace of a [`Handle`](crate::id::Handle).
pub trait Kind: Sized + 'static {
    const KIND: ObjectKind;
    fn get(shape: &Shape) -> Option<&Self>;
    fn get_mut(shape: &mut Shape) -> Option<&mut Self>;
}

/// Kinds with a replaceable style snapshot.
pub trait Styled: Kind {
    type Style: ObjectStyle;
    fn style(&self) -> &Self::Style;
    fn replace_style(&mut self, style: Self::Style) -> Self::Style;
}

/// Kinds positioned by a frame, which can be moved.
pub trait Placed: Kind {
    fn frame(&self) -> Rect;
    fn set_origin(&mut self, x: i32, y: i32);
}

/// Kinds whose drawn size is chosen by the caller.
pub trait Resizable: Placed {
    fn set_size(&mut self, size: Size);
}

macro_rules! kinds {
    ($($kind:ident),* $(,)?) => {$(
        impl Kind for $kind {
            const KIND: ObjectKind = ObjectKind::$kind;
            fn get(shape: &Shape) -> Option<&Self> {
                match shape {
                    Shape::$kind(this) => Some(this),
                    _ => None,
                }
            }
            fn get_mut(shape: &mut Shape) -> Option<&mut Self> {
                match shape {
                    Shape::$kind(this) => Some(this),
                    _ => None,
                }
            }
        }
    )*};
}
kinds!(Line, Rectangle, Ellipse, Media, Text, Eraser);

macro_rules! styled {
    ($($kind:ident => $style:ident),* $(,)?) => {$(
        impl Styled for $kind {
            type Style = $style;
            fn style(&self) -> &$style {
                &self.style
            }
            fn replace_style(&mut self, style: $style) -> $style {
                std::mem::replace(&mut self.style, style)
            }
        }
    )*};
}
styled!(
    Line => LineStyle,
    Rectangle => RectangleStyle,
    Ellipse => EllipseStyle,
    Media => MediaStyle,
    Text => TextStyle,
);

macro_rules! placed {
    ($($kind:ident),* $(,)?) => {$(
        impl Placed for $kind {
            fn frame(&self) -> Rect {
                self.frame
            }
            fn set_origin(&mut self, x: i32, y: i32) {
                self.frame.x = x;
                self.frame.y = y;
            }
        }
    )*};
}
placed!(Rectangle, Ellipse, Media, Text);

macro_rules! resizable {
    ($($kind:ident),* $(,)?) => {$(
        impl Resizable for $kind {
            fn set_size(&mut self, size: Size) {
                self.frame.width = size.width;
                self.frame.height = size.height;
            }
        }
    )*};
}
resizable!(Rectangle, Ellipse, Media);

/// An object on a surface, live or undone.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
    pub(crate) id: ObjectId,
    pub(crate) aabb: Rect,
    pub(crate) transform: TransformSlots,
    pub(crate) shape: Shape,
}
impl SceneObject {
    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.id
    }
    /// Untransformed bounds of the geometry, not including the stroke border.
    #[must_use]
    pub fn aabb(&self) -> Rect {
        self.aabb
    }
    #[must_use]
    pub fn transform(&self) -> &TransformSlots {
        &self.transform
    }
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }
    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        self.shape.kind()
    }
    /// Get the shape, if it is of kind `K`.
    #[must_use]
    pub fn get<K: Kind>(&self) -> Option<&K> {
        K::get(&self.shape)
    }
    /// How far past the [`aabb`](Self::aabb) this object may draw.
    #[must_use]
    pub fn border(&self) -> f32 {
        match &self.shape {
            Shape::Line(line) => line.style.border(),
            Shape::Rectangle(rect) => rect.style.border(),
            Shape::Ellipse(ellipse) => ellipse.style.border(),
            Shape::Media(media) => media.style.border(),
            Shape::Text(text) => text.style.border(),
            Shape::Eraser(_) => 0.0,
        }
    }
    /// Every surface pixel this object could touch: the bounds expanded by the border, then transformed.
    #[must_use]
    pub fn dirty_rect(&self) -> Rect {
        self.dirty_rect_of(self.aabb)
    }
    /// As [`Self::dirty_rect`], for a region of this object's own geometry.
    #[must_use]
    pub fn dirty_rect_of(&self, region: Rect) -> Rect {
        self.transform
            .matrix()
            .map_rect(region.expand(self.border()))
    }
    /// Frame rates this object currently needs redraws at.
    #[must_use]
    pub fn animation_rates(&self) -> &[u32] {
        match &self.shape {
            Shape::Media(media) if media.playback.is_animating() => &media.frame_rates,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::id::IdAllocator;
    use crate::state::style::Shadow;

    fn rectangle(style: RectangleStyle) -> SceneObject {
        let frame = Rect::new(10, 10, 20, 20);
        SceneObject {
            id: IdAllocator::default().allocate(),
            aabb: frame,
            transform: TransformSlots::default(),
            shape: Shape::Rectangle(Rectangle { frame, style }),
        }
    }

    #[test]
    fn kind_access() {
        let object = rectangle(RectangleStyle::default());
        assert_eq!(object.kind(), ObjectKind::Rectangle);
        assert!(object.get::<Rectangle>().is_some());
        assert!(object.get::<Ellipse>().is_none());
        assert!(object.animation_rates().is_empty());
    }
    #[test]
    fn dirty_rect_expands() {
        // Width 3, so 1.5 either side.
        let object = rectangle(RectangleStyle::default());
        assert_eq!(object.dirty_rect(), Rect::new(8, 8, 24, 24));

        let object = rectangle(RectangleStyle {
            shadow: Shadow {
                blur: 2.0,
                offset: [4.0, 0.0],
                ..Default::default()
            },
            ..Default::default()
        });
        assert_eq!(object.dirty_rect(), Rect::new(2, 2, 36, 36));
    }
    #[test]
    fn dirty_rect_transformed() {
        let mut object = rectangle(RectangleStyle::default());
        object.transform.translate = Some([100, 0]);
        assert_eq!(object.dirty_rect(), Rect::new(108, 8, 24, 24));
    }
    #[test]
    fn placement() {
        let mut rect = Rectangle {
            frame: Rect::new(0, 0, 1, 1),
            style: RectangleStyle::default(),
        };
        rect.set_origin(5, 6);
        rect.set_size(Size::new(7, 8));
        assert_eq!(rect.frame(), Rect::new(5, 6, 7, 8));
        let old = rect.replace_style(RectangleStyle {
            radius: 4.0,
            ..Default::default()
        });
        assert_eq!(old, RectangleStyle::default());
    }
    #[test]
    fn eraser_spacing() {
        let size = Size::new(10, 10);
        let first = Eraser::stamp_at(size, Point::new(20.0, 20.0));
        assert_eq!(first, Rect::new(15, 15, 10, 10));
        let mut eraser = Eraser {
            size,
            stamps: vec![first],
            min_distance: 1.0,
        };
        assert_eq!(eraser.push(Point::new(21.0, 20.0)), None);
        assert_eq!(
            eraser.push(Point::new(25.5, 20.0)),
            Some(Rect::new(20, 15, 10, 10))
        );
        assert_eq!(eraser.stamps().len(), 2);
    }
}
