//! # Rendering
//! The surface never rasterizes anything itself. It decides *what* to clear and redraw, in what order,
//! with what geometry, and hands that to the host's [`Renderer`]. [`dispatch`] turns one object into one
//! [`PaintRequest`].

use crate::geom::{Path, Point, Rect, RectF, Size};
use crate::id::ObjectId;
use crate::media::MediaHandle;
use crate::state::object::{Media, SceneObject, Shape};
use crate::state::style::{
    EllipseStyle, FontState, LineStyle, MediaStyle, RectangleStyle, TextStyle,
};
use crate::state::transform::TransformSlots;

/// Still image encodings, named by MIME type.
#[derive(
    strum::AsRefStr, strum::Display, strum::EnumString, PartialEq, Eq, Copy, Clone, Hash, Debug, Default,
)]
pub enum ImageFormat {
    #[default]
    #[strum(serialize = "image/png")]
    Png,
    #[strum(to_string = "image/jpeg", serialize = "image/jpg")]
    Jpeg,
    #[strum(serialize = "image/webp")]
    Webp,
}

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("renderer can't encode {0}")]
    Unsupported(ImageFormat),
    #[error("renderer failed: {0}")]
    Backend(String),
}

/// Raw text measurements, in logical pixels.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct TextMetrics {
    pub width: f32,
    /// Distance above the baseline of the tallest glyph.
    pub ascent: f32,
    /// Distance below the baseline of the lowest glyph.
    pub descent: f32,
}
impl TextMetrics {
    /// Whole-pixel box the text occupies.
    #[must_use]
    pub fn size(&self) -> Size {
        let width = crate::util::finite_or(self.width, 0.0).max(0.0);
        let height = crate::util::finite_or(self.ascent + self.descent, 0.0).max(0.0);
        Size::new(
            crate::util::truncate(width.ceil()),
            crate::util::truncate(height.ceil()),
        )
    }
}

/// Host drawing capability.
pub trait Renderer {
    /// Erase a region of the surface to transparent.
    fn clear_region(&mut self, rect: Rect);
    /// Draw one object.
    fn paint(&mut self, request: &PaintRequest<'_>);
    /// Measure `text` as it would be drawn with `font`, under an optional pending scale.
    fn measure_text(&mut self, text: &str, font: &FontState, scale: Option<[f32; 2]>) -> TextMetrics;
    /// A new frame is complete, and may be handed to downstream consumers.
    fn publish_frame(&mut self);
    /// Current size of the drawing surface.
    fn surface_size(&self) -> Size;
    /// Encode the current contents of the surface.
    fn encode_still(&mut self, format: ImageFormat, quality: f32) -> Result<Vec<u8>, RenderError>;
}

/// Everything needed to draw one object.
#[derive(Clone, Debug, PartialEq)]
pub struct PaintRequest<'a> {
    pub id: ObjectId,
    /// Apply [`TransformSlots::steps`] in order, draw, then clip if requested.
    pub transform: &'a TransformSlots,
    pub draw: Draw<'a>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Draw<'a> {
    Line {
        path: &'a Path,
        /// Only a newly appended piece of the line.
        partial: bool,
        /// Stroke the path. False only when filled with a zero-width outline.
        outline: bool,
        style: &'a LineStyle,
    },
    Rectangle {
        /// Already inset by half the outline width.
        rect: RectF,
        outline: bool,
        style: &'a RectangleStyle,
    },
    Ellipse {
        center: Point,
        radii: [f32; 2],
        outline: bool,
        style: &'a EllipseStyle,
    },
    Media {
        media: &'a MediaHandle,
        /// Region of the media to draw, in media pixels.
        source: RectF,
        /// Where to draw it.
        destination: RectF,
        /// Rounded rect to outline and clip to, if any.
        border: Option<RectF>,
        style: &'a MediaStyle,
    },
    Text {
        text: &'a str,
        /// Left end of the baseline.
        origin: Point,
        outline: bool,
        style: &'a TextStyle,
    },
    /// Clear each rectangle.
    Erase { stamps: &'a [Rect] },
}

/// A piece of an object to draw instead of the whole.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Partial<'a> {
    Path(&'a Path),
    Stamps(&'a [Rect]),
}

/// Issue the paint for one object. A partial of the wrong kind for the object is ignored.
pub fn dispatch<R: Renderer + ?Sized>(
    renderer: &mut R,
    object: &SceneObject,
    partial: Option<Partial<'_>>,
) {
    log::trace!("paint {} {}", object.kind(), object.id());
    let draw = match &object.shape {
        Shape::Line(line) => {
            let (path, partial) = match partial {
                Some(Partial::Path(path)) => (path, true),
                _ => (line.stroke.path(), false),
            };
            Draw::Line {
                path,
                partial,
                outline: line.style.stroke.width > 0.0 || line.style.fill.is_none(),
                style: &line.style,
            }
        }
        Shape::Rectangle(rect) => {
            let lw = rect.style.stroke.width;
            let frame = RectF::from(rect.frame);
            Draw::Rectangle {
                rect: RectF::new(
                    frame.x + lw / 2.0,
                    frame.y + lw / 2.0,
                    frame.width - lw,
                    frame.height - lw,
                ),
                outline: lw > 0.0 || rect.style.fill.is_none(),
                style: &rect.style,
            }
        }
        Shape::Ellipse(ellipse) => {
            let lw = ellipse.style.stroke.width;
            let frame = RectF::from(ellipse.frame);
            let half = [(frame.width / 2.0).round(), (frame.height / 2.0).round()];
            Draw::Ellipse {
                center: Point::new(
                    frame.x + half[0] + lw / 2.0,
                    frame.y + half[1] + lw / 2.0,
                ),
                radii: half.map(|h| (h - lw).abs()),
                outline: lw > 0.0 || ellipse.style.fill.is_none(),
                style: &ellipse.style,
            }
        }
        Shape::Media(media) => {
            let geometry = MediaGeometry::of(media);
            Draw::Media {
                media: &media.media,
                source: geometry.source,
                destination: geometry.destination,
                border: geometry.border,
                style: &media.style,
            }
        }
        Shape::Text(text) => Draw::Text {
            text: &text.text,
            origin: Point::new(
                text.frame.x as f32,
                text.frame.y as f32 + text.frame.height as f32,
            ),
            outline: text.style.stroke.width > 0.0 || text.style.fill.is_none(),
            style: &text.style,
        },
        Shape::Eraser(eraser) => Draw::Erase {
            stamps: match partial {
                Some(Partial::Stamps(stamps)) => stamps,
                _ => eraser.stamps.as_slice(),
            },
        },
    };
    renderer.paint(&PaintRequest {
        id: object.id,
        transform: &object.transform,
        draw,
    });
}

/// Where and how much of a media object to draw.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MediaGeometry {
    pub source: RectF,
    pub destination: RectF,
    pub border: Option<RectF>,
}
impl MediaGeometry {
    /// Center-crop the media to the frame's aspect ratio, then crop further by the zoom.
    /// The destination is inset by half the outline width.
    #[must_use]
    pub fn of(media: &Media) -> Self {
        let lw = media.style.stroke.width;
        let zoom = media.style.zoom.max(1.0);
        let frame = RectF::from(media.frame);
        let intrinsic = RectF::from(Rect::new(0, 0, media.intrinsic.width, media.intrinsic.height));

        let (mut sx, mut sy) = (0.0, 0.0);
        let (mut sw, mut sh) = (intrinsic.width, intrinsic.height);
        if frame.height != 0.0 && sh != 0.0 && frame.width != 0.0 {
            let frame_aspect = frame.width / frame.height;
            let media_aspect = sw / sh;
            // Compared at one decimal place, so near-matches are left uncropped.
            if (frame_aspect * 10.0).round() != (media_aspect * 10.0).round() {
                if frame_aspect < media_aspect {
                    sw = sh * frame_aspect;
                    sx = (intrinsic.width - sw) / 2.0;
                } else {
                    sh = sw / frame_aspect;
                    sy = (intrinsic.height - sh) / 2.0;
                }
            }
        }

        // Zoom keeps the center of the cropped region fixed.
        let margin = (1.0 - 1.0 / zoom) / 2.0;
        let source = RectF::new(
            (sx + sw * margin).round(),
            (sy + sh * margin).round(),
            (sw / zoom).round(),
            (sh / zoom).round(),
        );
        let destination = RectF::new(
            (frame.x + lw / 2.0).round(),
            (frame.y + lw / 2.0).round(),
            (frame.width - lw).round(),
            (frame.height - lw).round(),
        );
        let border = (lw > 0.0 || media.style.radius > 0.0).then_some(destination);
        Self {
            source,
            destination,
            border,
        }
    }
}
