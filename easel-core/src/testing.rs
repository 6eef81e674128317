//! Stand-ins for the host capabilities, recording what the surface asks of them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

use crate::geom::{Point, Rect, RectF, Size};
use crate::id::ObjectId;
use crate::media::{MediaHandle, MediaSource};
use crate::render::{Draw, ImageFormat, PaintRequest, RenderError, Renderer, TextMetrics};
use crate::schedule::Clock;
use crate::state::style::FontState;
use crate::state::transform::TransformSlots;

#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Clear(Rect),
    Paint(Painted),
    Publish,
}

/// An owned copy of a [`PaintRequest`]'s interesting parts.
#[derive(Clone, Debug, PartialEq)]
pub struct Painted {
    pub id: ObjectId,
    pub transform: TransformSlots,
    pub draw: Drawn,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Drawn {
    Line { vertices: Vec<Point>, partial: bool },
    Rectangle { rect: RectF },
    Ellipse { center: Point, radii: [f32; 2] },
    Media { media: MediaHandle, source: RectF, destination: RectF },
    Text { text: String, origin: Point },
    Erase { stamps: Vec<Rect> },
}
impl From<&Draw<'_>> for Drawn {
    fn from(value: &Draw<'_>) -> Self {
        match value {
            Draw::Line { path, partial, .. } => Self::Line {
                vertices: path.vertices().to_vec(),
                partial: *partial,
            },
            Draw::Rectangle { rect, .. } => Self::Rectangle { rect: *rect },
            Draw::Ellipse { center, radii, .. } => Self::Ellipse {
                center: *center,
                radii: *radii,
            },
            Draw::Media {
                media,
                source,
                destination,
                ..
            } => Self::Media {
                media: **media,
                source: *source,
                destination: *destination,
            },
            Draw::Text { text, origin, .. } => Self::Text {
                text: (*text).to_owned(),
                origin: *origin,
            },
            Draw::Erase { stamps } => Self::Erase {
                stamps: stamps.to_vec(),
            },
        }
    }
}

/// Text is six pixels per char, eight up and two down, before scale.
pub const GLYPH_WIDTH: f32 = 6.0;

#[derive(Debug)]
pub struct RecordingRenderer {
    pub ops: Vec<Op>,
    pub size: Size,
}
impl Default for RecordingRenderer {
    fn default() -> Self {
        Self {
            ops: Vec::new(),
            size: Size::new(640, 480),
        }
    }
}
impl RecordingRenderer {
    /// IDs painted, in order.
    pub fn painted(&self) -> Vec<ObjectId> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Paint(painted) => Some(painted.id),
                _ => None,
            })
            .collect()
    }
    pub fn paints(&self) -> Vec<&Painted> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Paint(painted) => Some(painted),
                _ => None,
            })
            .collect()
    }
    pub fn cleared(&self) -> Vec<Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Clear(rect) => Some(*rect),
                _ => None,
            })
            .collect()
    }
    pub fn frames(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, Op::Publish)).count()
    }
    pub fn reset(&mut self) {
        self.ops.clear();
    }
}
impl Renderer for RecordingRenderer {
    fn clear_region(&mut self, rect: Rect) {
        self.ops.push(Op::Clear(rect));
    }
    fn paint(&mut self, request: &PaintRequest<'_>) {
        self.ops.push(Op::Paint(Painted {
            id: request.id,
            transform: request.transform.clone(),
            draw: (&request.draw).into(),
        }));
    }
    fn measure_text(&mut self, text: &str, _: &FontState, scale: Option<[f32; 2]>) -> TextMetrics {
        let [sx, sy] = scale.unwrap_or([1.0, 1.0]);
        TextMetrics {
            width: text.chars().count() as f32 * GLYPH_WIDTH * sx,
            ascent: 8.0 * sy,
            descent: 2.0 * sy,
        }
    }
    fn publish_frame(&mut self) {
        self.ops.push(Op::Publish);
    }
    fn surface_size(&self) -> Size {
        self.size
    }
    fn encode_still(&mut self, format: ImageFormat, quality: f32) -> Result<Vec<u8>, RenderError> {
        match format {
            ImageFormat::Webp => Err(RenderError::Unsupported(format)),
            _ => Ok(format!("{format};q={quality:.2}").into_bytes()),
        }
    }
}

/// Media with fixed sizes and rates, keyed by [`MediaHandle::key`].
#[derive(Debug, Default)]
pub struct ScriptedMedia {
    sizes: HashMap<u64, Size>,
    rates: HashMap<u64, SmallVec<[f64; 2]>>,
    pub watching: Arc<parking_lot::Mutex<HashSet<ObjectId>>>,
}
impl ScriptedMedia {
    pub fn with(mut self, key: u64, size: Size, rates: &[f64]) -> Self {
        self.sizes.insert(key, size);
        self.rates.insert(key, rates.iter().copied().collect());
        self
    }
}
impl MediaSource for ScriptedMedia {
    fn intrinsic_size(&self, media: &MediaHandle) -> Option<Size> {
        self.sizes.get(&media.key).copied()
    }
    fn frame_rates(&self, media: &MediaHandle) -> SmallVec<[f64; 2]> {
        self.rates.get(&media.key).cloned().unwrap_or_default()
    }
    fn watch(&mut self, _: &MediaHandle, id: ObjectId) {
        self.watching.lock().insert(id);
    }
    fn unwatch(&mut self, _: &MediaHandle, id: ObjectId) {
        self.watching.lock().remove(&id);
    }
}

/// A clock that only moves when told to, or by a fixed step every time it's read.
/// Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    micros: Arc<AtomicU64>,
    step: u64,
}
impl ManualClock {
    /// Every read of the time advances it by `step` afterwards.
    pub fn stepping(step: Duration) -> Self {
        Self {
            micros: Arc::default(),
            step: micros(step),
        }
    }
    pub fn advance(&self, by: Duration) {
        self.micros.fetch_add(micros(by), Ordering::Relaxed);
    }
}
fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}
impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_micros(self.micros.fetch_add(self.step, Ordering::Relaxed))
    }
}
