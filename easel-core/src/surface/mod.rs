//! # Surface
//! One drawing surface: the scene, the host capabilities it draws with, and the animation loop.
//!
//! Every mutation runs to completion, including clearing and redrawing whatever it damaged and
//! publishing the new frame, before returning. The raster and the scene are therefore never observably
//! out of sync between calls.
//!
//! Objects are created through the `create_*` methods, which return a typed [`Handle`]. Handles are
//! turned into a [`Writer`] with [`Surface::edit`] to change the object afterwards.

mod writer;

use std::time::Duration;

use smallvec::SmallVec;

pub use writer::Writer;

use crate::config::{ConfigError, SurfaceConfig};
use crate::damage::{self, Damage};
use crate::geom::{Point, Rect, Size};
use crate::id::{Handle, ObjectId};
use crate::media::{self, MediaEvent, MediaHandle, MediaSource, NoMedia, Playback};
use crate::render::{self, ImageFormat, Partial, RenderError, Renderer};
use crate::schedule::{self, Clock, MonotonicClock, Scheduler};
use crate::state::object::{
    Ellipse, Eraser, Kind, Line, Media, Rectangle, SceneObject, Shape, Text,
};
use crate::state::style::{EllipseStyle, LineStyle, MediaStyle, ObjectStyle, RectangleStyle, TextStyle};
use crate::state::transform::TransformSlots;
use crate::state::Scene;
use crate::stroke::StrokeBuilder;
use crate::util::{finite_or, truncate};

#[derive(thiserror::Error, Debug)]
pub enum SurfaceError {
    /// The media kind is unknown, or the media source can't describe it.
    #[error("invalid media: {0}")]
    InvalidMedia(String),
    #[error("export failed: {0}")]
    Export(#[from] RenderError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Position and optional size of a new object, before truncation.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: Option<f32>,
    pub height: Option<f32>,
}
impl Frame {
    /// Placed at `(x, y)`, with the kind's default size.
    #[must_use]
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            width: None,
            height: None,
        }
    }
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: Some(width),
            height: Some(height),
        }
    }
    fn width(&self) -> Option<i32> {
        self.width.map(|w| truncate(w).max(0))
    }
    fn height(&self) -> Option<i32> {
        self.height.map(|h| truncate(h).max(0))
    }
    /// Integer rect, with missing dimensions defaulting to twice the outline width.
    fn or_outline(&self, line_width: f32) -> Rect {
        let fallback = truncate(line_width * 2.0);
        Rect::new(
            truncate(self.x),
            truncate(self.y),
            self.width().unwrap_or(fallback),
            self.height().unwrap_or(fallback),
        )
    }
}

pub struct Surface<R> {
    renderer: R,
    media: Box<dyn MediaSource>,
    clock: Box<dyn Clock>,
    config: SurfaceConfig,
    scene: Scene,
    scheduler: Scheduler,
    last_damage: Damage,
}

impl<R: Renderer> Surface<R> {
    /// An empty surface. Media creation fails until a source is given with
    /// [`Self::with_media_source`].
    pub fn new(renderer: R, config: SurfaceConfig) -> Self {
        Self {
            renderer,
            media: Box::new(NoMedia),
            clock: Box::<MonotonicClock>::default(),
            config: config.normalized(),
            scene: Scene::default(),
            scheduler: Scheduler::default(),
            last_damage: Damage::default(),
        }
    }
    /// An empty surface, configured from a TOML file.
    pub fn from_config_file(
        renderer: R,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, SurfaceError> {
        Ok(Self::new(renderer, SurfaceConfig::load(path)?))
    }
    #[must_use]
    pub fn with_media_source(mut self, media: impl MediaSource + 'static) -> Self {
        self.media = Box::new(media);
        self
    }
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }
    pub fn renderer(&self) -> &R {
        &self.renderer
    }
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }
    pub fn scene(&self) -> &Scene {
        &self.scene
    }
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
    /// Everything cleared and redrawn by the most recent mutation, in paint order.
    pub fn last_damage(&self) -> &Damage {
        &self.last_damage
    }

    pub fn find(&self, id: ObjectId) -> Option<&SceneObject> {
        self.scene.get(id)
    }
    /// The live object behind `handle`.
    pub fn get<K: Kind>(&self, handle: Handle<K>) -> Option<&K> {
        self.scene.get(handle.id())?.get::<K>()
    }
    /// Live IDs, back to front.
    pub fn live_ids(&self) -> impl DoubleEndedIterator<Item = ObjectId> + '_ {
        self.scene.live_ids()
    }
    pub fn undone_ids(&self) -> impl DoubleEndedIterator<Item = ObjectId> + '_ {
        self.scene.undone_ids()
    }
    pub fn len(&self) -> usize {
        self.scene.len()
    }
    pub fn is_empty(&self) -> bool {
        self.scene.is_empty()
    }

    /// The style new lines get when none is given: configured smoothing and distance gate.
    #[must_use]
    pub fn line_style(&self) -> LineStyle {
        self.config.line_style()
    }
    /// Start a stroke at `origin`. Without a style, [`Self::line_style`] is used.
    pub fn create_line(&mut self, origin: Point, style: Option<LineStyle>) -> Handle<Line> {
        let style = style.unwrap_or_else(|| self.line_style());
        let origin = origin.truncated();
        let aabb = Rect::new(truncate(origin.x), truncate(origin.y), 0, 0);
        self.insert(
            aabb,
            Shape::Line(Line {
                stroke: StrokeBuilder::new(origin),
                style: style.normalized(),
            }),
        )
    }
    pub fn create_rectangle(&mut self, frame: Frame, style: RectangleStyle) -> Handle<Rectangle> {
        let style = style.normalized();
        let frame = frame.or_outline(style.stroke.width);
        self.insert(frame.normalized(), Shape::Rectangle(Rectangle { frame, style }))
    }
    pub fn create_ellipse(&mut self, frame: Frame, style: EllipseStyle) -> Handle<Ellipse> {
        let style = style.normalized();
        let frame = frame.or_outline(style.stroke.width);
        self.insert(frame.normalized(), Shape::Ellipse(Ellipse { frame, style }))
    }
    /// Place host media. A missing dimension follows the media's aspect ratio.
    ///
    /// Fails with [`SurfaceError::InvalidMedia`], leaving the scene untouched, if the media source
    /// doesn't know the media.
    pub fn create_media(
        &mut self,
        media: MediaHandle,
        frame: Frame,
        style: MediaStyle,
    ) -> Result<Handle<Media>, SurfaceError> {
        let Some(intrinsic) = self.media.intrinsic_size(&media) else {
            return Err(SurfaceError::InvalidMedia(format!(
                "{} {}",
                media.kind, media.key
            )));
        };
        let size = media::fit_size(intrinsic, frame.width(), frame.height());
        let rect = Rect::new(truncate(frame.x), truncate(frame.y), size.width, size.height);
        let frame_rates = media::whole_frame_rates(&self.media.frame_rates(&media));
        let handle = self.insert(
            rect,
            Shape::Media(Media {
                media,
                frame: rect,
                intrinsic,
                frame_rates,
                playback: Playback::default(),
                style: style.normalized(),
            }),
        );
        self.media.watch(&media, handle.id());
        self.reloop();
        Ok(handle)
    }
    /// Place text with the top left of its measured box at `origin`.
    pub fn create_text(
        &mut self,
        text: impl Into<String>,
        origin: Point,
        style: TextStyle,
    ) -> Handle<Text> {
        let text = text.into();
        let style = style.normalized();
        let size = self.renderer.measure_text(&text, &style.font, None).size();
        let frame = Rect::new(
            truncate(origin.x),
            truncate(origin.y),
            size.width,
            size.height,
        );
        self.insert(frame, Shape::Text(Text { text, frame, style }))
    }
    /// Start erasing with a first stamp centred on `center`. Size defaults to the configured eraser size.
    pub fn create_eraser(&mut self, center: Point, size: Option<Size>) -> Handle<Eraser> {
        let size = size.map_or_else(
            || self.config.eraser_size(),
            |size| Size::new(size.width.max(1), size.height.max(1)),
        );
        let stamp = Eraser::stamp_at(size, center);
        self.insert(
            stamp,
            Shape::Eraser(Eraser {
                size,
                stamps: vec![stamp],
                min_distance: self.config.stroke.min_distance,
            }),
        )
    }
    /// Insert on top and paint. Nothing is above a new object, so nothing else needs redrawing.
    fn insert<K: Kind>(&mut self, aabb: Rect, shape: Shape) -> Handle<K> {
        let id = self.scene.allocate();
        let object = SceneObject {
            id,
            aabb,
            transform: TransformSlots::default(),
            shape,
        };
        log::debug!("create {} {id}", object.kind());
        self.last_damage = damage::resolve([id], [(id, object.dirty_rect())]);
        render::dispatch(&mut self.renderer, &object, None);
        self.scene.insert(object);
        self.renderer.publish_frame();
        Handle::new(id)
    }

    /// Start editing a live object. `None` if it has been undone or cleared.
    pub fn edit<K: Kind>(&mut self, handle: Handle<K>) -> Option<Writer<'_, R, K>> {
        match self.scene.get(handle.id()).map(SceneObject::kind) {
            Some(kind) if kind == K::KIND => Some(Writer::new(self, handle)),
            Some(kind) => {
                log::warn!("{handle} refers to a {kind}");
                None
            }
            None => {
                log::warn!("{handle} is not live");
                None
            }
        }
    }

    /// Undo the `count` most recent creations, returning how many were undone.
    pub fn undo(&mut self, count: usize) -> usize {
        let ids = self.scene.topmost(count);
        if ids.is_empty() {
            return 0;
        }
        log::debug!("undo {} objects", ids.len());
        let mut retired_media = SmallVec::<[(MediaHandle, ObjectId); 2]>::new();
        self.rerender(&ids, |scene, _| {
            for object in scene.retire(&ids) {
                if let Shape::Media(media) = &object.shape {
                    retired_media.push((media.media, object.id));
                }
            }
        });
        if !retired_media.is_empty() {
            for (media, id) in &retired_media {
                self.media.unwatch(media, *id);
            }
            self.reloop();
        }
        ids.len()
    }
    /// Redo the `count` most recent undos, returning how many were redone.
    ///
    /// The most recently undone objects come back first. Those have the lowest undone IDs, so the
    /// restored objects always sit directly above the live ones and z-order is the same as before the
    /// undo.
    pub fn redo(&mut self, count: usize) -> usize {
        let ids = self.scene.next_redo(count);
        if ids.is_empty() {
            return 0;
        }
        log::debug!("redo {} objects", ids.len());
        let mut restored_media = SmallVec::<[(MediaHandle, ObjectId); 2]>::new();
        let mut painted = Vec::with_capacity(ids.len());
        // Every undone object is above every live one, so these go straight on top.
        for object in self.scene.restore(&ids) {
            render::dispatch(&mut self.renderer, object, None);
            painted.push((object.id, object.dirty_rect()));
            if let Shape::Media(media) = &object.shape {
                restored_media.push((media.media, object.id));
            }
        }
        self.renderer.publish_frame();
        self.last_damage = damage::resolve(ids.iter().copied(), painted);
        if !restored_media.is_empty() {
            for (media, id) in &restored_media {
                self.media.watch(media, *id);
            }
            self.reloop();
        }
        ids.len()
    }
    /// Remove every object, live and undone, and blank the surface.
    pub fn clear(&mut self) {
        let (live, undone) = self.scene.clear();
        log::debug!("clear {} live, {} undone", live.len(), undone.len());
        for object in &live {
            if let Shape::Media(media) = &object.shape {
                self.media.unwatch(&media.media, object.id);
            }
        }
        self.clear_all();
        self.renderer.publish_frame();
        self.last_damage = Damage::default();
        self.reloop();
    }
    /// The host surface changed size and lost its contents. Repaint everything.
    pub fn on_resize(&mut self) {
        self.clear_all();
        for object in self.scene.live() {
            render::dispatch(&mut self.renderer, object, None);
        }
        self.renderer.publish_frame();
        self.last_damage = damage::resolve(self.scene.live_ids(), self.scene.dirty_rects());
    }
    fn clear_all(&mut self) {
        let size = self.renderer.surface_size();
        self.renderer
            .clear_region(Rect::new(0, 0, size.width, size.height));
    }

    /// Encode the surface's current contents. Unknown MIME types encode as PNG.
    pub fn export_still_image(
        &mut self,
        mime: &str,
        quality: Option<f32>,
    ) -> Result<Vec<u8>, SurfaceError> {
        let format = mime.parse::<ImageFormat>().unwrap_or_else(|_| {
            log::warn!("unknown image type {mime:?}, using {}", ImageFormat::Png);
            ImageFormat::Png
        });
        let default = self.config.export.quality;
        let quality = quality.map_or(default, |q| finite_or(q, default).clamp(0.0, 1.0));
        Ok(self.renderer.encode_still(format, quality)?)
    }

    /// The host reports a playback change on media `id`. Returns false if `id` isn't live media.
    pub fn notify_media(&mut self, id: ObjectId, event: MediaEvent) -> bool {
        let Some(media) = self
            .scene
            .get_mut(id)
            .and_then(|object| Media::get_mut(&mut object.shape))
        else {
            log::warn!("{event:?} for {id}, which is not live media");
            return false;
        };
        let playback = media.playback.after(event);
        if playback != media.playback {
            media.playback = playback;
            self.reloop();
        }
        true
    }
    /// Frame rates of media `id`, probed after creation. Ignored, returning false, if `id` is no longer
    /// live media.
    pub fn apply_frame_rates(&mut self, id: ObjectId, rates: &[f64]) -> bool {
        let Some(media) = self
            .scene
            .get_mut(id)
            .and_then(|object| Media::get_mut(&mut object.shape))
        else {
            log::warn!("frame rates for {id}, which is not live media");
            return false;
        };
        media.frame_rates = media::whole_frame_rates(rates);
        self.reloop();
        true
    }

    /// Delay until [`Self::tick`] should first be called, or `None` if nothing is animating.
    pub fn animation_delay(&self) -> Option<Duration> {
        self.scheduler.next_delay()
    }
    /// Redraw the media due at this tick. Returns the delay until the next tick, less the time
    /// this one took, or `None` once nothing is animating.
    pub fn tick(&mut self) -> Option<Duration> {
        let started = self.clock.now();
        let time_ms = self.scheduler.advance()?;
        let due: Vec<ObjectId> = self
            .scene
            .live()
            .filter(|object| schedule::is_due(object.animation_rates(), time_ms))
            .map(SceneObject::id)
            .collect();
        if !due.is_empty() {
            self.rerender(&due, |_, _| ());
        }
        let elapsed = self.clock.now().saturating_sub(started);
        self.scheduler.compensated_delay(elapsed)
    }
    fn reloop(&mut self) {
        let rates: SmallVec<[u32; 4]> = self
            .scene
            .live()
            .flat_map(|object| object.animation_rates().iter().copied())
            .collect();
        self.scheduler.reloop(rates, self.config.schedule.max_cycle);
    }

    /// Apply `mutate` to the scene, clearing and redrawing everything it touches.
    ///
    /// Regions are found both before and after the change, so that what an object used to cover is
    /// revealed and what it now covers is drawn over.
    fn rerender(&mut self, seeds: &[ObjectId], mutate: impl FnOnce(&mut Scene, &mut R)) {
        let before = damage::resolve(seeds.iter().copied(), self.scene.dirty_rects());
        for rect in before.rects() {
            self.renderer.clear_region(rect);
        }
        mutate(&mut self.scene, &mut self.renderer);

        let mut after = damage::resolve(
            seeds.iter().copied().chain(before.ids()),
            self.scene.dirty_rects(),
        );
        for (id, rect) in after.iter() {
            if before.rect_of(id) != Some(rect) {
                self.renderer.clear_region(rect);
            }
        }
        for id in after.ids() {
            if let Some(object) = self.scene.get(id) {
                render::dispatch(&mut self.renderer, object, None);
            }
        }
        self.renderer.publish_frame();
        log::debug!(
            "{} seeds damaged {} objects",
            seeds.len(),
            before.len().max(after.len())
        );
        after.merge(before);
        self.last_damage = after;
    }
    /// Paint a piece of object `id` that covers `region` of its own geometry. Falls back on a full
    /// redraw if anything above it would be painted over.
    fn paint_partial(&mut self, id: ObjectId, region: Rect, partial: Partial<'_>) {
        let Some(object) = self.scene.get(id) else {
            return;
        };
        let dirty = object.dirty_rect_of(region);
        if self.scene.is_covered(id, dirty) {
            self.rerender(&[id], |_, _| ());
        } else {
            render::dispatch(&mut self.renderer, object, Some(partial));
            self.renderer.publish_frame();
            self.last_damage = damage::resolve([id], [(id, dirty)]);
        }
    }
}

/// Re-measure text after its content, font, or scale changed.
fn fit_text<R: Renderer + ?Sized>(object: &mut SceneObject, renderer: &mut R) {
    let scale = object.transform.scale;
    if let Shape::Text(text) = &mut object.shape {
        let size = renderer.measure_text(&text.text, &text.style.font, scale).size();
        text.frame.width = size.width;
        text.frame.height = size.height;
        object.aabb = text.frame;
    }
}
