use super::{fit_text, Surface};
use crate::geom::{Point, Size};
use crate::id::{Handle, ObjectId};
use crate::render::{Partial, Renderer};
use crate::state::object::{Eraser, Kind, Line, Placed, Resizable, SceneObject, Shape, Styled, Text};
use crate::state::style::{FillRule, ObjectStyle};
use crate::state::transform::Matrix;
use crate::stroke::StrokeStep;
use crate::util::{finite_or, truncate};

/// Edits to one live object. Which edits are available depends on the kind of object.
///
/// Holds the surface exclusively, so the object can't be undone while a writer exists.
pub struct Writer<'s, R: Renderer, K: Kind> {
    surface: &'s mut Surface<R>,
    handle: Handle<K>,
}

impl<'s, R: Renderer, K: Kind> Writer<'s, R, K> {
    pub(super) fn new(surface: &'s mut Surface<R>, handle: Handle<K>) -> Self {
        Self { surface, handle }
    }
    #[must_use]
    pub fn handle(&self) -> Handle<K> {
        self.handle
    }
    #[must_use]
    pub fn get(&self) -> Option<&K> {
        self.surface.get(self.handle)
    }
    fn id(&self) -> ObjectId {
        self.handle.id()
    }
    /// Change the object, then clear and redraw everything the change affects.
    fn modify(&mut self, change: impl FnOnce(&mut SceneObject)) {
        let id = self.id();
        self.surface.rerender(&[id], |scene, renderer| {
            if let Some(object) = scene.get_mut(id) {
                change(object);
                fit_text(object, renderer);
            }
        });
    }
}

/// Transform slots and restyling.
impl<R: Renderer, K: Styled> Writer<'_, R, K> {
    /// Fill the translate slot, truncated to whole pixels.
    pub fn translate(&mut self, x: f32, y: f32) {
        let slot = [truncate(x), truncate(y)];
        self.modify(|object| object.transform.translate = Some(slot));
    }
    pub fn scale(&mut self, x: f32, y: f32) {
        let slot = [finite_or(x, 1.0), finite_or(y, 1.0)];
        self.modify(|object| object.transform.scale = Some(slot));
    }
    /// Fill the rotate slot, in radians clockwise.
    pub fn rotate(&mut self, angle: f32) {
        let angle = finite_or(angle, 0.0);
        self.modify(|object| object.transform.rotate = Some(angle));
    }
    /// Fill the generic matrix slot, applied after every other slot.
    pub fn set_transform(&mut self, matrix: Matrix) {
        if !matrix.is_finite() {
            log::warn!("ignoring non-finite transform for {}", self.handle);
            return;
        }
        self.modify(|object| object.transform.matrix = Some(matrix));
    }
    /// Clip this object's drawing to its own outline.
    pub fn clip(&mut self, rule: FillRule) {
        self.modify(|object| object.transform.clip = Some(rule));
    }
    /// Replace the whole style snapshot.
    pub fn restyle(&mut self, style: K::Style) {
        let style = style.normalized();
        self.modify(|object| {
            let smoothing = match &object.shape {
                Shape::Line(line) => Some(line.style.smoothing),
                _ => None,
            };
            if let Some(this) = K::get_mut(&mut object.shape) {
                this.replace_style(style);
            }
            if let (Some(previous), Shape::Line(line)) = (smoothing, &mut object.shape) {
                if let Some(tail) = line.stroke.resmooth(&previous, &line.style.smoothing) {
                    object.aabb.include_rect(tail.bounds());
                }
            }
        });
    }
}

impl<R: Renderer, K: Placed> Writer<'_, R, K> {
    /// Move the top left of the object to `(x, y)`.
    pub fn reposition(&mut self, x: f32, y: f32) {
        let (x, y) = (truncate(x), truncate(y));
        self.modify(|object| {
            if let Some(this) = K::get_mut(&mut object.shape) {
                this.set_origin(x, y);
                object.aabb = this.frame().normalized();
            }
        });
    }
}

impl<R: Renderer, K: Resizable> Writer<'_, R, K> {
    /// Set the drawn size. Negative sizes are treated as zero.
    pub fn resize(&mut self, width: f32, height: f32) {
        let size = Size::new(truncate(width).max(0), truncate(height).max(0));
        self.modify(|object| {
            if let Some(this) = K::get_mut(&mut object.shape) {
                this.set_size(size);
                object.aabb = this.frame();
            }
        });
    }
}

impl<R: Renderer> Writer<'_, R, Line> {
    /// Offer the next input point of the stroke. New geometry is painted immediately.
    pub fn append_point(&mut self, point: Point) -> StrokeStep {
        let id = self.id();
        let point = point.truncated();
        let Some(object) = self.surface.scene.get_mut(id) else {
            return StrokeStep::Rejected;
        };
        let Shape::Line(line) = &mut object.shape else {
            return StrokeStep::Rejected;
        };
        let step = line
            .stroke
            .push(point, line.style.min_distance, &line.style.smoothing);
        if step.accepted() {
            object.aabb.include(truncate(point.x), truncate(point.y));
        }
        if let StrokeStep::Drawn(delta) = &step {
            let region = delta.bounds();
            object.aabb.include_rect(region);
            self.surface.paint_partial(id, region, Partial::Path(delta));
        }
        step
    }
    /// Draw any points still held back for smoothing. Returns whether anything was drawn.
    pub fn finish_stroke(&mut self) -> bool {
        let id = self.id();
        let Some(object) = self.surface.scene.get_mut(id) else {
            return false;
        };
        let Shape::Line(line) = &mut object.shape else {
            return false;
        };
        let Some(delta) = line.stroke.finish(&line.style.smoothing) else {
            return false;
        };
        let region = delta.bounds();
        object.aabb.include_rect(region);
        self.surface.paint_partial(id, region, Partial::Path(&delta));
        true
    }
}

impl<R: Renderer> Writer<'_, R, Text> {
    /// Replace the text, re-measuring its box.
    pub fn rewrite(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.modify(|object| {
            if let Shape::Text(this) = &mut object.shape {
                this.text = text;
            }
        });
    }
}

impl<R: Renderer> Writer<'_, R, Eraser> {
    /// Stamp centred on `center`. Returns false if it was too close to the previous stamp.
    pub fn append_stamp(&mut self, center: Point) -> bool {
        let id = self.id();
        let Some(object) = self.surface.scene.get_mut(id) else {
            return false;
        };
        let Shape::Eraser(eraser) = &mut object.shape else {
            return false;
        };
        let Some(stamp) = eraser.push(center) else {
            return false;
        };
        object.aabb.include_rect(stamp);
        self.surface
            .paint_partial(id, stamp, Partial::Stamps(std::slice::from_ref(&stamp)));
        true
    }
}
