//! # Scene
//! The retained state of one surface: every live object in paint order, plus the objects that have
//! been undone and may yet be redone.
//!
//! Both sets are keyed by [`ObjectId`]. As IDs are handed out in increasing order, iterating the live set
//! by key *is* back-to-front paint order. An ID is in at most one of the two sets at a time.

pub mod object;
pub mod style;
pub mod transform;

use std::collections::BTreeMap;

use crate::geom::Rect;
use crate::id::{IdAllocator, ObjectId};
use object::SceneObject;

#[derive(Debug, Default)]
pub struct Scene {
    ids: IdAllocator,
    live: BTreeMap<ObjectId, SceneObject>,
    undone: BTreeMap<ObjectId, SceneObject>,
}

impl Scene {
    /// Reserve the ID for an object about to be inserted.
    pub fn allocate(&mut self) -> ObjectId {
        self.ids.allocate()
    }
    /// Insert a newly created object on top of everything else. Forecloses any redo.
    pub fn insert(&mut self, object: SceneObject) {
        if !self.undone.is_empty() {
            log::debug!("dropping {} redo entries", self.undone.len());
            self.undone.clear();
        }
        debug_assert!(
            self.live
                .last_key_value()
                .map_or(true, |(top, _)| *top < object.id),
            "inserted object is not on top"
        );
        self.live.insert(object.id, object);
    }
    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.live.get(&id)
    }
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.live.get_mut(&id)
    }
    /// Look up an object that has been undone.
    #[must_use]
    pub fn get_undone(&self, id: ObjectId) -> Option<&SceneObject> {
        self.undone.get(&id)
    }
    #[must_use]
    pub fn is_live(&self, id: ObjectId) -> bool {
        self.live.contains_key(&id)
    }
    /// Live objects, back to front.
    pub fn live(&self) -> impl DoubleEndedIterator<Item = &SceneObject> + '_ {
        self.live.values()
    }
    /// Live IDs, back to front.
    pub fn live_ids(&self) -> impl DoubleEndedIterator<Item = ObjectId> + '_ {
        self.live.keys().copied()
    }
    /// Undone IDs, in ascending order.
    pub fn undone_ids(&self) -> impl DoubleEndedIterator<Item = ObjectId> + '_ {
        self.undone.keys().copied()
    }
    /// Number of live objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
    /// The `count` top-most live IDs, ascending. Clamped to the number of live objects.
    #[must_use]
    pub fn topmost(&self, count: usize) -> Vec<ObjectId> {
        let mut ids: Vec<_> = self.live.keys().rev().take(count).copied().collect();
        ids.reverse();
        ids
    }
    /// The `count` most recently undone IDs, ascending. Clamped to the number of undone objects.
    ///
    /// Undo always takes from the top, so the most recently undone objects have the *lowest* undone IDs,
    /// and every undone ID is above every live one. Restoring these keeps it that way.
    #[must_use]
    pub fn next_redo(&self, count: usize) -> Vec<ObjectId> {
        self.undone.keys().take(count).copied().collect()
    }
    /// Move live objects to the undone set. Unknown IDs are skipped.
    pub fn retire(&mut self, ids: &[ObjectId]) -> Vec<&SceneObject> {
        for id in ids {
            if let Some(object) = self.live.remove(id) {
                self.undone.insert(*id, object);
            }
        }
        ids.iter().filter_map(|id| self.undone.get(id)).collect()
    }
    /// Move undone objects back into the live set. Unknown IDs are skipped.
    pub fn restore(&mut self, ids: &[ObjectId]) -> Vec<&SceneObject> {
        for id in ids {
            if let Some(object) = self.undone.remove(id) {
                self.live.insert(*id, object);
            }
        }
        ids.iter().filter_map(|id| self.live.get(id)).collect()
    }
    /// Drop every object, live and undone. IDs keep counting up from where they were.
    pub fn clear(&mut self) -> (Vec<SceneObject>, Vec<SceneObject>) {
        (
            std::mem::take(&mut self.live).into_values().collect(),
            std::mem::take(&mut self.undone).into_values().collect(),
        )
    }
    /// `(id, dirty rect)` of every live object, back to front.
    pub fn dirty_rects(&self) -> impl Iterator<Item = (ObjectId, Rect)> + '_ {
        self.live.values().map(|object| (object.id, object.dirty_rect()))
    }
    /// Is any live object painted above `id` touching `region`?
    #[must_use]
    pub fn is_covered(&self, id: ObjectId, region: Rect) -> bool {
        use std::ops::Bound;
        self.live
            .range((Bound::Excluded(id), Bound::Unbounded))
            .any(|(_, above)| above.dirty_rect().intersects(&region))
    }
}
