//! # Damage
//! When an object changes, the pixels it covered and the pixels it will cover are stale. Clearing them
//! also erases parts of any object overlapping them, which must then be redrawn, which in turn may
//! overlap more objects, and so on. [`resolve`] follows that chain to its end.

use hashbrown::HashSet;

use crate::geom::Rect;
use crate::id::ObjectId;

/// A set of objects to clear and redraw, back to front.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Damage {
    /// `(id, dirty rect)`, ascending by id.
    entries: Vec<(ObjectId, Rect)>,
}
impl Damage {
    /// IDs to redraw, in paint order.
    pub fn ids(&self) -> impl ExactSizeIterator<Item = ObjectId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }
    /// Regions to clear before redrawing.
    pub fn rects(&self) -> impl ExactSizeIterator<Item = Rect> + '_ {
        self.entries.iter().map(|(_, rect)| *rect)
    }
    #[must_use]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.entries
            .binary_search_by_key(&id, |(id, _)| *id)
            .is_ok()
    }
    /// `(id, dirty rect)` pairs, in paint order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (ObjectId, Rect)> + '_ {
        self.entries.iter().copied()
    }
    /// Dirty rect recorded for `id`, if it's in the set.
    #[must_use]
    pub fn rect_of(&self, id: ObjectId) -> Option<Rect> {
        self.entries
            .binary_search_by_key(&id, |(id, _)| *id)
            .ok()
            .map(|idx| self.entries[idx].1)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    /// Union of every dirty rect.
    #[must_use]
    pub fn union_rect(&self) -> Option<Rect> {
        let mut rects = self.rects();
        let mut union = rects.next()?;
        for rect in rects {
            union.include_rect(rect);
        }
        Some(union)
    }
    /// Merge another damage set into this one, keeping the larger rect for shared ids.
    pub fn merge(&mut self, other: Self) {
        for (id, rect) in other.entries {
            match self.entries.binary_search_by_key(&id, |(id, _)| *id) {
                Ok(idx) => self.entries[idx].1.include_rect(rect),
                Err(idx) => self.entries.insert(idx, (id, rect)),
            }
        }
    }
}

/// Find every object that must be redrawn when `seeds` change.
///
/// `objects` is every live object with its dirty rect. Seeds not among them are ignored.
/// The result contains every seed, and every object whose dirty rect touches the dirty rect of
/// an object in the result.
pub fn resolve(
    seeds: impl IntoIterator<Item = ObjectId>,
    objects: impl IntoIterator<Item = (ObjectId, Rect)>,
) -> Damage {
    let seeds: HashSet<ObjectId> = seeds.into_iter().collect();
    let (mut found, mut candidates): (Vec<_>, Vec<_>) = objects
        .into_iter()
        .partition(|(id, _)| seeds.contains(id));

    // `found` doubles as the work queue. Everything before `probe` has been tested against every candidate.
    let mut probe = 0;
    while let Some(&(_, rect)) = found.get(probe) {
        let mut idx = 0;
        while idx < candidates.len() {
            if rect.intersects(&candidates[idx].1) {
                found.push(candidates.swap_remove(idx));
            } else {
                idx += 1;
            }
        }
        probe += 1;
    }

    found.sort_unstable_by_key(|(id, _)| *id);
    log::trace!(
        "damage: {} seeds cascaded to {} objects",
        seeds.len(),
        found.len()
    );
    Damage { entries: found }
}

#[cfg(test)]
mod test {
    use super::resolve;
    use crate::geom::Rect;
    use crate::id::{IdAllocator, ObjectId};

    fn ids(count: usize) -> Vec<ObjectId> {
        let mut alloc = IdAllocator::default();
        (0..count).map(|_| alloc.allocate()).collect()
    }

    #[test]
    fn chain_propagates() {
        let id = ids(4);
        // a touches b touches c. d is far away.
        let objects = [
            (id[0], Rect::new(0, 0, 10, 10)),
            (id[1], Rect::new(10, 0, 10, 10)),
            (id[2], Rect::new(20, 0, 10, 10)),
            (id[3], Rect::new(100, 100, 10, 10)),
        ];
        let damage = resolve([id[0]], objects);
        assert_eq!(damage.ids().collect::<Vec<_>>(), &id[..3]);
        assert!(!damage.contains(id[3]));
        assert_eq!(damage.union_rect(), Some(Rect::new(0, 0, 30, 10)));
    }
    #[test]
    fn numeric_order() {
        // Discovered out of order, with ids that sort differently as strings.
        let id = ids(12);
        let objects = [
            (id[1], Rect::new(0, 0, 10, 10)),
            (id[11], Rect::new(5, 5, 10, 10)),
            (id[9], Rect::new(12, 12, 10, 10)),
        ];
        let damage = resolve([id[11]], objects);
        assert_eq!(
            damage.ids().map(ObjectId::get).collect::<Vec<_>>(),
            vec![2, 10, 12]
        );
    }
    #[test]
    fn stale_seeds_ignored() {
        let id = ids(2);
        let damage = resolve([id[1]], [(id[0], Rect::new(0, 0, 1, 1))]);
        assert!(damage.is_empty());
        assert_eq!(damage.union_rect(), None);
    }
    #[test]
    fn closure_property() {
        // Deterministic scatter of rects.
        let id = ids(64);
        let mut state = 0x2545_f491_u32;
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state % 200) as i32
        };
        let objects: Vec<_> = id
            .iter()
            .map(|&id| (id, Rect::new(next(), next(), next() % 30, next() % 30)))
            .collect();
        let seeds = [id[3], id[40]];
        let damage = resolve(seeds, objects.iter().copied());

        for seed in seeds {
            assert!(damage.contains(seed));
        }
        // Nothing outside the set touches anything inside it.
        for (outside, outside_rect) in objects.iter().filter(|(id, _)| !damage.contains(*id)) {
            for inside in damage.rects() {
                assert!(
                    !inside.intersects(outside_rect),
                    "{outside} should have been included"
                );
            }
        }
        assert!(damage.ids().collect::<Vec<_>>().windows(2).all(|w| w[0] < w[1]));
    }
    #[test]
    fn merge_keeps_order() {
        let id = ids(3);
        let mut a = resolve([id[2]], [(id[2], Rect::new(0, 0, 1, 1))]);
        let b = resolve(
            [id[0], id[2]],
            [(id[0], Rect::new(50, 50, 1, 1)), (id[2], Rect::new(0, 0, 4, 4))],
        );
        a.merge(b);
        assert_eq!(a.ids().collect::<Vec<_>>(), vec![id[0], id[2]]);
        assert_eq!(a.rects().last(), Some(Rect::new(0, 0, 4, 4)));
    }
}
