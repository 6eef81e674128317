//! # IDs
//! Every object placed on a surface is identified by an [`ObjectId`], handed out by an [`IdAllocator`]
//! owned by that surface. IDs are strictly increasing in creation order and never reused, so the numeric
//! order of IDs *is* the paint order: a larger ID is always drawn over a smaller one.
//!
//! A [`Handle<K>`] is the same ID, namespaced by the kind of object it was created as. Kind-specific
//! edits are only reachable through a handle of the right kind.

use crate::state::object::Kind;

/// Identity and paint-order key of an object on one surface.
/// IDs from different surfaces may share a value but should not be compared.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(std::num::NonZeroU64);

impl ObjectId {
    /// Get the raw numeric value of this ID.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0.get()
    }
}
impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
impl std::fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

/// Per-surface ID counter. The first ID allocated is `1`.
#[derive(Debug)]
pub struct IdAllocator {
    next: std::num::NonZeroU64,
}
impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            next: std::num::NonZeroU64::MIN,
        }
    }
}
impl IdAllocator {
    /// Allocate the next ID. Always larger than every ID allocated before it.
    pub fn allocate(&mut self) -> ObjectId {
        let id = ObjectId(self.next);
        // Saturates, but only after u64::MAX allocations.
        self.next = self.next.checked_add(1).unwrap_or(std::num::NonZeroU64::MAX);
        id
    }
    /// The value the next call to [`Self::allocate`] will return.
    #[must_use]
    pub fn peek(&self) -> u64 {
        self.next.get()
    }
}

/// An [`ObjectId`] known to refer to an object of kind `K`.
pub struct Handle<K> {
    id: ObjectId,
    // `fn() -> K` so the handle is Send + Sync regardless of K.
    _kind: std::marker::PhantomData<fn() -> K>,
}
impl<K> Handle<K> {
    pub(crate) fn new(id: ObjectId) -> Self {
        Self {
            id,
            _kind: std::marker::PhantomData,
        }
    }
    #[must_use]
    pub fn id(self) -> ObjectId {
        self.id
    }
}
impl<K> Clone for Handle<K> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<K> Copy for Handle<K> {}
impl<K> PartialEq for Handle<K> {
    fn eq(&self, other: &Self) -> bool {
        // Kind already checked at compile time.
        self.id == other.id
    }
}
impl<K> Eq for Handle<K> {}
impl<K> std::hash::Hash for Handle<K> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
impl<K> From<Handle<K>> for ObjectId {
    fn from(value: Handle<K>) -> Self {
        value.id
    }
}
impl<K: Kind> std::fmt::Display for Handle<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // rsplit always yields at least one element.
        let name = std::any::type_name::<K>()
            .rsplit("::")
            .next()
            .unwrap_or_default();
        write!(f, "{name}{}", self.id)
    }
}
impl<K: Kind> std::fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Display>::fmt(self, f)
    }
}
