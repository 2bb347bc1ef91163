use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use slotmap::{DefaultKey, Key};

/// Generational reference into an [`AssetCache`](super::AssetCache).
///
/// A handle outlives the item it points at: once the item is removed, lookups with
/// the old handle return `None` even if the slot is reused.
pub struct Handle<T> {
    key: DefaultKey,
    _marker: PhantomData<fn() -> T>,
}

// Manual impls so that `T` itself needs none of these traits
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:?})", self.key)
    }
}

impl<T> Handle<T> {
    pub(crate) fn new(key: DefaultKey) -> Self {
        Self {
            key,
            _marker: PhantomData,
        }
    }

    /// A handle that never resolves.
    pub fn null() -> Self {
        Self::new(DefaultKey::null())
    }

    pub fn is_null(&self) -> bool {
        self.key.is_null()
    }

    pub(crate) fn key(&self) -> DefaultKey {
        self.key
    }
}
