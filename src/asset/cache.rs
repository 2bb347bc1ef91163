use std::collections::HashMap;

use slotmap::{DefaultKey, SlotMap};

use super::Handle;

/// Typed storage addressed by generational handles, with an optional name index.
pub struct AssetCache<T> {
    items: SlotMap<DefaultKey, T>,
    names: HashMap<String, Handle<T>>,
}

impl<T> AssetCache<T> {
    pub fn new() -> Self {
        Self {
            items: SlotMap::new(),
            names: HashMap::new(),
        }
    }

    pub fn insert(&mut self, item: T) -> Handle<T> {
        Handle::new(self.items.insert(item))
    }

    /// Inserts `item` under `name`. An item previously registered under the same
    /// name is removed and handed back so the caller can release it.
    pub fn insert_named(&mut self, name: impl Into<String>, item: T) -> (Handle<T>, Option<T>) {
        let handle = self.insert(item);
        let replaced = self
            .names
            .insert(name.into(), handle)
            .and_then(|old| self.items.remove(old.key()));
        (handle, replaced)
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.items.get(handle.key())
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.items.get_mut(handle.key())
    }

    pub fn handle_by_name(&self, name: &str) -> Option<Handle<T>> {
        self.names
            .get(name)
            .copied()
            .filter(|handle| self.items.contains_key(handle.key()))
    }

    pub fn get_by_name(&self, name: &str) -> Option<&T> {
        self.handle_by_name(name).and_then(|handle| self.get(handle))
    }

    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.items.contains_key(handle.key())
    }

    pub fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        let item = self.items.remove(handle.key())?;
        self.names.retain(|_, named| *named != handle);
        Some(item)
    }

    /// Empties the cache, yielding every stored item.
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.names.clear();
        self.items.drain().map(|(_, item)| item)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.items.iter().map(|(key, item)| (Handle::new(key), item))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for AssetCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut cache = AssetCache::new();
        let handle = cache.insert(42);
        assert_eq!(cache.get(handle), Some(&42));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn stale_handle_resolves_to_none() {
        let mut cache = AssetCache::new();
        let handle = cache.insert("road");
        assert_eq!(cache.remove(handle), Some("road"));
        let reused = cache.insert("grass");
        assert!(cache.get(handle).is_none());
        assert_eq!(cache.get(reused), Some(&"grass"));
    }

    #[test]
    fn names_resolve_and_replace() {
        let mut cache = AssetCache::new();
        let (first, replaced) = cache.insert_named("car", 1);
        assert!(replaced.is_none());
        let (second, replaced) = cache.insert_named("car", 2);
        assert_eq!(replaced, Some(1));
        assert!(cache.get(first).is_none());
        assert_eq!(cache.handle_by_name("car"), Some(second));
        assert_eq!(cache.get_by_name("car"), Some(&2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn remove_drops_name() {
        let mut cache = AssetCache::new();
        let (handle, _) = cache.insert_named("sky", 7);
        cache.remove(handle);
        assert!(cache.get_by_name("sky").is_none());
    }

    #[test]
    fn drain_empties_everything() {
        let mut cache = AssetCache::new();
        cache.insert_named("a", 1);
        cache.insert(2);
        let mut drained: Vec<_> = cache.drain().collect();
        drained.sort();
        assert_eq!(drained, vec![1, 2]);
        assert!(cache.is_empty());
        assert!(cache.handle_by_name("a").is_none());
    }
}
