//! In-memory object caches fed by the sync loop.
use crate::sync::Event;
use helio_core::{discovery::Scope, metadata::ObjectMeta, Meta};

use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Compute the cache key of an object
///
/// Namespaced kinds key as `"<namespace>/<name>"`, cluster-scoped kinds as
/// `"/<name>"`. The leading separator keeps the two forms from colliding.
pub fn object_key(scope: &Scope, meta: &ObjectMeta) -> String {
    let name = meta.name.as_deref().unwrap_or("");
    match scope {
        Scope::Namespaced => {
            format!("{}/{}", meta.namespace.as_deref().unwrap_or(""), name)
        }
        Scope::Cluster => format!("/{name}"),
    }
}

/// A writable store handle
///
/// This is exclusive since it's not safe to share a single `Writer` between
/// multiple sync loops. In particular, `Restarted` events will clobber the
/// state written by other loops.
#[derive(Debug)]
pub struct Writer<K> {
    store: Arc<RwLock<AHashMap<String, K>>>,
    scope: Scope,
}

impl<K: Meta + Clone> Writer<K> {
    /// Construct a writer for objects of a given scope
    pub fn new(scope: Scope) -> Self {
        Self {
            store: Default::default(),
            scope,
        }
    }

    /// Return a read handle to the store
    ///
    /// Multiple read handles may be obtained, by either calling `as_reader`
    /// multiple times, or by calling `Store::clone()` afterwards.
    #[must_use]
    pub fn as_reader(&self) -> Store<K> {
        Store {
            store: self.store.clone(),
        }
    }

    /// Applies a single sync event to the store
    pub fn apply_event(&mut self, event: &Event<K>) {
        match event {
            Event::Applied(obj) => {
                let key = object_key(&self.scope, obj.meta());
                self.store.write().insert(key, obj.clone());
            }
            Event::Deleted(obj) => {
                let key = object_key(&self.scope, obj.meta());
                self.store.write().remove(&key);
            }
            Event::Restarted(new_objs) => {
                // swap in the full replacement under a single write lock
                let new_objs = new_objs
                    .iter()
                    .map(|obj| (object_key(&self.scope, obj.meta()), obj.clone()))
                    .collect::<AHashMap<_, _>>();
                *self.store.write() = new_objs;
            }
        }
    }
}

/// A readable cache of objects of kind `K`
///
/// Cloning will produce a new reference to the same backing store.
///
/// Cannot be constructed directly since one writer handle is required,
/// use `Writer::as_reader()` instead.
#[derive(Debug)]
pub struct Store<K> {
    store: Arc<RwLock<AHashMap<String, K>>>,
}

impl<K> Clone for Store<K> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<K: Clone> Store<K> {
    /// Retrieve a `clone()` of the entry for `key`, if it is in the cache
    ///
    /// Note that this is a cache and may be stale. Deleted objects may still
    /// exist in the cache despite having been deleted on the server, and new
    /// objects may not yet exist in the cache.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<K> {
        self.store.read().get(key).cloned()
    }

    /// Return a full snapshot of the current values
    #[must_use]
    pub fn state(&self) -> Vec<K> {
        self.store.read().values().cloned().collect()
    }

    /// Return a snapshot of the current entries with their keys
    #[must_use]
    pub fn entries(&self) -> Vec<(String, K)> {
        self.store
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// The number of cached objects
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    /// Whether the cache is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{object_key, Writer};
    use crate::sync::Event;
    use helio_core::{discovery::Scope, DynamicObject, Meta};

    fn obj(ns: Option<&str>, name: &str) -> DynamicObject {
        serde_json::from_value(serde_json::json!({
            "apiVersion": "v1",
            "kind": "Gadget",
            "metadata": { "name": name, "namespace": ns }
        }))
        .unwrap()
    }

    #[test]
    fn applied_objects_are_gettable_by_key() {
        let mut writer = Writer::new(Scope::Namespaced);
        writer.apply_event(&Event::Applied(obj(Some("ns"), "a")));
        let store = writer.as_reader();
        assert!(store.get("ns/a").is_some());
        assert!(store.get("a").is_none());
    }

    #[test]
    fn cluster_scoped_keys_have_empty_namespace_prefix() {
        let mut writer = Writer::new(Scope::Cluster);
        writer.apply_event(&Event::Applied(obj(None, "a")));
        let store = writer.as_reader();
        assert!(store.get("/a").is_some());
        assert_eq!(
            object_key(&Scope::Cluster, obj(None, "a").meta()),
            "/a".to_string()
        );
    }

    #[test]
    fn deleted_objects_are_removed() {
        let mut writer = Writer::new(Scope::Namespaced);
        writer.apply_event(&Event::Applied(obj(Some("ns"), "a")));
        writer.apply_event(&Event::Deleted(obj(Some("ns"), "a")));
        assert!(writer.as_reader().is_empty());
    }

    #[test]
    fn restarted_replaces_previous_state() {
        let mut writer = Writer::new(Scope::Namespaced);
        let store = writer.as_reader();
        writer.apply_event(&Event::Applied(obj(Some("ns"), "stale")));
        writer.apply_event(&Event::Restarted(vec![
            obj(Some("ns"), "a"),
            obj(Some("ns"), "b"),
        ]));
        assert!(store.get("ns/stale").is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn reads_are_deep_copies() {
        let mut writer = Writer::new(Scope::Namespaced);
        writer.apply_event(&Event::Applied(obj(Some("ns"), "a")));
        let store = writer.as_reader();
        let mut copy = store.get("ns/a").unwrap();
        copy.metadata.name = Some("mutated".into());
        // the cached object is unaffected by mutations of the copy
        assert_eq!(
            store.get("ns/a").unwrap().metadata.name.as_deref(),
            Some("a")
        );
    }
}
