//! Typed read-only views over informer caches.
use helio_core::{gvk::GroupResource, labels::Selector, Meta};
use thiserror::Error;

use crate::store::Store;

/// A cache miss, tagged with the resource it occurred for
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{resource} \"{name}\" not found")]
pub struct NotFound {
    /// The resource the lookup ran against
    pub resource: GroupResource,
    /// The name that was looked up
    pub name: String,
}

/// A read-only view over one informer's store
///
/// Reads never touch the network and return deep copies, so callers can
/// mutate results freely without corrupting the shared cache. Staleness is
/// bounded by the informer's sync loop.
pub struct Lister<K> {
    store: Store<K>,
    resource: GroupResource,
}

impl<K> Clone for Lister<K> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            resource: self.resource.clone(),
        }
    }
}

impl<K: Meta + Clone> Lister<K> {
    /// Construct a lister over a store
    pub fn new(store: Store<K>, resource: GroupResource) -> Self {
        Self { store, resource }
    }

    /// List cached objects matching a label selector
    ///
    /// `ns` restricts the result to one namespace; `None` spans all of them
    /// (and is the only sensible value for cluster-scoped kinds).
    pub fn list(&self, ns: Option<&str>, selector: &Selector) -> Vec<K> {
        let prefix = ns.map(|ns| format!("{ns}/"));
        self.store
            .entries()
            .into_iter()
            .filter(|(key, _)| match &prefix {
                Some(prefix) => key.starts_with(prefix.as_str()),
                None => true,
            })
            .map(|(_, obj)| obj)
            .filter(|obj| selector.matches(obj.labels()))
            .collect()
    }

    /// Get one cached object by namespace and name
    pub fn get(&self, ns: Option<&str>, name: &str) -> Result<K, NotFound> {
        let key = format!("{}/{}", ns.unwrap_or(""), name);
        self.store.get(&key).ok_or_else(|| NotFound {
            resource: self.resource.clone(),
            name: name.to_string(),
        })
    }
}
