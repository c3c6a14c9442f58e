use crate::metadata::ObjectMeta;
use std::collections::BTreeMap;

/// The minimal object-metadata capability required by the generic client
///
/// Every object passed through the generic backend or stored by the runtime
/// caches must expose its name, namespace and labels through this trait.
/// Kinds that cannot are rejected at compile time rather than with a network
/// round trip.
pub trait Meta {
    /// Borrow the object's metadata
    fn meta(&self) -> &ObjectMeta;

    /// Borrow the object's metadata mutably
    fn meta_mut(&mut self) -> &mut ObjectMeta;

    /// The object's name, if set
    fn name(&self) -> Option<&str> {
        self.meta().name.as_deref()
    }

    /// The object's namespace, absent for cluster-scoped kinds
    fn namespace(&self) -> Option<&str> {
        self.meta().namespace.as_deref()
    }

    /// The object's labels
    fn labels(&self) -> &BTreeMap<String, String> {
        &self.meta().labels
    }

    /// The object's resource version, if it has been persisted
    fn resource_version(&self) -> Option<&str> {
        self.meta().resource_version.as_deref()
    }
}
