//! Type information structs for API discovery
use crate::{
    gvk::{GroupResource, GroupVersion, GroupVersionKind, GroupVersionResource},
    request::Request,
};
use serde::{Deserialize, Serialize};

pub mod aggregated;
pub mod legacy;

/// Information about a discovered API resource
///
/// Enough information to address a resource collection on the server and to
/// register its kind with an informer factory.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ApiResource {
    /// Resource group, empty for core group.
    pub group: String,
    /// group version
    pub version: String,
    /// Singular PascalCase name of the kind
    pub kind: String,
    /// Plural name of the resource
    pub plural: String,
    /// Whether objects of this resource live in namespaces
    pub namespaced: bool,
}

impl ApiResource {
    /// Creates an ApiResource from group, version, kind and plural name.
    ///
    /// The resource is assumed namespaced; unset `namespaced` manually for
    /// cluster-scoped kinds.
    pub fn from_gvk_with_plural(gvk: &GroupVersionKind, plural: &str) -> Self {
        ApiResource {
            group: gvk.group.clone(),
            version: gvk.version.clone(),
            kind: gvk.kind.clone(),
            plural: plural.to_string(),
            namespaced: true,
        }
    }

    /// The apiVersion string for the resource (v1 for core group,
    /// group/version for others)
    pub fn api_version(&self) -> String {
        self.group_version().api_version()
    }

    /// The group version of the resource
    pub fn group_version(&self) -> GroupVersion {
        GroupVersion::gv(&self.group, &self.version)
    }

    /// The three-part collection identity of the resource
    pub fn group_version_resource(&self) -> GroupVersionResource {
        GroupVersionResource::gvr(&self.group, &self.version, &self.plural)
    }

    /// The version-independent identity used to tag errors for this resource
    pub fn group_resource(&self) -> GroupResource {
        GroupResource::gr(&self.group, &self.plural)
    }

    /// The url path of this resource's collection, optionally under a namespace
    pub fn url_path(&self, namespace: Option<&str>) -> String {
        Request::resource_path(&self.group_version(), namespace, &self.plural)
    }
}

/// Resource scope
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub enum Scope {
    /// Objects are global
    Cluster,
    /// Each object lives in a namespace
    Namespaced,
}

/// Verb names reported by discovery documents
pub mod verbs {
    /// Create a resource
    pub const CREATE: &str = "create";
    /// Get single resource
    pub const GET: &str = "get";
    /// List objects
    pub const LIST: &str = "list";
    /// Watch for objects changes
    pub const WATCH: &str = "watch";
    /// Delete single object
    pub const DELETE: &str = "delete";
    /// Update an object
    pub const UPDATE: &str = "update";
}
