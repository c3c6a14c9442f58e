//! Types for the aggregated discovery document (apidiscovery v2beta1)
//!
//! Servers that support aggregated discovery answer a single request on
//! `/apis` with the full resource catalog, selected via content negotiation.
use crate::metadata::{ListMeta, ObjectMeta};
use serde::{Deserialize, Serialize};

/// Content negotiation Accept header requesting the aggregated document
///
/// Plain `application/json` is listed last so servers without aggregated
/// discovery fall back to the legacy group list response.
pub const ACCEPT_AGGREGATED_DISCOVERY: &str =
    "application/json;g=apidiscovery.k8s.io;v=v2beta1;as=APIGroupDiscoveryList,application/json";

/// Whether a response Content-Type indicates an aggregated discovery document
///
/// The parameters may appear in any order, so the header is parsed rather
/// than compared against a fixed string.
pub fn is_aggregated_media_type(content_type: &str) -> bool {
    let mut parts = content_type.split(';').map(str::trim);
    if parts.next() != Some("application/json") {
        return false;
    }
    let (mut group, mut version, mut kind) = (None, None, None);
    for param in parts {
        match param.split_once('=') {
            Some(("g", v)) => group = Some(v),
            Some(("v", v)) => version = Some(v),
            Some(("as", v)) => kind = Some(v),
            _ => {}
        }
    }
    group == Some("apidiscovery.k8s.io")
        && version == Some("v2beta1")
        && kind == Some("APIGroupDiscoveryList")
}

/// The aggregated discovery document returned from `/apis`
///
/// Contains every group the server serves, with their versions and resources
/// inlined, removing the need for per-group-version round trips.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct APIGroupDiscoveryList {
    /// Standard list metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ListMeta>,

    /// The list of groups for discovery, in priority order
    #[serde(default)]
    pub items: Vec<APIGroupDiscovery>,
}

/// Discovery information for all versions of one API group
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct APIGroupDiscovery {
    /// Standard object metadata, only the name is populated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMeta>,

    /// The versions supported in this group, preferred version first
    #[serde(default)]
    pub versions: Vec<APIVersionDiscovery>,
}

/// The resources served for one version within an API group
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct APIVersionDiscovery {
    /// The name of the version within the group
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,

    /// The resources served under this group version
    #[serde(default)]
    pub resources: Vec<APIResourceDiscovery>,

    /// Whether this entry was recently refreshed (`Current`) or may be out of
    /// date (`Stale`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freshness: Option<String>,
}

/// Discovery information about one API resource
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct APIResourceDiscovery {
    /// The plural name of the resource, used in the url path
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource: String,

    /// The group, version, and kind this endpoint returns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_kind: Option<DiscoveryGroupVersionKind>,

    /// The scope of the resource, `"Cluster"` or `"Namespaced"`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scope: String,

    /// The singular name of the resource
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub singular_resource: String,

    /// Supported operation types (get, list, watch, create, update, delete, ...)
    #[serde(default)]
    pub verbs: Vec<String>,

    /// Suggested short names of the resource
    #[serde(default)]
    pub short_names: Vec<String>,

    /// Grouped-resource categories this resource belongs to (e.g. `all`)
    #[serde(default)]
    pub categories: Vec<String>,

    /// Subresources provided by this resource
    #[serde(default)]
    pub subresources: Vec<APISubresourceDiscovery>,
}

/// Discovery information about one API subresource
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct APISubresourceDiscovery {
    /// The name of the subresource, used in the url path
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subresource: String,

    /// The group, version, and kind this endpoint returns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_kind: Option<DiscoveryGroupVersionKind>,

    /// Supported operation types
    #[serde(default)]
    pub verbs: Vec<String>,
}

/// The kind identity embedded in discovery documents
///
/// Some servers send an all-empty value here instead of omitting the field;
/// consumers treat the two forms the same.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryGroupVersionKind {
    /// The group of the kind
    #[serde(default)]
    pub group: String,
    /// The version of the kind
    #[serde(default)]
    pub version: String,
    /// The name of the kind
    #[serde(default)]
    pub kind: String,
}
