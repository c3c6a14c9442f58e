//! Metadata structs shared by all API objects
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Type information attached to an object on the wire
#[derive(Deserialize, Serialize, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct TypeMeta {
    /// The version of the API these objects belong to
    pub api_version: String,
    /// The name of the kind these objects belong to
    pub kind: String,
}

impl TypeMeta {
    /// Construct a `TypeMeta` from an apiVersion string and a kind name
    pub fn new(api_version: &str, kind: &str) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
        }
    }
}

/// Standard object metadata
///
/// The minimal capability set every object handled by the generic client must
/// expose: a name, an optional namespace, and labels.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// The unique name of this object within its scope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The namespace partitioning this object, absent for cluster-scoped kinds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Map of string keys and values usable by selectors
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Unstructured key value map for arbitrary external metadata
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    /// An opaque version identifier set by the server on every write
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,

    /// Server-generated unique identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

/// Metadata attached to list envelopes
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    /// The version of the collection at the time of the list call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,

    /// Continuation token for chunked list calls
    #[serde(default, rename = "continue", skip_serializing_if = "Option::is_none")]
    pub continue_token: Option<String>,
}
