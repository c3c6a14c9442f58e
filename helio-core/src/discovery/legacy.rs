//! Types for the legacy two-phase discovery protocol
//!
//! Older servers answer `/apis` with a bare group list, and require a
//! follow-up request per group version to learn the resources it serves.
use serde::{Deserialize, Serialize};

/// The group list returned from `/apis` by servers without aggregated discovery
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct APIGroupList {
    /// The api groups the server serves
    #[serde(default)]
    pub groups: Vec<APIGroup>,
}

/// One api group in a legacy group list
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct APIGroup {
    /// The name of the group
    #[serde(default)]
    pub name: String,

    /// The versions supported in this group
    #[serde(default)]
    pub versions: Vec<GroupVersionForDiscovery>,

    /// The version preferred by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_version: Option<GroupVersionForDiscovery>,
}

/// A version of an api group as listed in legacy discovery
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupVersionForDiscovery {
    /// The group and version in `group/version` form
    #[serde(default)]
    pub group_version: String,

    /// The version alone
    #[serde(default)]
    pub version: String,
}

/// The per-group-version resource list returned from `/apis/{group}/{version}`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct APIResourceList {
    /// The group and version this list describes
    #[serde(default)]
    pub group_version: String,

    /// The resources served under this group version
    #[serde(default)]
    pub resources: Vec<APIResourceDescriptor>,
}

/// One resource entry in a legacy resource list
///
/// Subresources appear as separate entries named `parent/subresource`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct APIResourceDescriptor {
    /// The plural name of the resource
    #[serde(default)]
    pub name: String,

    /// The singular name of the resource
    #[serde(default)]
    pub singular_name: String,

    /// Whether objects of this resource live in namespaces
    #[serde(default)]
    pub namespaced: bool,

    /// The group of the returned kind, when it differs from the list's group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// The version of the returned kind, when it differs from the list's version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// The name of the returned kind
    #[serde(default)]
    pub kind: String,

    /// Supported operation types
    #[serde(default)]
    pub verbs: Vec<String>,

    /// Suggested short names of the resource
    #[serde(default)]
    pub short_names: Vec<String>,

    /// Grouped-resource categories this resource belongs to
    #[serde(default)]
    pub categories: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_group_list() {
        let groups: APIGroupList = serde_json::from_value(serde_json::json!({
            "kind": "APIGroupList",
            "apiVersion": "v1",
            "groups": [{
                "name": "fleet.example.dev",
                "versions": [
                    { "groupVersion": "fleet.example.dev/v1", "version": "v1" },
                    { "groupVersion": "fleet.example.dev/v1alpha1", "version": "v1alpha1" }
                ],
                "preferredVersion": { "groupVersion": "fleet.example.dev/v1", "version": "v1" }
            }]
        }))
        .unwrap();
        let group = &groups.groups[0];
        assert_eq!(group.name, "fleet.example.dev");
        assert_eq!(group.versions.len(), 2);
        assert_eq!(
            group.preferred_version.as_ref().unwrap().group_version,
            "fleet.example.dev/v1"
        );
    }

    #[test]
    fn deserialize_resource_list() {
        let list: APIResourceList = serde_json::from_value(serde_json::json!({
            "kind": "APIResourceList",
            "groupVersion": "fleet.example.dev/v1",
            "resources": [
                {
                    "name": "widgets",
                    "singularName": "widget",
                    "namespaced": true,
                    "kind": "Widget",
                    "verbs": ["get", "list", "watch"],
                    "shortNames": ["wd"]
                },
                {
                    "name": "widgets/status",
                    "singularName": "",
                    "namespaced": true,
                    "kind": "Widget",
                    "verbs": ["get", "update"]
                }
            ]
        }))
        .unwrap();
        assert_eq!(list.group_version, "fleet.example.dev/v1");
        assert_eq!(list.resources[0].name, "widgets");
        assert_eq!(list.resources[1].name, "widgets/status");
    }
}
