//! Type information structs for addressing resources on a server.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to parse group version: {0}")]
/// Failed to parse a group version string.
pub struct ParseGroupVersionError(pub String);

/// Core information about a family of API resources
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupVersion {
    /// API group, empty for the legacy core group
    pub group: String,
    /// Version
    pub version: String,
}

impl GroupVersion {
    /// Construct from explicit group and version
    pub fn gv(group_: &str, version_: &str) -> Self {
        let group = group_.to_string();
        let version = version_.to_string();
        Self { group, version }
    }

    /// Generate the apiVersion string used in an object's type metadata
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl FromStr for GroupVersion {
    type Err = ParseGroupVersionError;

    fn from_str(gv: &str) -> Result<Self, Self::Err> {
        let gvsplit = gv.splitn(2, '/').collect::<Vec<_>>();
        let (group, version) = match *gvsplit.as_slice() {
            [g, v] => (g.to_string(), v.to_string()), // standard case
            [v] => ("".to_string(), v.to_string()),   // core group case
            _ => return Err(ParseGroupVersionError(gv.into())),
        };
        Ok(Self { group, version })
    }
}

/// Core information about a kind within a group version
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersionKind {
    /// API group
    pub group: String,
    /// Version
    pub version: String,
    /// Kind
    pub kind: String,
}

impl GroupVersionKind {
    /// Construct from explicit group, version, and kind
    pub fn gvk(group_: &str, version_: &str, kind_: &str) -> Self {
        let group = group_.to_string();
        let version = version_.to_string();
        let kind = kind_.to_string();
        Self { group, version, kind }
    }

    /// Generate the apiVersion string used in a kind's type metadata
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

/// The three-part identity addressing a resource collection on a server
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersionResource {
    /// API group
    pub group: String,
    /// Version
    pub version: String,
    /// Plural resource name
    pub resource: String,
}

impl GroupVersionResource {
    /// Set the api group, version, and the plural resource name
    pub fn gvr(group_: &str, version_: &str, resource_: &str) -> Self {
        let group = group_.to_string();
        let version = version_.to_string();
        let resource = resource_.to_string();
        Self {
            group,
            version,
            resource,
        }
    }
}

/// A version-independent resource identity, used to tag errors
///
/// Displays as `resource.group`, or just `resource` for the core group, the
/// same format servers use in their own error messages.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupResource {
    /// API group
    pub group: String,
    /// Plural resource name
    pub resource: String,
}

impl GroupResource {
    /// Construct from explicit group and plural resource name
    pub fn gr(group_: &str, resource_: &str) -> Self {
        let group = group_.to_string();
        let resource = resource_.to_string();
        Self { group, resource }
    }
}

impl fmt::Display for GroupResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.resource)
        } else {
            write!(f, "{}.{}", self.resource, self.group)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gv_from_str() {
        let gv: GroupVersion = "fleet.example.dev/v1alpha1".parse().unwrap();
        assert_eq!(gv, GroupVersion::gv("fleet.example.dev", "v1alpha1"));
        assert_eq!(gv.api_version(), "fleet.example.dev/v1alpha1");

        let core: GroupVersion = "v1".parse().unwrap();
        assert_eq!(core, GroupVersion::gv("", "v1"));
        assert_eq!(core.api_version(), "v1");
    }

    #[test]
    fn group_resource_display() {
        assert_eq!(GroupResource::gr("fleet.example.dev", "widgets").to_string(), "widgets.fleet.example.dev");
        assert_eq!(GroupResource::gr("", "widgets").to_string(), "widgets");
    }
}
