//! Contains types for using resource kinds not known at compile-time.
pub use crate::discovery::ApiResource;
use crate::{
    metadata::{ObjectMeta, TypeMeta},
    resource::Meta,
};

use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to parse this DynamicObject into the requested kind: {source}")]
/// Failed to parse a `DynamicObject` into a typed kind
pub struct ParseDynamicObjectError {
    #[from]
    source: serde_json::Error,
}

/// A dynamic representation of an api object
///
/// This will work with any non-list type object.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct DynamicObject {
    /// The type fields, not always present
    #[serde(flatten, default)]
    pub types: Option<TypeMeta>,
    /// Object metadata
    #[serde(default)]
    pub metadata: ObjectMeta,

    /// All other keys
    #[serde(flatten)]
    pub data: serde_json::Value,
}

impl DynamicObject {
    /// Create a DynamicObject with minimal values set from ApiResource.
    #[must_use]
    pub fn new(name: &str, resource: &ApiResource) -> Self {
        Self {
            types: Some(TypeMeta {
                api_version: resource.api_version(),
                kind: resource.kind.clone(),
            }),
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            data: Default::default(),
        }
    }

    /// Attach dynamic data to a DynamicObject
    #[must_use]
    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    /// Attach a namespace to a DynamicObject
    #[must_use]
    pub fn within(mut self, ns: &str) -> Self {
        self.metadata.namespace = Some(ns.into());
        self
    }

    /// Attempt to convert this `DynamicObject` into a typed kind
    pub fn try_parse<K: for<'a> serde::Deserialize<'a>>(self) -> Result<K, ParseDynamicObjectError> {
        Ok(serde_json::from_value(serde_json::to_value(self)?)?)
    }
}

impl Meta for DynamicObject {
    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}
