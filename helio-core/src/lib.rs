//! Crate with the types and traits necessary for interacting with a helio
//! control-plane API.
//!
//! This crate is available as a minimal alternative to `helio` where a client
//! is not required. The same information is always re-exported from `helio`
//! under `helio::core`.
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod discovery;

pub mod dynamic;
pub use dynamic::DynamicObject;

pub mod gvk;
pub use gvk::{GroupResource, GroupVersion, GroupVersionKind, GroupVersionResource};

pub mod labels;
pub use labels::Selector;

pub mod metadata;
pub use metadata::{ListMeta, ObjectMeta, TypeMeta};

pub mod object;
pub use object::ObjectList;

pub mod params;

pub mod request;
pub use request::Request;

mod resource;
pub use resource::Meta;

pub mod response;
pub use response::Status;

pub mod watch;
pub use watch::WatchEvent;

mod error;
pub use error::ErrorResponse;
