//! Types for the watch stream protocol.
use crate::{error::ErrorResponse, metadata::TypeMeta};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A single event on a watch stream
///
/// Events are newline-delimited JSON objects with a `type` discriminator and
/// the affected object under `object`.
#[derive(Deserialize, Serialize, Clone)]
#[serde(tag = "type", content = "object", rename_all = "UPPERCASE")]
pub enum WatchEvent<K> {
    /// An object was added
    Added(K),
    /// An object was modified
    Modified(K),
    /// An object was deleted
    Deleted(K),
    /// The watch progressed without object changes
    ///
    /// Carries only a fresh `resourceVersion`, letting restarted watches skip
    /// replaying events that happened while they were connected.
    Bookmark(Bookmark),
    /// The server signalled a problem mid-stream
    Error(ErrorResponse),
}

impl<K> Debug for WatchEvent<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            WatchEvent::Added(_) => write!(f, "Added event"),
            WatchEvent::Modified(_) => write!(f, "Modified event"),
            WatchEvent::Deleted(_) => write!(f, "Deleted event"),
            WatchEvent::Bookmark(_) => write!(f, "Bookmark event"),
            WatchEvent::Error(e) => write!(f, "Error event: {e:?}"),
        }
    }
}

/// Slimmed down object returned in bookmark events
///
/// Only the `resourceVersion` is ever inspected, so the rest of the object's
/// metadata is not deserialized.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Bookmark {
    /// The type fields of the watched kind
    #[serde(flatten)]
    pub types: TypeMeta,

    /// Metadata containing the fresh resource version
    pub metadata: BookmarkMeta,
}

/// Slimmed down metadata for bookmark objects
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkMeta {
    /// The resource version the watch has progressed to
    pub resource_version: String,
}
