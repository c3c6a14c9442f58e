//! Facade crate re-exporting the helio client and runtime
//!
//! - [`Client`] wraps a caller-supplied tower `Service` talking to an api
//!   server; [`Backend`] layers generic per-group-version resource calls on
//!   top of it.
//! - [`Discovery`] scans what the server serves, preferring the aggregated
//!   one-shot protocol over the legacy per-group-version fan-out.
//! - [`runtime`] keeps warm caches: a [`SharedInformerFactory`] de-duplicates
//!   informers per kind, and [`Lister`]s give typed read-only access.
//!
//! The underlying crates can be depended on directly when only a subset is
//! needed: `helio-core` alone has no client at all.
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub use helio_client::{Backend, Client, Discovery, Error, Result};

/// Re-exports from `helio-client`
pub mod client {
    pub use helio_client::backend;
    pub use helio_client::client::{Body, Client};
    pub use helio_client::discovery;
    pub use helio_client::error;
}

pub use helio_core as core;
pub use helio_runtime as runtime;

pub use runtime::{Lister, SharedInformerFactory};

pub use crate::core::{DynamicObject, Meta};
