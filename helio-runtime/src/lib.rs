//! Crate with the helio caching runtime
//!
//! This crate contains the building blocks for consumers that need a warm,
//! continuously synchronized view of server-side state: per-kind stores fed
//! by a list-then-watch loop, a factory de-duplicating informers by kind,
//! and typed read-only listers.
//!
//! Newcomers should generally get started with [`SharedInformerFactory`].

#![deny(unsafe_code)]

pub mod informers;
pub mod lister;
pub mod store;
pub mod sync;

pub use informers::{GenericInformer, Registry, SharedInformer, SharedInformerFactory};
pub use lister::Lister;
pub use store::Store;
