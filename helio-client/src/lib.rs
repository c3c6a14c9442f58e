//! Crate with the client side of helio: a tower-`Service`-wrapped API
//! [`Client`], the generic per-group-version [`Backend`], and runtime API
//! [`Discovery`].
//!
//! The transport is supplied by the caller: any tower `Service` producing
//! http responses (a hyper stack, a test mock) can back a [`Client`].
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod backend;
pub use backend::Backend;

pub mod client;
pub use client::Client;

pub mod discovery;
pub use discovery::Discovery;

pub mod error;
pub use error::{DiscoveryError, Error, ErrorResponse};

/// Convient alias for `Result<T, Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub use helio_core as core;
