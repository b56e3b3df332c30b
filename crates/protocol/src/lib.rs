//! HTTP API types for the Waymate server.
//!
//! This crate defines the request bodies, wire representations and the
//! `{success, result, message}` response envelope used by every endpoint.

pub mod requests;
pub mod responses;
pub mod types;

pub use responses::*;
pub use types::*;
