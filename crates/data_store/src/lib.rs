//! Document storage abstraction for Waymate.
//!
//! This crate defines the persistence contract shared by the API services
//! and ships two implementations: a MongoDB-backed store for deployment and
//! an in-memory store used in tests.

mod error;
mod memory;
mod mongo;
mod traits;

pub use error::*;
pub use memory::*;
pub use mongo::*;
pub use traits::*;
