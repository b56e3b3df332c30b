//! Core entity definitions for Waymate.
//!
//! This crate defines the document types shared across the Waymate backend:
//! journeys, users with their matching preferences, and chats.

mod chat;
mod journey;
mod user;

pub use chat::*;
pub use journey::*;
pub use user::*;
