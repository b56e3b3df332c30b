//! Business services.
//!
//! All validation and query-shaping rules live here; handlers only adapt
//! HTTP requests and responses.

pub mod chat;
pub mod journey;
pub mod user;

pub use chat::ChatService;
pub use journey::JourneyService;
pub use user::UserService;
