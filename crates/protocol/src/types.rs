//! Wire representations returned inside response envelopes.
//!
//! Identifiers are hex strings and timestamps are UTC datetimes; handler
//! modules convert entities into these types, dropping server-only fields
//! (notably the credential hash).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journey {
    pub id: String,
    pub user_id: String,
    pub travel_mode: String,
    pub route_id: String,
    pub start_point: String,
    pub end_point: String,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub role: String,
    pub matching_preferences: Option<entities::MatchingPreferences>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Token plus the freshly authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastMessageSummary {
    pub sender_id: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    #[serde(rename = "type")]
    pub chat_type: String,
    pub participants: Vec<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub admins: Vec<String>,
    pub last_message: Option<LastMessageSummary>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub chat_id: String,
    pub sender_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Per-mode journey counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeBreakdown {
    pub bus: u64,
    pub tube: u64,
    pub overground: u64,
}

/// Journey statistics. Keys are camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyStats {
    pub total_journeys: u64,
    pub journeys_by_mode: ModeBreakdown,
}
