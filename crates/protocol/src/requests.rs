//! API request types.
//!
//! Journey fields arrive as optional strings so that presence and enum
//! checks run in the service layer and fail with the documented messages
//! instead of deserialisation errors.

use entities::MatchingPreferences;
use serde::{Deserialize, Serialize};

// ============================================================================
// Journey requests
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateJourneyRequest {
    pub travel_mode: Option<String>,
    pub route_id: Option<String>,
    pub start_point: Option<String>,
    pub end_point: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateJourneyRequest {
    pub travel_mode: Option<String>,
    pub route_id: Option<String>,
    pub start_point: Option<String>,
    pub end_point: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindSimilarJourneysRequest {
    pub travel_mode: Option<String>,
    pub route_id: Option<String>,
    pub start_point: Option<String>,
    pub end_point: Option<String>,
}

/// Query parameters accepted by the journey listing endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListJourneysQuery {
    pub travel_mode: Option<String>,
}

// ============================================================================
// User requests
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub matching_preferences: Option<MatchingPreferences>,
}

// ============================================================================
// Chat requests
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateChatRequest {
    #[serde(rename = "type")]
    pub chat_type: Option<String>,
    pub participants: Option<Vec<String>>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub content: Option<String>,
}
