//! Journey entity definitions.

use std::fmt;

use bson::DateTime;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Means of travel for a recorded commute leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TravelMode {
    Bus,
    Tube,
    Overground,
}

impl TravelMode {
    /// All recognised travel modes.
    pub const ALL: [TravelMode; 3] = [TravelMode::Bus, TravelMode::Tube, TravelMode::Overground];

    /// Returns the wire representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Bus => "BUS",
            TravelMode::Tube => "TUBE",
            TravelMode::Overground => "OVERGROUND",
        }
    }

    /// Parses a wire value. Values outside the closed set are rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "BUS" => Some(TravelMode::Bus),
            "TUBE" => Some(TravelMode::Tube),
            "OVERGROUND" => Some(TravelMode::Overground),
            _ => None,
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded commute leg owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journey {
    /// Document identifier.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Owning user.
    pub user_id: ObjectId,
    /// Means of travel.
    pub travel_mode: TravelMode,
    /// Route identifier, e.g. a bus number or line name.
    pub route_id: String,
    /// Boarding point.
    pub start_point: String,
    /// Alighting point. Never equals `start_point` case-insensitively.
    pub end_point: String,
    /// Optional departure time.
    pub departure_time: Option<String>,
    /// Optional arrival time.
    pub arrival_time: Option<String>,
    /// When this record was created.
    pub created_at: DateTime,
    /// When this record was last updated.
    pub updated_at: DateTime,
}

impl Journey {
    /// Creates a new journey owned by `user_id`.
    pub fn new(
        user_id: ObjectId,
        travel_mode: TravelMode,
        route_id: impl Into<String>,
        start_point: impl Into<String>,
        end_point: impl Into<String>,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            user_id,
            travel_mode,
            route_id: route_id.into(),
            start_point: start_point.into(),
            end_point: end_point.into(),
            departure_time: None,
            arrival_time: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the optional departure and arrival times.
    pub fn with_times(mut self, departure: Option<String>, arrival: Option<String>) -> Self {
        self.departure_time = departure;
        self.arrival_time = arrival;
        self
    }
}
