//! Journey API endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use data_store::DataStore;
use protocol::ApiEnvelope;
use protocol::requests::{
    CreateJourneyRequest, FindSimilarJourneysRequest, ListJourneysQuery, UpdateJourneyRequest,
};

use crate::error::ServerResult;
use crate::middleware::AuthenticatedUser;
use crate::state::AppState;

/// Converts an entity journey to its wire representation.
fn journey_to_wire(journey: &entities::Journey) -> protocol::Journey {
    protocol::Journey {
        id: journey.id.to_hex(),
        user_id: journey.user_id.to_hex(),
        travel_mode: journey.travel_mode.to_string(),
        route_id: journey.route_id.clone(),
        start_point: journey.start_point.clone(),
        end_point: journey.end_point.clone(),
        departure_time: journey.departure_time.clone(),
        arrival_time: journey.arrival_time.clone(),
        created_at: journey.created_at.to_chrono(),
        updated_at: journey.updated_at.to_chrono(),
    }
}

fn journeys_to_wire(journeys: &[entities::Journey]) -> Vec<protocol::Journey> {
    journeys.iter().map(journey_to_wire).collect()
}

/// Creates a journey owned by the authenticated user.
pub async fn create_journey<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateJourneyRequest>,
) -> ServerResult<(StatusCode, Json<ApiEnvelope<protocol::Journey>>)> {
    let journey = state.journeys.create(user.id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok(
            journey_to_wire(&journey),
            "Journey created successfully",
        )),
    ))
}

/// Gets a journey by ID.
pub async fn get_journey<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ServerResult<Json<ApiEnvelope<protocol::Journey>>> {
    let journey = state.journeys.get_by_id(&id).await?;

    Ok(Json(ApiEnvelope::ok(
        journey_to_wire(&journey),
        "Journey retrieved successfully",
    )))
}

/// Lists journeys, optionally filtered by travel mode.
pub async fn list_journeys<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ListJourneysQuery>,
) -> ServerResult<Json<ApiEnvelope<Vec<protocol::Journey>>>> {
    let journeys = state.journeys.list(query.travel_mode.as_deref()).await?;

    Ok(Json(ApiEnvelope::ok(
        journeys_to_wire(&journeys),
        "Journeys retrieved successfully",
    )))
}

/// Lists the authenticated user's journeys.
pub async fn list_own_journeys<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ServerResult<Json<ApiEnvelope<Vec<protocol::Journey>>>> {
    let journeys = state.journeys.list_for_user(user.id).await?;

    Ok(Json(ApiEnvelope::ok(
        journeys_to_wire(&journeys),
        "Journeys retrieved successfully",
    )))
}

/// Updates a journey owned by the authenticated user.
pub async fn update_journey<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateJourneyRequest>,
) -> ServerResult<Json<ApiEnvelope<protocol::Journey>>> {
    let journey = state.journeys.update(&id, user.id, request).await?;

    Ok(Json(ApiEnvelope::ok(
        journey_to_wire(&journey),
        "Journey updated successfully",
    )))
}

/// Deletes a journey owned by the authenticated user.
pub async fn delete_journey<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ServerResult<Json<ApiEnvelope<serde_json::Value>>> {
    state.journeys.delete(&id, user.id).await?;

    Ok(Json(ApiEnvelope::ok(
        serde_json::Value::Null,
        "Journey deleted successfully",
    )))
}

/// Lists journeys on an exact travel mode + route pair.
pub async fn journeys_by_route<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    Path((mode, route_id)): Path<(String, String)>,
) -> ServerResult<Json<ApiEnvelope<Vec<protocol::Journey>>>> {
    let journeys = state.journeys.by_route(&mode, &route_id).await?;

    Ok(Json(ApiEnvelope::ok(
        journeys_to_wire(&journeys),
        "Journeys retrieved successfully",
    )))
}

/// Finds journeys similar to the supplied shape.
pub async fn find_similar_journeys<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<FindSimilarJourneysRequest>,
) -> ServerResult<Json<ApiEnvelope<Vec<protocol::Journey>>>> {
    let journeys = state.journeys.find_similar(user.id, request).await?;

    Ok(Json(ApiEnvelope::ok(
        journeys_to_wire(&journeys),
        "Similar journeys retrieved successfully",
    )))
}

/// Aggregates journey statistics for the authenticated user.
pub async fn own_journey_stats<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ServerResult<Json<ApiEnvelope<protocol::JourneyStats>>> {
    let stats = state.journeys.stats(Some(user.id)).await?;

    Ok(Json(ApiEnvelope::ok(
        stats,
        "Journey statistics retrieved successfully",
    )))
}
