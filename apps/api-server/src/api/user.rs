//! User and authentication API endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use data_store::DataStore;
use protocol::requests::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use protocol::{ApiEnvelope, AuthPayload};

use crate::error::ServerResult;
use crate::middleware::AuthenticatedUser;
use crate::state::AppState;

/// Converts an entity user to its wire representation.
///
/// The credential hash never leaves the server.
fn user_to_wire(user: &entities::User) -> protocol::User {
    protocol::User {
        id: user.id.to_hex(),
        email: user.email.clone(),
        name: user.name.clone(),
        bio: user.bio.clone(),
        role: user.role.as_str().to_string(),
        matching_preferences: user.matching_preferences.clone(),
        created_at: user.created_at.to_chrono(),
        updated_at: user.updated_at.to_chrono(),
    }
}

/// Registers a new account.
pub async fn register<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<RegisterRequest>,
) -> ServerResult<(StatusCode, Json<ApiEnvelope<AuthPayload>>)> {
    let (user, token) = state.users.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok(
            AuthPayload {
                token,
                user: user_to_wire(&user),
            },
            "User registered successfully",
        )),
    ))
}

/// Authenticates an existing account.
pub async fn login<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<LoginRequest>,
) -> ServerResult<Json<ApiEnvelope<AuthPayload>>> {
    let (user, token) = state.users.login(request).await?;

    Ok(Json(ApiEnvelope::ok(
        AuthPayload {
            token,
            user: user_to_wire(&user),
        },
        "Login successful",
    )))
}

/// Returns the authenticated user's record.
pub async fn current_user<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ServerResult<Json<ApiEnvelope<protocol::User>>> {
    let user = state.users.get(user.id).await?;

    Ok(Json(ApiEnvelope::ok(
        user_to_wire(&user),
        "User retrieved successfully",
    )))
}

/// Updates the authenticated user's profile and matching preferences.
pub async fn update_profile<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> ServerResult<Json<ApiEnvelope<protocol::User>>> {
    let user = state.users.update_profile(user.id, request).await?;

    Ok(Json(ApiEnvelope::ok(
        user_to_wire(&user),
        "Profile updated successfully",
    )))
}
