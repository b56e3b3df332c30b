//! API endpoints.

pub mod chat;
pub mod journey;
pub mod user;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use data_store::DataStore;

use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Creates the API router with all endpoints.
///
/// Everything except the health check and the auth endpoints sits behind the
/// bearer-token middleware.
pub fn create_router<S: DataStore + 'static>(state: Arc<AppState<S>>) -> Router {
    let public = Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(user::register))
        .route("/auth/login", post(user::login));

    let protected = Router::new()
        // Journey endpoints
        .route(
            "/journeys",
            post(journey::create_journey).get(journey::list_journeys),
        )
        .route("/journeys/user/all", get(journey::list_own_journeys))
        .route("/journeys/stats/user", get(journey::own_journey_stats))
        .route("/journeys/similar", post(journey::find_similar_journeys))
        .route(
            "/journeys/route/:mode/:route_id",
            get(journey::journeys_by_route),
        )
        .route(
            "/journeys/:id",
            get(journey::get_journey)
                .put(journey::update_journey)
                .delete(journey::delete_journey),
        )
        // User endpoints
        .route("/users/me", get(user::current_user))
        .route("/users/profile", put(user::update_profile))
        // Chat endpoints
        .route("/chats", post(chat::create_chat).get(chat::list_chats))
        .route(
            "/chats/:id",
            get(chat::get_chat).delete(chat::deactivate_chat),
        )
        .route(
            "/chats/:id/messages",
            post(chat::send_message).get(chat::list_messages),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth_middleware::<S>,
        ));

    public.merge(protected).with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
