//! Chat API endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use data_store::DataStore;
use protocol::ApiEnvelope;
use protocol::requests::{CreateChatRequest, SendMessageRequest};

use crate::error::ServerResult;
use crate::middleware::AuthenticatedUser;
use crate::state::AppState;

/// Converts an entity chat to its wire representation.
fn chat_to_wire(chat: &entities::Chat) -> protocol::Chat {
    protocol::Chat {
        id: chat.id.to_hex(),
        chat_type: chat.kind.as_str().to_string(),
        participants: chat.participants.iter().map(|p| p.to_hex()).collect(),
        title: chat.title.clone(),
        description: chat.description.clone(),
        admins: chat.admins.iter().map(|a| a.to_hex()).collect(),
        last_message: chat.last_message.as_ref().map(|m| protocol::LastMessageSummary {
            sender_id: m.sender_id.to_hex(),
            content: m.content.clone(),
            sent_at: m.sent_at.to_chrono(),
        }),
        is_active: chat.is_active,
        created_at: chat.created_at.to_chrono(),
        updated_at: chat.updated_at.to_chrono(),
    }
}

/// Converts an entity message to its wire representation.
fn message_to_wire(message: &entities::Message) -> protocol::Message {
    protocol::Message {
        id: message.id.to_hex(),
        chat_id: message.chat_id.to_hex(),
        sender_id: message.sender_id.to_hex(),
        content: message.content.clone(),
        created_at: message.created_at.to_chrono(),
    }
}

/// Creates a chat with the authenticated user as a participant.
pub async fn create_chat<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateChatRequest>,
) -> ServerResult<(StatusCode, Json<ApiEnvelope<protocol::Chat>>)> {
    let chat = state.chats.create(user.id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok(
            chat_to_wire(&chat),
            "Chat created successfully",
        )),
    ))
}

/// Lists the authenticated user's active chats.
pub async fn list_chats<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ServerResult<Json<ApiEnvelope<Vec<protocol::Chat>>>> {
    let chats = state.chats.list_for_user(user.id).await?;

    Ok(Json(ApiEnvelope::ok(
        chats.iter().map(chat_to_wire).collect::<Vec<_>>(),
        "Chats retrieved successfully",
    )))
}

/// Gets a chat the authenticated user participates in.
pub async fn get_chat<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ServerResult<Json<ApiEnvelope<protocol::Chat>>> {
    let chat = state.chats.get(&id, user.id).await?;

    Ok(Json(ApiEnvelope::ok(
        chat_to_wire(&chat),
        "Chat retrieved successfully",
    )))
}

/// Soft-deletes a chat.
pub async fn deactivate_chat<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ServerResult<Json<ApiEnvelope<serde_json::Value>>> {
    state.chats.deactivate(&id, user.id).await?;

    Ok(Json(ApiEnvelope::ok(
        serde_json::Value::Null,
        "Chat deleted successfully",
    )))
}

/// Sends a message in a chat.
pub async fn send_message<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> ServerResult<(StatusCode, Json<ApiEnvelope<protocol::Message>>)> {
    let message = state.chats.send_message(&id, user.id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok(
            message_to_wire(&message),
            "Message sent successfully",
        )),
    ))
}

/// Lists a chat's messages, oldest first.
pub async fn list_messages<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ServerResult<Json<ApiEnvelope<Vec<protocol::Message>>>> {
    let messages = state.chats.list_messages(&id, user.id).await?;

    Ok(Json(ApiEnvelope::ok(
        messages.iter().map(message_to_wire).collect::<Vec<_>>(),
        "Messages retrieved successfully",
    )))
}
