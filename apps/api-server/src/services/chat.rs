//! Chat service: membership checks and soft-delete semantics.

use std::sync::Arc;

use bson::oid::ObjectId;
use data_store::DataStore;
use entities::{Chat, ChatKind, LastMessage, Message};
use protocol::requests::{CreateChatRequest, SendMessageRequest};

use crate::error::{ServerError, ServerResult};

/// Maximum characters of a message retained in the chat summary.
const LAST_MESSAGE_SUMMARY_LEN: usize = 140;

/// Creates chats, gates access by membership and relays messages.
pub struct ChatService<S> {
    store: Arc<S>,
}

impl<S: DataStore> ChatService<S> {
    /// Creates a new chat service backed by `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Creates a chat. The creator is always a participant.
    pub async fn create(&self, creator: ObjectId, request: CreateChatRequest) -> ServerResult<Chat> {
        let kind = request
            .chat_type
            .as_deref()
            .and_then(ChatKind::parse)
            .ok_or_else(|| {
                ServerError::Validation("Invalid chat type. Valid types are: direct, group".to_string())
            })?;

        let mut participants = vec![creator];
        for raw in request.participants.unwrap_or_default() {
            let id = ObjectId::parse_str(&raw)
                .map_err(|_| ServerError::Validation("Invalid participant ID format".to_string()))?;
            if !participants.contains(&id) {
                participants.push(id);
            }
        }

        let chat = match kind {
            ChatKind::Direct => {
                if participants.len() != 2 {
                    return Err(ServerError::Validation(
                        "Direct chats must have exactly two participants".to_string(),
                    ));
                }
                Chat::direct(participants[0], participants[1])
            }
            ChatKind::Group => {
                let title = request
                    .title
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| {
                        ServerError::Validation("Group chats require a title".to_string())
                    })?;

                let mut chat = Chat::group(creator, participants, title);
                chat.description = request.description;
                chat
            }
        };

        let chat = self.store.create_chat(chat).await?;

        tracing::info!(chat_id = %chat.id, kind = chat.kind.as_str(), "Chat created");

        Ok(chat)
    }

    /// Fetches a chat the requester participates in.
    pub async fn get(&self, id: &str, requester: ObjectId) -> ServerResult<Chat> {
        let id = parse_chat_id(id)?;
        self.visible_chat(id, requester).await
    }

    /// Lists the requester's active chats, most recent first.
    pub async fn list_for_user(&self, requester: ObjectId) -> ServerResult<Vec<Chat>> {
        Ok(self.store.list_chats_by_member(requester).await?)
    }

    /// Soft-deletes a chat.
    ///
    /// Group chats may only be deactivated by an admin; refusals answer like
    /// absence.
    pub async fn deactivate(&self, id: &str, requester: ObjectId) -> ServerResult<()> {
        let id = parse_chat_id(id)?;
        let chat = self.visible_chat(id, requester).await?;

        if chat.kind == ChatKind::Group && !chat.is_admin(requester) {
            return Err(chat_not_found());
        }

        self.store.set_chat_active(id, false).await?;

        tracing::info!(chat_id = %id, "Chat deactivated");

        Ok(())
    }

    /// Sends a message and refreshes the chat's last-message summary.
    pub async fn send_message(
        &self,
        id: &str,
        sender: ObjectId,
        request: SendMessageRequest,
    ) -> ServerResult<Message> {
        let id = parse_chat_id(id)?;
        self.visible_chat(id, sender).await?;

        let content = request
            .content
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                ServerError::Validation("Message content cannot be empty".to_string())
            })?;

        let message = self
            .store
            .create_message(Message::new(id, sender, content))
            .await?;

        let summary = LastMessage {
            sender_id: sender,
            content: message.content.chars().take(LAST_MESSAGE_SUMMARY_LEN).collect(),
            sent_at: message.created_at,
        };
        self.store.update_chat_last_message(id, summary).await?;

        Ok(message)
    }

    /// Lists a chat's messages, oldest first.
    pub async fn list_messages(&self, id: &str, requester: ObjectId) -> ServerResult<Vec<Message>> {
        let id = parse_chat_id(id)?;
        self.visible_chat(id, requester).await?;
        Ok(self.store.list_messages_by_chat(id).await?)
    }

    /// Resolves a chat that is active and joined by `requester`.
    ///
    /// Absence, inactivity and foreign membership all answer alike so that
    /// existence is never leaked.
    async fn visible_chat(&self, id: ObjectId, requester: ObjectId) -> ServerResult<Chat> {
        let chat = self.store.get_chat(id).await?.ok_or_else(chat_not_found)?;
        if !chat.is_active || !chat.is_participant(requester) {
            return Err(chat_not_found());
        }
        Ok(chat)
    }
}

fn parse_chat_id(id: &str) -> ServerResult<ObjectId> {
    ObjectId::parse_str(id)
        .map_err(|_| ServerError::Validation("Invalid chat ID format".to_string()))
}

fn chat_not_found() -> ServerError {
    ServerError::NotFound("Chat not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_store::MemoryStore;

    fn service() -> ChatService<MemoryStore> {
        ChatService::new(Arc::new(MemoryStore::new()))
    }

    fn direct_request(other: ObjectId) -> CreateChatRequest {
        CreateChatRequest {
            chat_type: Some("direct".to_string()),
            participants: Some(vec![other.to_hex()]),
            title: None,
            description: None,
        }
    }

    fn expect_validation<T: std::fmt::Debug>(result: ServerResult<T>, message: &str) {
        match result {
            Err(ServerError::Validation(m)) => assert_eq!(m, message),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    fn expect_chat_not_found<T: std::fmt::Debug>(result: ServerResult<T>) {
        match result {
            Err(ServerError::NotFound(m)) => assert_eq!(m, "Chat not found"),
            other => panic!("expected not-found failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_type() {
        let request = CreateChatRequest {
            chat_type: Some("broadcast".to_string()),
            ..CreateChatRequest::default()
        };

        expect_validation(
            service().create(ObjectId::new(), request).await,
            "Invalid chat type. Valid types are: direct, group",
        );
    }

    #[tokio::test]
    async fn test_direct_chat_needs_exactly_two_participants() {
        let request = CreateChatRequest {
            chat_type: Some("direct".to_string()),
            participants: Some(vec![]),
            ..CreateChatRequest::default()
        };

        expect_validation(
            service().create(ObjectId::new(), request).await,
            "Direct chats must have exactly two participants",
        );
    }

    #[tokio::test]
    async fn test_group_chat_requires_title() {
        let request = CreateChatRequest {
            chat_type: Some("group".to_string()),
            participants: Some(vec![ObjectId::new().to_hex()]),
            title: Some("   ".to_string()),
            description: None,
        };

        expect_validation(
            service().create(ObjectId::new(), request).await,
            "Group chats require a title",
        );
    }

    #[tokio::test]
    async fn test_creator_joins_implicitly_and_duplicates_collapse() {
        let service = service();
        let creator = ObjectId::new();
        let other = ObjectId::new();

        let request = CreateChatRequest {
            chat_type: Some("direct".to_string()),
            participants: Some(vec![creator.to_hex(), other.to_hex()]),
            ..CreateChatRequest::default()
        };
        let chat = service.create(creator, request).await.unwrap();

        assert_eq!(chat.participants.len(), 2);
        assert!(chat.is_participant(creator));
        assert!(chat.is_participant(other));
    }

    #[tokio::test]
    async fn test_non_participant_cannot_see_chat() {
        let service = service();
        let creator = ObjectId::new();
        let chat = service
            .create(creator, direct_request(ObjectId::new()))
            .await
            .unwrap();

        expect_chat_not_found(service.get(&chat.id.to_hex(), ObjectId::new()).await);
        assert!(service.get(&chat.id.to_hex(), creator).await.is_ok());
    }

    #[tokio::test]
    async fn test_message_updates_last_message_summary() {
        let service = service();
        let creator = ObjectId::new();
        let chat = service
            .create(creator, direct_request(ObjectId::new()))
            .await
            .unwrap();

        let request = SendMessageRequest {
            content: Some("See you at the stop".to_string()),
        };
        service
            .send_message(&chat.id.to_hex(), creator, request)
            .await
            .unwrap();

        let refreshed = service.get(&chat.id.to_hex(), creator).await.unwrap();
        let summary = refreshed.last_message.unwrap();
        assert_eq!(summary.content, "See you at the stop");
        assert_eq!(summary.sender_id, creator);

        let messages = service
            .list_messages(&chat.id.to_hex(), creator)
            .await
            .unwrap();
        assert_eq!(messages.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let service = service();
        let creator = ObjectId::new();
        let chat = service
            .create(creator, direct_request(ObjectId::new()))
            .await
            .unwrap();

        let request = SendMessageRequest {
            content: Some("   ".to_string()),
        };
        expect_validation(
            service.send_message(&chat.id.to_hex(), creator, request).await,
            "Message content cannot be empty",
        );
    }

    #[tokio::test]
    async fn test_deactivate_hides_chat_from_members() {
        let service = service();
        let creator = ObjectId::new();
        let chat = service
            .create(creator, direct_request(ObjectId::new()))
            .await
            .unwrap();

        service.deactivate(&chat.id.to_hex(), creator).await.unwrap();

        expect_chat_not_found(service.get(&chat.id.to_hex(), creator).await);
        assert!(service.list_for_user(creator).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_group_deactivation_requires_admin() {
        let service = service();
        let creator = ObjectId::new();
        let member = ObjectId::new();

        let request = CreateChatRequest {
            chat_type: Some("group".to_string()),
            participants: Some(vec![member.to_hex()]),
            title: Some("Route 159 crew".to_string()),
            description: None,
        };
        let chat = service.create(creator, request).await.unwrap();

        expect_chat_not_found(service.deactivate(&chat.id.to_hex(), member).await);
        assert!(service.deactivate(&chat.id.to_hex(), creator).await.is_ok());
    }

    #[tokio::test]
    async fn test_malformed_chat_id_rejected() {
        expect_validation(
            service().get("zzz", ObjectId::new()).await,
            "Invalid chat ID format",
        );
    }
}
