//! In-memory data store implementation for testing.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::DateTime;
use entities::{Chat, Journey, LastMessage, MatchingPreferences, Message, TravelMode, User};
use tokio::sync::RwLock;

use crate::{
    DataStore, JourneyFilter, JourneyPatch, JourneyShape, ProfilePatch, StoreError, StoreResult,
};

/// In-memory data store for testing purposes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<ObjectId, User>>>,
    journeys: Arc<RwLock<HashMap<ObjectId, Journey>>>,
    chats: Arc<RwLock<HashMap<ObjectId, Chat>>>,
    messages: Arc<RwLock<HashMap<ObjectId, Message>>>,
}

impl MemoryStore {
    /// Creates a new in-memory data store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_filter(journey: &Journey, filter: &JourneyFilter) -> bool {
    if let Some(user_id) = filter.user_id {
        if journey.user_id != user_id {
            return false;
        }
    }
    if let Some(mode) = filter.travel_mode {
        if journey.travel_mode != mode {
            return false;
        }
    }
    true
}

#[async_trait]
impl DataStore for MemoryStore {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(StoreError::already_exists("User", user.id.to_hex()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: ObjectId) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn update_user_profile(&self, id: ObjectId, patch: ProfilePatch) -> StoreResult<User> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("User", id.to_hex()))?;

        if let Some(name) = patch.name {
            user.name = Some(name);
        }
        if let Some(bio) = patch.bio {
            user.bio = Some(bio);
        }
        user.updated_at = DateTime::now();

        Ok(user.clone())
    }

    async fn update_user_preferences(
        &self,
        id: ObjectId,
        preferences: MatchingPreferences,
    ) -> StoreResult<User> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("User", id.to_hex()))?;

        user.matching_preferences = Some(preferences);
        user.updated_at = DateTime::now();

        Ok(user.clone())
    }

    // =========================================================================
    // Journey operations
    // =========================================================================

    async fn create_journey(&self, journey: Journey) -> StoreResult<Journey> {
        let mut journeys = self.journeys.write().await;
        if journeys.contains_key(&journey.id) {
            return Err(StoreError::already_exists("Journey", journey.id.to_hex()));
        }
        journeys.insert(journey.id, journey.clone());
        Ok(journey)
    }

    async fn get_journey(&self, id: ObjectId) -> StoreResult<Option<Journey>> {
        let journeys = self.journeys.read().await;
        Ok(journeys.get(&id).cloned())
    }

    async fn list_journeys(&self, filter: JourneyFilter) -> StoreResult<Vec<Journey>> {
        let journeys = self.journeys.read().await;
        let mut result: Vec<Journey> = journeys
            .values()
            .filter(|j| matches_filter(j, &filter))
            .cloned()
            .collect();
        result.sort_by_key(|j| j.created_at);
        Ok(result)
    }

    async fn list_journeys_by_user(&self, user_id: ObjectId) -> StoreResult<Vec<Journey>> {
        self.list_journeys(JourneyFilter::for_user(Some(user_id)))
            .await
    }

    async fn update_journey(
        &self,
        id: ObjectId,
        owner: ObjectId,
        patch: JourneyPatch,
    ) -> StoreResult<Option<Journey>> {
        let mut journeys = self.journeys.write().await;
        let Some(journey) = journeys.get_mut(&id) else {
            return Ok(None);
        };
        if journey.user_id != owner {
            return Ok(None);
        }

        if let Some(mode) = patch.travel_mode {
            journey.travel_mode = mode;
        }
        if let Some(route_id) = patch.route_id {
            journey.route_id = route_id;
        }
        if let Some(start_point) = patch.start_point {
            journey.start_point = start_point;
        }
        if let Some(end_point) = patch.end_point {
            journey.end_point = end_point;
        }
        if let Some(departure_time) = patch.departure_time {
            journey.departure_time = Some(departure_time);
        }
        if let Some(arrival_time) = patch.arrival_time {
            journey.arrival_time = Some(arrival_time);
        }
        journey.updated_at = DateTime::now();

        Ok(Some(journey.clone()))
    }

    async fn delete_journey(&self, id: ObjectId, owner: ObjectId) -> StoreResult<bool> {
        let mut journeys = self.journeys.write().await;
        match journeys.get(&id) {
            Some(journey) if journey.user_id == owner => {
                journeys.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_journeys_by_route(
        &self,
        mode: TravelMode,
        route_id: &str,
    ) -> StoreResult<Vec<Journey>> {
        let journeys = self.journeys.read().await;
        let mut result: Vec<Journey> = journeys
            .values()
            .filter(|j| j.travel_mode == mode && j.route_id == route_id)
            .cloned()
            .collect();
        result.sort_by_key(|j| j.created_at);
        Ok(result)
    }

    async fn find_similar_journeys(
        &self,
        owner: ObjectId,
        shape: &JourneyShape,
    ) -> StoreResult<Vec<Journey>> {
        let journeys = self.journeys.read().await;
        let mut result: Vec<Journey> = journeys
            .values()
            .filter(|j| {
                j.user_id != owner
                    && j.travel_mode == shape.travel_mode
                    && j.route_id == shape.route_id
            })
            .cloned()
            .collect();
        result.sort_by_key(|j| j.created_at);
        Ok(result)
    }

    async fn count_journeys(&self, filter: JourneyFilter) -> StoreResult<u64> {
        let journeys = self.journeys.read().await;
        Ok(journeys.values().filter(|j| matches_filter(j, &filter)).count() as u64)
    }

    // =========================================================================
    // Chat operations
    // =========================================================================

    async fn create_chat(&self, chat: Chat) -> StoreResult<Chat> {
        let mut chats = self.chats.write().await;
        if chats.contains_key(&chat.id) {
            return Err(StoreError::already_exists("Chat", chat.id.to_hex()));
        }
        chats.insert(chat.id, chat.clone());
        Ok(chat)
    }

    async fn get_chat(&self, id: ObjectId) -> StoreResult<Option<Chat>> {
        let chats = self.chats.read().await;
        Ok(chats.get(&id).cloned())
    }

    async fn list_chats_by_member(&self, member: ObjectId) -> StoreResult<Vec<Chat>> {
        let chats = self.chats.read().await;
        let mut result: Vec<Chat> = chats
            .values()
            .filter(|c| c.is_active && c.is_participant(member))
            .cloned()
            .collect();
        result.sort_by_key(|c| c.updated_at);
        result.reverse();
        Ok(result)
    }

    async fn update_chat_last_message(
        &self,
        id: ObjectId,
        last_message: LastMessage,
    ) -> StoreResult<()> {
        let mut chats = self.chats.write().await;
        let chat = chats
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("Chat", id.to_hex()))?;

        chat.last_message = Some(last_message);
        chat.updated_at = DateTime::now();
        Ok(())
    }

    async fn set_chat_active(&self, id: ObjectId, active: bool) -> StoreResult<()> {
        let mut chats = self.chats.write().await;
        let chat = chats
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("Chat", id.to_hex()))?;

        chat.is_active = active;
        chat.updated_at = DateTime::now();
        Ok(())
    }

    async fn create_message(&self, message: Message) -> StoreResult<Message> {
        let mut messages = self.messages.write().await;
        if messages.contains_key(&message.id) {
            return Err(StoreError::already_exists("Message", message.id.to_hex()));
        }
        messages.insert(message.id, message.clone());
        Ok(message)
    }

    async fn list_messages_by_chat(&self, chat_id: ObjectId) -> StoreResult<Vec<Message>> {
        let messages = self.messages.read().await;
        let mut result: Vec<Message> = messages
            .values()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect();
        result.sort_by_key(|m| m.created_at);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn journey(owner: ObjectId, mode: TravelMode, route: &str) -> Journey {
        Journey::new(owner, mode, route, "Brixton", "Euston")
    }

    #[tokio::test]
    async fn test_update_is_owner_scoped() {
        let store = MemoryStore::new();
        let owner = ObjectId::new();
        let stranger = ObjectId::new();
        let stored = store
            .create_journey(journey(owner, TravelMode::Bus, "159"))
            .await
            .unwrap();

        let patch = JourneyPatch {
            route_id: Some("59".to_string()),
            ..JourneyPatch::default()
        };
        let denied = store
            .update_journey(stored.id, stranger, patch.clone())
            .await
            .unwrap();
        assert!(denied.is_none());

        let updated = store.update_journey(stored.id, owner, patch).await.unwrap();
        assert_eq!(updated.unwrap().route_id, "59");
    }

    #[tokio::test]
    async fn test_delete_is_owner_scoped() {
        let store = MemoryStore::new();
        let owner = ObjectId::new();
        let stored = store
            .create_journey(journey(owner, TravelMode::Tube, "victoria"))
            .await
            .unwrap();

        assert!(!store.delete_journey(stored.id, ObjectId::new()).await.unwrap());
        assert!(store.delete_journey(stored.id, owner).await.unwrap());
        assert!(store.get_journey(stored.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_similar_journeys_exclude_owner() {
        let store = MemoryStore::new();
        let owner = ObjectId::new();
        let other = ObjectId::new();
        store
            .create_journey(journey(owner, TravelMode::Bus, "159"))
            .await
            .unwrap();
        store
            .create_journey(journey(other, TravelMode::Bus, "159"))
            .await
            .unwrap();
        store
            .create_journey(journey(other, TravelMode::Bus, "73"))
            .await
            .unwrap();

        let shape = JourneyShape {
            travel_mode: TravelMode::Bus,
            route_id: "159".to_string(),
            start_point: "Brixton".to_string(),
            end_point: "Euston".to_string(),
        };
        let similar = store.find_similar_journeys(owner, &shape).await.unwrap();

        assert_eq!(similar.len(), 1);
        assert_eq!(similar[0].user_id, other);
        assert_eq!(similar[0].route_id, "159");
    }

    #[tokio::test]
    async fn test_count_with_filters() {
        let store = MemoryStore::new();
        let owner = ObjectId::new();
        store
            .create_journey(journey(owner, TravelMode::Bus, "159"))
            .await
            .unwrap();
        store
            .create_journey(journey(owner, TravelMode::Tube, "victoria"))
            .await
            .unwrap();
        store
            .create_journey(journey(ObjectId::new(), TravelMode::Bus, "73"))
            .await
            .unwrap();

        let all = store.count_journeys(JourneyFilter::default()).await.unwrap();
        let mine = store
            .count_journeys(JourneyFilter::for_user(Some(owner)))
            .await
            .unwrap();
        let my_buses = store
            .count_journeys(JourneyFilter::for_user(Some(owner)).with_mode(TravelMode::Bus))
            .await
            .unwrap();

        assert_eq!(all, 3);
        assert_eq!(mine, 2);
        assert_eq!(my_buses, 1);
    }

    #[tokio::test]
    async fn test_user_email_lookup() {
        let store = MemoryStore::new();
        store
            .create_user(User::new("rider@example.com", "salt$hash"))
            .await
            .unwrap();

        assert!(store
            .get_user_by_email("rider@example.com")
            .await
            .unwrap()
            .is_some());
        assert!(store
            .get_user_by_email("nobody@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_inactive_chats_hidden_from_listing() {
        let store = MemoryStore::new();
        let (a, b) = (ObjectId::new(), ObjectId::new());
        let chat = store.create_chat(Chat::direct(a, b)).await.unwrap();

        assert_eq!(store.list_chats_by_member(a).await.unwrap().len(), 1);

        store.set_chat_active(chat.id, false).await.unwrap();

        assert!(store.list_chats_by_member(a).await.unwrap().is_empty());
        // the document itself is retained
        let kept = store.get_chat(chat.id).await.unwrap().unwrap();
        assert!(!kept.is_active);
    }

    #[tokio::test]
    async fn test_messages_ordered_oldest_first() {
        let store = MemoryStore::new();
        let (a, b) = (ObjectId::new(), ObjectId::new());
        let chat = store.create_chat(Chat::direct(a, b)).await.unwrap();

        store
            .create_message(Message::new(chat.id, a, "first"))
            .await
            .unwrap();
        store
            .create_message(Message::new(chat.id, b, "second"))
            .await
            .unwrap();

        let messages = store.list_messages_by_chat(chat.id).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].created_at <= messages[1].created_at);
    }
}
