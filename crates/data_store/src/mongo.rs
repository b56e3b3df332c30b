//! MongoDB-backed data store implementation.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, DateTime, Document};
use entities::{Chat, Journey, LastMessage, MatchingPreferences, Message, TravelMode, User};
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};

use crate::{
    DataStore, JourneyFilter, JourneyPatch, JourneyShape, ProfilePatch, StoreError, StoreResult,
};

/// MongoDB-backed data store.
///
/// One typed collection per entity; all filters are plain equality documents.
#[derive(Debug, Clone)]
pub struct MongoStore {
    users: Collection<User>,
    journeys: Collection<Journey>,
    chats: Collection<Chat>,
    messages: Collection<Message>,
}

impl MongoStore {
    /// Connects to MongoDB and binds the Waymate collections.
    pub async fn connect(uri: &str, database: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(database);

        tracing::info!(database = %database, "Connected to MongoDB");

        Ok(Self {
            users: db.collection("users"),
            journeys: db.collection("journeys"),
            chats: db.collection("chats"),
            messages: db.collection("messages"),
        })
    }
}

fn journey_filter_doc(filter: &JourneyFilter) -> Document {
    let mut query = Document::new();
    if let Some(user_id) = filter.user_id {
        query.insert("user_id", user_id);
    }
    if let Some(mode) = filter.travel_mode {
        query.insert("travel_mode", mode.as_str());
    }
    query
}

fn journey_patch_doc(patch: &JourneyPatch) -> Document {
    let mut set = Document::new();
    if let Some(mode) = patch.travel_mode {
        set.insert("travel_mode", mode.as_str());
    }
    if let Some(route_id) = &patch.route_id {
        set.insert("route_id", route_id.as_str());
    }
    if let Some(start_point) = &patch.start_point {
        set.insert("start_point", start_point.as_str());
    }
    if let Some(end_point) = &patch.end_point {
        set.insert("end_point", end_point.as_str());
    }
    if let Some(departure_time) = &patch.departure_time {
        set.insert("departure_time", departure_time.as_str());
    }
    if let Some(arrival_time) = &patch.arrival_time {
        set.insert("arrival_time", arrival_time.as_str());
    }
    set.insert("updated_at", DateTime::now());
    set
}

#[async_trait]
impl DataStore for MongoStore {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: User) -> StoreResult<User> {
        self.users.insert_one(&user).await?;
        Ok(user)
    }

    async fn get_user(&self, id: ObjectId) -> StoreResult<Option<User>> {
        Ok(self.users.find_one(doc! { "_id": id }).await?)
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.users.find_one(doc! { "email": email }).await?)
    }

    async fn update_user_profile(&self, id: ObjectId, patch: ProfilePatch) -> StoreResult<User> {
        let mut set = Document::new();
        if let Some(name) = &patch.name {
            set.insert("name", name.as_str());
        }
        if let Some(bio) = &patch.bio {
            set.insert("bio", bio.as_str());
        }
        set.insert("updated_at", DateTime::now());

        self.users
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| StoreError::not_found("User", id.to_hex()))
    }

    async fn update_user_preferences(
        &self,
        id: ObjectId,
        preferences: MatchingPreferences,
    ) -> StoreResult<User> {
        let preferences = bson::to_bson(&preferences)?;

        self.users
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": { "matching_preferences": preferences, "updated_at": DateTime::now() } },
            )
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| StoreError::not_found("User", id.to_hex()))
    }

    // =========================================================================
    // Journey operations
    // =========================================================================

    async fn create_journey(&self, journey: Journey) -> StoreResult<Journey> {
        self.journeys.insert_one(&journey).await?;
        Ok(journey)
    }

    async fn get_journey(&self, id: ObjectId) -> StoreResult<Option<Journey>> {
        Ok(self.journeys.find_one(doc! { "_id": id }).await?)
    }

    async fn list_journeys(&self, filter: JourneyFilter) -> StoreResult<Vec<Journey>> {
        let cursor = self
            .journeys
            .find(journey_filter_doc(&filter))
            .sort(doc! { "created_at": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
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
        Ok(self
            .journeys
            .find_one_and_update(
                doc! { "_id": id, "user_id": owner },
                doc! { "$set": journey_patch_doc(&patch) },
            )
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn delete_journey(&self, id: ObjectId, owner: ObjectId) -> StoreResult<bool> {
        let result = self
            .journeys
            .delete_one(doc! { "_id": id, "user_id": owner })
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn find_journeys_by_route(
        &self,
        mode: TravelMode,
        route_id: &str,
    ) -> StoreResult<Vec<Journey>> {
        let cursor = self
            .journeys
            .find(doc! { "travel_mode": mode.as_str(), "route_id": route_id })
            .sort(doc! { "created_at": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_similar_journeys(
        &self,
        owner: ObjectId,
        shape: &JourneyShape,
    ) -> StoreResult<Vec<Journey>> {
        let cursor = self
            .journeys
            .find(doc! {
                "user_id": { "$ne": owner },
                "travel_mode": shape.travel_mode.as_str(),
                "route_id": shape.route_id.as_str(),
            })
            .sort(doc! { "created_at": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count_journeys(&self, filter: JourneyFilter) -> StoreResult<u64> {
        Ok(self
            .journeys
            .count_documents(journey_filter_doc(&filter))
            .await?)
    }

    // =========================================================================
    // Chat operations
    // =========================================================================

    async fn create_chat(&self, chat: Chat) -> StoreResult<Chat> {
        self.chats.insert_one(&chat).await?;
        Ok(chat)
    }

    async fn get_chat(&self, id: ObjectId) -> StoreResult<Option<Chat>> {
        Ok(self.chats.find_one(doc! { "_id": id }).await?)
    }

    async fn list_chats_by_member(&self, member: ObjectId) -> StoreResult<Vec<Chat>> {
        let cursor = self
            .chats
            .find(doc! { "participants": member, "is_active": true })
            .sort(doc! { "updated_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update_chat_last_message(
        &self,
        id: ObjectId,
        last_message: LastMessage,
    ) -> StoreResult<()> {
        let last_message = bson::to_bson(&last_message)?;
        let result = self
            .chats
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "last_message": last_message, "updated_at": DateTime::now() } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(StoreError::not_found("Chat", id.to_hex()));
        }
        Ok(())
    }

    async fn set_chat_active(&self, id: ObjectId, active: bool) -> StoreResult<()> {
        let result = self
            .chats
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "is_active": active, "updated_at": DateTime::now() } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(StoreError::not_found("Chat", id.to_hex()));
        }
        Ok(())
    }

    async fn create_message(&self, message: Message) -> StoreResult<Message> {
        self.messages.insert_one(&message).await?;
        Ok(message)
    }

    async fn list_messages_by_chat(&self, chat_id: ObjectId) -> StoreResult<Vec<Message>> {
        let cursor = self
            .messages
            .find(doc! { "chat_id": chat_id })
            .sort(doc! { "created_at": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }
}
