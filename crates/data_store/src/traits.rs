//! Data store trait definitions.

use async_trait::async_trait;
use bson::oid::ObjectId;
use entities::{Chat, Journey, LastMessage, MatchingPreferences, Message, TravelMode, User};

use crate::StoreResult;

/// Filter options for listing and counting journeys.
///
/// Filters are plain equality predicates; an unset field matches everything.
#[derive(Debug, Clone, Default)]
pub struct JourneyFilter {
    /// Filter by owning user.
    pub user_id: Option<ObjectId>,
    /// Filter by travel mode.
    pub travel_mode: Option<TravelMode>,
}

impl JourneyFilter {
    /// Restricts the filter to journeys owned by `user_id`.
    pub fn for_user(user_id: Option<ObjectId>) -> Self {
        Self {
            user_id,
            travel_mode: None,
        }
    }

    /// Restricts the filter to a single travel mode.
    pub fn with_mode(mut self, mode: TravelMode) -> Self {
        self.travel_mode = Some(mode);
        self
    }
}

/// Validated journey shape used for similarity matching.
#[derive(Debug, Clone)]
pub struct JourneyShape {
    /// Means of travel.
    pub travel_mode: TravelMode,
    /// Route identifier.
    pub route_id: String,
    /// Boarding point.
    pub start_point: String,
    /// Alighting point.
    pub end_point: String,
}

/// Partial update for a journey. Unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct JourneyPatch {
    pub travel_mode: Option<TravelMode>,
    pub route_id: Option<String>,
    pub start_point: Option<String>,
    pub end_point: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
}

/// Partial update for user profile scalars. Unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub bio: Option<String>,
}

/// Trait for document storage operations.
#[async_trait]
pub trait DataStore: Send + Sync {
    // =========================================================================
    // User operations
    // =========================================================================

    /// Creates a new user.
    async fn create_user(&self, user: User) -> StoreResult<User>;

    /// Gets a user by ID.
    async fn get_user(&self, id: ObjectId) -> StoreResult<Option<User>>;

    /// Gets a user by email.
    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Updates a user's profile scalars and returns the updated record.
    async fn update_user_profile(&self, id: ObjectId, patch: ProfilePatch) -> StoreResult<User>;

    /// Replaces a user's matching preferences and returns the updated record.
    async fn update_user_preferences(
        &self,
        id: ObjectId,
        preferences: MatchingPreferences,
    ) -> StoreResult<User>;

    // =========================================================================
    // Journey operations
    // =========================================================================

    /// Creates a new journey.
    async fn create_journey(&self, journey: Journey) -> StoreResult<Journey>;

    /// Gets a journey by ID.
    async fn get_journey(&self, id: ObjectId) -> StoreResult<Option<Journey>>;

    /// Lists journeys matching the filter, oldest first.
    async fn list_journeys(&self, filter: JourneyFilter) -> StoreResult<Vec<Journey>>;

    /// Lists journeys owned by `user_id`, oldest first.
    async fn list_journeys_by_user(&self, user_id: ObjectId) -> StoreResult<Vec<Journey>>;

    /// Applies a partial update to a journey owned by `owner`.
    ///
    /// Returns `None` when no journey matches both the ID and the owner;
    /// absence and foreign ownership are indistinguishable to callers.
    async fn update_journey(
        &self,
        id: ObjectId,
        owner: ObjectId,
        patch: JourneyPatch,
    ) -> StoreResult<Option<Journey>>;

    /// Deletes a journey owned by `owner`. Returns whether a record was removed.
    async fn delete_journey(&self, id: ObjectId, owner: ObjectId) -> StoreResult<bool>;

    /// Lists journeys on an exact travel mode + route pair, oldest first.
    async fn find_journeys_by_route(
        &self,
        mode: TravelMode,
        route_id: &str,
    ) -> StoreResult<Vec<Journey>>;

    /// Lists journeys matching the shape's mode + route, excluding `owner`'s own.
    async fn find_similar_journeys(
        &self,
        owner: ObjectId,
        shape: &JourneyShape,
    ) -> StoreResult<Vec<Journey>>;

    /// Counts journeys matching the filter.
    async fn count_journeys(&self, filter: JourneyFilter) -> StoreResult<u64>;

    // =========================================================================
    // Chat operations
    // =========================================================================

    /// Creates a new chat.
    async fn create_chat(&self, chat: Chat) -> StoreResult<Chat>;

    /// Gets a chat by ID, active or not.
    async fn get_chat(&self, id: ObjectId) -> StoreResult<Option<Chat>>;

    /// Lists active chats that `member` participates in, most recent first.
    async fn list_chats_by_member(&self, member: ObjectId) -> StoreResult<Vec<Chat>>;

    /// Replaces a chat's last-message summary.
    async fn update_chat_last_message(
        &self,
        id: ObjectId,
        last_message: LastMessage,
    ) -> StoreResult<()>;

    /// Sets a chat's soft-delete flag.
    async fn set_chat_active(&self, id: ObjectId, active: bool) -> StoreResult<()>;

    /// Creates a new message.
    async fn create_message(&self, message: Message) -> StoreResult<Message>;

    /// Lists a chat's messages, oldest first.
    async fn list_messages_by_chat(&self, chat_id: ObjectId) -> StoreResult<Vec<Message>>;
}
