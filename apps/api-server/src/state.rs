//! Application state.

use std::sync::Arc;

use auth::{JwtConfig, JwtManager, PasswordHasher};
use data_store::DataStore;

use crate::config::Config;
use crate::services::{ChatService, JourneyService, UserService};

/// Shared application state.
///
/// Each service receives its collaborators at construction, so tests can
/// substitute an in-memory store without any global wiring.
pub struct AppState<S: DataStore> {
    /// Server configuration.
    pub config: Config,
    /// JWT manager used by the auth middleware.
    pub jwt_manager: JwtManager,
    /// Journey service.
    pub journeys: JourneyService<S>,
    /// User service.
    pub users: UserService<S>,
    /// Chat service.
    pub chats: ChatService<S>,
}

impl<S: DataStore> AppState<S> {
    /// Creates new application state, wiring each service to the store.
    pub fn new(config: Config, store: S) -> Self {
        let store = Arc::new(store);
        let jwt_manager = JwtManager::new(
            JwtConfig::new(config.jwt_secret.clone())
                .with_expiration_hours(config.jwt_expiration_hours),
        );

        Self {
            journeys: JourneyService::new(Arc::clone(&store)),
            users: UserService::new(Arc::clone(&store), PasswordHasher::new(), jwt_manager.clone()),
            chats: ChatService::new(store),
            jwt_manager,
            config,
        }
    }
}

/// Type alias for shared state.
pub type SharedState<S> = Arc<AppState<S>>;

/// Creates shared state from config and store.
pub fn create_shared_state<S: DataStore>(config: Config, store: S) -> SharedState<S> {
    Arc::new(AppState::new(config, store))
}
