//! User service: registration, login and profile validation.

use std::sync::Arc;

use auth::{JwtManager, PasswordHasher};
use bson::oid::ObjectId;
use data_store::{DataStore, ProfilePatch};
use entities::{MatchingPreferences, User};
use protocol::requests::{LoginRequest, RegisterRequest, UpdateProfileRequest};

use crate::error::{ServerError, ServerResult};

/// Registers, authenticates and updates users.
///
/// Credential hashing and token issuance are injected collaborators; the
/// service itself only decides what is valid.
pub struct UserService<S> {
    store: Arc<S>,
    hasher: PasswordHasher,
    jwt: JwtManager,
}

impl<S: DataStore> UserService<S> {
    /// Creates a new user service.
    pub fn new(store: Arc<S>, hasher: PasswordHasher, jwt: JwtManager) -> Self {
        Self { store, hasher, jwt }
    }

    /// Registers a new account and issues a token.
    ///
    /// The role is fixed at creation and never updatable.
    pub async fn register(&self, request: RegisterRequest) -> ServerResult<(User, String)> {
        let (email, password) = required_credentials(request.email, request.password)?;

        if self.store.get_user_by_email(&email).await?.is_some() {
            return Err(ServerError::Validation(
                "Email already registered".to_string(),
            ));
        }

        let mut user = User::new(email, self.hasher.hash(&password));
        user.name = request.name;

        let user = self.store.create_user(user).await?;
        let token = self.token_for(&user)?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok((user, token))
    }

    /// Verifies credentials and issues a token.
    ///
    /// Unknown email and wrong password answer alike.
    pub async fn login(&self, request: LoginRequest) -> ServerResult<(User, String)> {
        let (email, password) = required_credentials(request.email, request.password)?;

        let user = self
            .store
            .get_user_by_email(&email)
            .await?
            .ok_or_else(invalid_credentials)?;

        if !self.hasher.verify(&password, &user.password) {
            return Err(invalid_credentials());
        }

        let token = self.token_for(&user)?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok((user, token))
    }

    /// Fetches a user by ID.
    pub async fn get(&self, id: ObjectId) -> ServerResult<User> {
        self.store
            .get_user(id)
            .await?
            .ok_or_else(|| ServerError::NotFound("User not found".to_string()))
    }

    /// Updates profile scalars and, when supplied, matching preferences.
    ///
    /// Scalars and preferences are persisted via two separate store calls.
    pub async fn update_profile(
        &self,
        id: ObjectId,
        request: UpdateProfileRequest,
    ) -> ServerResult<User> {
        if self.store.get_user(id).await?.is_none() {
            return Err(ServerError::NotFound("User not found".to_string()));
        }

        if let Some(preferences) = &request.matching_preferences {
            validate_matching_preferences(preferences)?;
        }

        let patch = ProfilePatch {
            name: request.name,
            bio: request.bio,
        };
        let mut user = self.store.update_user_profile(id, patch).await?;

        if let Some(preferences) = request.matching_preferences {
            user = self.store.update_user_preferences(id, preferences).await?;
        }

        tracing::info!(user_id = %id, "Profile updated");

        Ok(user)
    }

    fn token_for(&self, user: &User) -> ServerResult<String> {
        Ok(self
            .jwt
            .generate_token(&user.id.to_hex(), user.email.clone(), user.name.clone())?)
    }
}

fn invalid_credentials() -> ServerError {
    ServerError::Unauthorized("Invalid email or password".to_string())
}

fn required_credentials(
    email: Option<String>,
    password: Option<String>,
) -> ServerResult<(String, String)> {
    match (email, password) {
        (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
            Ok((email.trim().to_lowercase(), password))
        }
        _ => Err(ServerError::Validation(
            "Email and password are required".to_string(),
        )),
    }
}

fn validate_matching_preferences(preferences: &MatchingPreferences) -> ServerResult<()> {
    for time in [&preferences.commute_start, &preferences.commute_end]
        .into_iter()
        .flatten()
    {
        if !is_valid_commute_time(time) {
            return Err(ServerError::Validation(
                "Invalid commute time format. Use HH:mm format".to_string(),
            ));
        }
    }

    let min_ok = preferences.min_age.is_none_or(|min| min >= 18);
    let max_ok = preferences.max_age.is_none_or(|max| max <= 100);
    let ordered = match (preferences.min_age, preferences.max_age) {
        (Some(min), Some(max)) => min <= max,
        _ => true,
    };

    if !(min_ok && max_ok && ordered) {
        return Err(ServerError::Validation(
            "Invalid age range. Age must be between 18 and 100 and min age cannot exceed max age"
                .to_string(),
        ));
    }

    Ok(())
}

/// Returns true for strings of the exact form `HH:mm` describing a valid
/// time (hour 00-23, minute 00-59).
fn is_valid_commute_time(value: &str) -> bool {
    let Some((hours, minutes)) = value.split_once(':') else {
        return false;
    };
    if hours.len() != 2 || minutes.len() != 2 {
        return false;
    }
    if !hours.bytes().all(|b| b.is_ascii_digit()) || !minutes.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let (Ok(h), Ok(m)) = (hours.parse::<u8>(), minutes.parse::<u8>()) else {
        return false;
    };
    h < 24 && m < 60
}
