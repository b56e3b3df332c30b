//! Authentication middleware.

use std::sync::Arc;

use auth::Claims;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use bson::oid::ObjectId;
use data_store::DataStore;

use crate::error::ServerError;
use crate::state::AppState;

/// Authenticated user information.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// User ID.
    pub id: ObjectId,
    /// User email.
    pub email: String,
    /// User display name.
    pub name: Option<String>,
}

impl TryFrom<Claims> for AuthenticatedUser {
    type Error = auth::AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = ObjectId::parse_str(&claims.sub).map_err(|_| auth::AuthError::InvalidToken)?;
        Ok(Self {
            id,
            email: claims.email,
            name: claims.name,
        })
    }
}

/// Extracts the JWT token from the Authorization header.
fn extract_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Authentication middleware.
///
/// This middleware extracts the JWT token from the Authorization header,
/// validates it, and stores the authenticated user in the request extensions.
pub async fn auth_middleware<S: DataStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_token(&request) else {
        return ServerError::AuthenticationRequired.into_response();
    };

    let claims = match state.jwt_manager.validate_token(token) {
        Ok(claims) => claims,
        Err(_) => {
            return ServerError::Unauthorized("Invalid token".to_string()).into_response();
        }
    };

    match AuthenticatedUser::try_from(claims) {
        Ok(user) => {
            request.extensions_mut().insert(user);
        }
        Err(_) => {
            return ServerError::Unauthorized("Invalid token claims".to_string()).into_response();
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticated_user_from_claims() {
        let subject = ObjectId::new();
        let claims = Claims::new(
            subject.to_hex(),
            "test@example.com".to_string(),
            Some("Test User".to_string()),
            24,
        );

        let user = AuthenticatedUser::try_from(claims).unwrap();
        assert_eq!(user.id, subject);
        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.name, Some("Test User".to_string()));
    }

    #[test]
    fn test_rejects_non_hex_subject() {
        let claims = Claims::new("not-an-object-id", "test@example.com".to_string(), None, 24);

        assert!(AuthenticatedUser::try_from(claims).is_err());
    }

    #[test]
    fn test_extract_token_missing_bearer() {
        let auth_header = "Basic credentials";
        let token = auth_header.strip_prefix("Bearer ");
        assert_eq!(token, None);
    }
}
