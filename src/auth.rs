//! Password hashing, bearer tokens and request authentication.
//!
//! [`authenticate`] runs on every request and never rejects: it only attaches
//! an [`AuthContext`] when the bearer token resolves to a live session of an
//! active user. Handlers that need a caller ask for [`CurrentUser`] or
//! [`AdminUser`], which turn a missing context into 401 / 403.

use argon2::{
    password_hash::{self, rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use model::entities::{session, user};
use tracing::{debug, trace, warn};

use crate::error::ApiError;
use crate::schemas::AppState;

/// The authenticated caller of a request.
#[derive(Clone, Debug)]
pub struct AuthContext {
    pub user: user::Model,
    pub session: session::Model,
}

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hash error: {e}")))
}

/// `Ok(false)` on mismatch; a malformed stored hash is an internal error.
pub fn verify_password(hash: &str, password: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ApiError::Internal(format!("password hash parse error: {e}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(ApiError::Internal(format!("password verify error: {e}"))),
    }
}

/// Token of an `Authorization: Bearer <token>` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolves the bearer token into an [`AuthContext`] request extension.
pub async fn authenticate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    if let Some(token) = bearer_token(request.headers()).map(str::to_owned) {
        match state.service.resolve_session(&token).await {
            Ok(Some(context)) => {
                trace!(user_id = context.user.id, "Request authenticated");
                request.extensions_mut().insert(context);
            }
            Ok(None) => debug!("Bearer token does not match a live session"),
            Err(e) => warn!("Session lookup failed, continuing unauthenticated: {}", e),
        }
    }
    next.run(request).await
}

/// Any authenticated user.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthContext);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}

/// An authenticated user holding the admin flag.
#[derive(Clone, Debug)]
pub struct AdminUser(pub AuthContext);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(context) = CurrentUser::from_request_parts(parts, state).await?;
        if !context.user.admin {
            warn!(user_id = context.user.id, "Non-admin attempted an admin operation");
            return Err(ApiError::Forbidden("Administrator rights required".to_string()));
        }
        Ok(AdminUser(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "correct horse battery").unwrap());
        assert!(!verify_password(&hash, "wrong horse").unwrap());
    }

    #[test]
    fn test_malformed_hash_is_internal() {
        assert!(matches!(
            verify_password("not-a-phc-string", "whatever"),
            Err(ApiError::Internal(_))
        ));
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc-123"));
        assert_eq!(bearer_token(&headers), Some("abc-123"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(bearer_token(&headers), None);
    }
}
