use chrono::Utc;
use model::entities::{session, user, user::normalize_email};
use tracing::{debug, info, instrument, warn};

use super::ApiService;
use crate::auth::{verify_password, AuthContext};
use crate::error::{ApiError, ApiResult};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

impl ApiService {
    /// Logs a user in, opening a session valid for the configured TTL.
    #[instrument(skip(self, password))]
    pub async fn create_session(
        &self,
        email: &str,
        password: &str,
    ) -> ApiResult<(session::Model, user::Model)> {
        let email = normalize_email(email);
        let Some(user) = self
            .users
            .find_by_email(&email)
            .await?
            .filter(|user| !user.is_deleted())
        else {
            warn!("Login attempt for unknown email");
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(&user.password_hash, password)? {
            warn!(user_id = user.id, "Login attempt with wrong password");
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let session = self
            .sessions
            .create(user.id, Utc::now() + self.session_ttl)
            .await?;
        info!(user_id = user.id, "Opened session expiring at {}", session.expires_at);
        Ok((session, user))
    }

    /// Maps a bearer token to its caller. Unknown or expired tokens and
    /// missing or deleted users all resolve to `None`.
    pub async fn resolve_session(&self, token: &str) -> ApiResult<Option<AuthContext>> {
        let Some(session) = self.sessions.find_by_id(token).await? else {
            return Ok(None);
        };
        if session.is_expired(Utc::now()) {
            debug!(user_id = session.user_id, "Session expired at {}", session.expires_at);
            return Ok(None);
        }

        let user = self.users.find_active_by_id(session.user_id).await?;
        Ok(user.map(|user| AuthContext { user, session }))
    }

    #[instrument(skip_all, fields(user_id = session.user_id))]
    pub async fn remove_session(&self, session: &session::Model) -> ApiResult<()> {
        if !self.sessions.delete(&session.id).await? {
            debug!("Session already gone");
        }
        info!("Session closed");
        Ok(())
    }
}
