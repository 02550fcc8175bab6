use model::entities::user::{self, normalize_email};
use tracing::{debug, info, instrument, warn};

use super::ApiService;
use crate::auth::{hash_password, verify_password};
use crate::error::{ApiError, ApiResult};
use crate::store::NewUser;

/// Sign-up data as submitted by the client.
#[derive(Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub phone_number: Option<String>,
}

impl ApiService {
    /// Registers a user. The email must not be taken, soft-deleted accounts
    /// included.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn create_user(&self, registration: Registration) -> ApiResult<user::Model> {
        let email = normalize_email(&registration.email);
        if self.users.find_by_email(&email).await?.is_some() {
            warn!("Email {} is already registered", email);
            return Err(ApiError::Conflict(format!("User with email {email} already exists")));
        }

        let password_hash = hash_password(&registration.password)?;
        let user = self
            .users
            .create(NewUser {
                email,
                password_hash,
                firstname: registration.firstname,
                lastname: registration.lastname,
                username: registration.username,
                phone_number: registration.phone_number,
            })
            .await?;

        info!("Created user {}", user.id);
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: i32) -> ApiResult<user::Model> {
        self.users
            .find_active_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("User", id))
    }

    pub async fn list_users(&self) -> ApiResult<Vec<user::Model>> {
        let users = self.users.list_active().await?;
        debug!("Listed {} users", users.len());
        Ok(users)
    }

    /// Replaces the password once `current` is confirmed.
    #[instrument(skip_all, fields(user_id = user.id))]
    pub async fn change_password(
        &self,
        user: user::Model,
        current: &str,
        new: &str,
    ) -> ApiResult<user::Model> {
        if !verify_password(&user.password_hash, current)? {
            warn!("Password change refused: wrong current password");
            return Err(ApiError::Unauthorized("Current password is incorrect".to_string()));
        }

        let password_hash = hash_password(new)?;
        let user = self.users.update_password(user, password_hash).await?;
        info!("Password changed");
        Ok(user)
    }

    #[instrument(skip(self, user, password), fields(user_id = user.id))]
    pub async fn change_email(
        &self,
        user: user::Model,
        password: &str,
        new_email: &str,
    ) -> ApiResult<user::Model> {
        let email = normalize_email(new_email);
        if let Some(owner) = self.users.find_by_email(&email).await? {
            if owner.id != user.id {
                warn!("Email {} is already registered", email);
                return Err(ApiError::Conflict(format!("User with email {email} already exists")));
            }
        }

        if !verify_password(&user.password_hash, password)? {
            warn!("Email change refused: wrong password");
            return Err(ApiError::Unauthorized("Password is incorrect".to_string()));
        }

        let user = self.users.update_email(user, email).await?;
        info!("Email changed");
        Ok(user)
    }

    /// Soft-deletes the user and closes every session they hold.
    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub async fn delete_user(&self, user: user::Model) -> ApiResult<()> {
        let user_id = user.id;
        self.users.soft_delete(user).await?;
        let closed = self.sessions.delete_all_for_user(user_id).await?;
        info!("Soft-deleted user {} and closed {} sessions", user_id, closed);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn grant_admin(&self, email: &str) -> ApiResult<user::Model> {
        let email = normalize_email(email);
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .filter(|user| !user.is_deleted())
            .ok_or_else(|| ApiError::NotFound(format!("User with email {email} not found")))?;

        let user = self.users.set_admin(user, true).await?;
        info!("Granted admin rights to user {}", user.id);
        Ok(user)
    }
}
