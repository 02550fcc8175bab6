use chrono::{DateTime, Utc};
use model::entities::session;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use tracing::debug;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct SessionStore {
    db: DatabaseConnection,
}

impl SessionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens a session for `user_id` under a fresh random token.
    pub async fn create(
        &self,
        user_id: i32,
        expires_at: DateTime<Utc>,
    ) -> Result<session::Model, DbErr> {
        let now = Utc::now();
        session::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
            expires_at: Set(expires_at),
        }
        .insert(&self.db)
        .await
    }

    /// Returns the session whatever its expiry; callers decide validity.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<session::Model>, DbErr> {
        session::Entity::find_by_id(id.to_string()).one(&self.db).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, DbErr> {
        let result = session::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn delete_all_for_user(&self, user_id: i32) -> Result<u64, DbErr> {
        let result = session::Entity::delete_many()
            .filter(session::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        debug!("Removed {} sessions of user {}", result.rows_affected, user_id);
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{NewUser, UserStore};
    use crate::test_utils::test_utils::setup_test_db;
    use chrono::Duration;

    #[tokio::test]
    async fn test_sessions_are_unique_and_removable() {
        let db = setup_test_db().await;
        let user = UserStore::new(db.clone())
            .create(NewUser {
                email: "sessions@example.com".to_string(),
                password_hash: "hash".to_string(),
                firstname: "Grace".to_string(),
                lastname: "Hopper".to_string(),
                username: "grace".to_string(),
                phone_number: Some("+33600000000".to_string()),
            })
            .await
            .unwrap();
        let store = SessionStore::new(db);

        let expires_at = Utc::now() + Duration::hours(48);
        let first = store.create(user.id, expires_at).await.unwrap();
        let second = store.create(user.id, expires_at).await.unwrap();
        assert_ne!(first.id, second.id);

        let found = store.find_by_id(&first.id).await.unwrap().unwrap();
        assert_eq!(found.user_id, user.id);

        assert!(store.delete(&first.id).await.unwrap());
        assert!(!store.delete(&first.id).await.unwrap());
        assert_eq!(store.delete_all_for_user(user.id).await.unwrap(), 1);
        assert!(store.find_by_id(&second.id).await.unwrap().is_none());
    }
}
