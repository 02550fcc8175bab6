use chrono::Utc;
use model::entities::user;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::{debug, instrument};

/// Fields of a user about to be registered.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub phone_number: Option<String>,
}

#[derive(Clone, Debug)]
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a non-admin user.
    #[instrument(skip(self, new), fields(email = %new.email))]
    pub async fn create(&self, new: NewUser) -> Result<user::Model, DbErr> {
        let now = Utc::now();
        let user = user::ActiveModel {
            customer_id: Set(None),
            email: Set(new.email),
            password_hash: Set(new.password_hash),
            firstname: Set(new.firstname),
            lastname: Set(new.lastname),
            username: Set(new.username),
            phone_number: Set(new.phone_number),
            admin: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            confirmed_at: Set(None),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        debug!("Inserted user {}", user.id);
        Ok(user)
    }

    /// Looks a user up by id, soft-deleted users excluded.
    pub async fn find_active_by_id(&self, id: i32) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find_by_id(id)
            .filter(user::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
    }

    /// Looks a user up by normalized email, soft-deleted users included.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    pub async fn list_active(&self) -> Result<Vec<user::Model>, DbErr> {
        user::Entity::find()
            .filter(user::Column::DeletedAt.is_null())
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .all(&self.db)
            .await
    }

    pub async fn update_password(
        &self,
        user: user::Model,
        password_hash: String,
    ) -> Result<user::Model, DbErr> {
        let mut active: user::ActiveModel = user.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await
    }

    pub async fn update_email(&self, user: user::Model, email: String) -> Result<user::Model, DbErr> {
        let mut active: user::ActiveModel = user.into();
        active.email = Set(email);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await
    }

    pub async fn set_customer_id(
        &self,
        user: user::Model,
        customer_id: String,
    ) -> Result<user::Model, DbErr> {
        let mut active: user::ActiveModel = user.into();
        active.customer_id = Set(Some(customer_id));
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await
    }

    pub async fn set_admin(&self, user: user::Model, admin: bool) -> Result<user::Model, DbErr> {
        let mut active: user::ActiveModel = user.into();
        active.admin = Set(admin);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await
    }

    /// Marks the user as deleted; the row is kept.
    pub async fn soft_delete(&self, user: user::Model) -> Result<user::Model, DbErr> {
        let now = Utc::now();
        let mut active: user::ActiveModel = user.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(&self.db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::setup_test_db;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            username: "ada".to_string(),
            phone_number: None,
        }
    }

    #[tokio::test]
    async fn test_soft_deleted_user_is_hidden_but_kept() {
        let store = UserStore::new(setup_test_db().await);
        let kept = store.create(new_user("kept@example.com")).await.unwrap();
        let gone = store.create(new_user("gone@example.com")).await.unwrap();

        let gone = store.soft_delete(gone).await.unwrap();
        assert!(gone.is_deleted());

        assert!(store.find_active_by_id(gone.id).await.unwrap().is_none());
        assert!(store.find_by_email("gone@example.com").await.unwrap().is_some());

        let active = store.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, kept.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_violates_unique_index() {
        let store = UserStore::new(setup_test_db().await);
        store.create(new_user("twice@example.com")).await.unwrap();

        let err = store.create(new_user("twice@example.com")).await.unwrap_err();
        assert!(matches!(
            err.sql_err(),
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
        ));
    }
}
