use sea_orm::entity::prelude::*;

/// An authentication session. The `id` is the opaque bearer token handed to
/// the client.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    /// Absolute expiry; the session is unusable from this instant on.
    pub expires_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_expired(&self, now: DateTimeUtc) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn session_expiring_at(expires_at: DateTimeUtc) -> Model {
        Model {
            id: "6f1c1f9e-3c1e-4a43-9a4b-7d1f2f2b9c11".to_string(),
            user_id: 1,
            created_at: expires_at - Duration::hours(48),
            updated_at: expires_at - Duration::hours(48),
            expires_at,
        }
    }

    #[test]
    fn test_session_expiry_boundary() {
        let expires_at = Utc.with_ymd_and_hms(2024, 5, 10, 18, 30, 0).unwrap();
        let session = session_expiring_at(expires_at);

        assert!(!session.is_expired(expires_at - Duration::seconds(1)));
        assert!(session.is_expired(expires_at));
        assert!(session.is_expired(expires_at + Duration::days(3)));
    }
}
