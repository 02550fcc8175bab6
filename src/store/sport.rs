use chrono::Utc;
use model::entities::sport;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

#[derive(Clone, Debug)]
pub struct SportStore {
    db: DatabaseConnection,
}

impl SportStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, name: String) -> Result<sport::Model, DbErr> {
        let now = Utc::now();
        sport::ActiveModel {
            name: Set(name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<sport::Model>, DbErr> {
        sport::Entity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<sport::Model>, DbErr> {
        sport::Entity::find()
            .filter(sport::Column::Name.eq(name))
            .one(&self.db)
            .await
    }

    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<sport::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sport::Entity::find()
            .filter(sport::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
    }

    pub async fn list(&self) -> Result<Vec<sport::Model>, DbErr> {
        sport::Entity::find()
            .order_by_desc(sport::Column::CreatedAt)
            .order_by_desc(sport::Column::Id)
            .all(&self.db)
            .await
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = sport::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
