use chrono::{DateTime, Utc};
use model::entities::competition;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

#[derive(Debug, Clone)]
pub struct NewCompetition {
    pub sport_id: i32,
    pub name: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct CompetitionStore {
    db: DatabaseConnection,
}

impl CompetitionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new: NewCompetition) -> Result<competition::Model, DbErr> {
        let now = Utc::now();
        competition::ActiveModel {
            sport_id: Set(new.sport_id),
            name: Set(new.name),
            start_at: Set(new.start_at),
            end_at: Set(new.end_at),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<competition::Model>, DbErr> {
        competition::Entity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<competition::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        competition::Entity::find()
            .filter(competition::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
    }

    pub async fn list(&self) -> Result<Vec<competition::Model>, DbErr> {
        competition::Entity::find()
            .order_by_desc(competition::Column::CreatedAt)
            .order_by_desc(competition::Column::Id)
            .all(&self.db)
            .await
    }

    /// Number of competitions held under the sport.
    pub async fn count_by_sport(&self, sport_id: i32) -> Result<u64, DbErr> {
        competition::Entity::find()
            .filter(competition::Column::SportId.eq(sport_id))
            .count(&self.db)
            .await
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = competition::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
