use chrono::{DateTime, Utc};
use model::entities::pronostic::{self, PronosticStatus};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

#[derive(Debug, Clone)]
pub struct NewPronostic {
    pub ticket_id: i32,
    pub sport_id: i32,
    pub competition_id: i32,
    pub first_team: String,
    pub second_team: String,
    pub pronostic: String,
    pub odd: Decimal,
    pub status: PronosticStatus,
    pub event_date: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct PronosticStore {
    db: DatabaseConnection,
}

impl PronosticStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new: NewPronostic) -> Result<pronostic::Model, DbErr> {
        let now = Utc::now();
        pronostic::ActiveModel {
            ticket_id: Set(new.ticket_id),
            sport_id: Set(new.sport_id),
            competition_id: Set(new.competition_id),
            first_team: Set(new.first_team),
            second_team: Set(new.second_team),
            pronostic: Set(new.pronostic),
            odd: Set(new.odd),
            status: Set(new.status),
            event_date: Set(new.event_date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<pronostic::Model>, DbErr> {
        pronostic::Entity::find_by_id(id).one(&self.db).await
    }

    pub async fn list(&self) -> Result<Vec<pronostic::Model>, DbErr> {
        pronostic::Entity::find()
            .order_by_desc(pronostic::Column::CreatedAt)
            .order_by_desc(pronostic::Column::Id)
            .all(&self.db)
            .await
    }

    /// Pronostics of the given tickets, in event order.
    pub async fn list_by_tickets(&self, ticket_ids: &[i32]) -> Result<Vec<pronostic::Model>, DbErr> {
        if ticket_ids.is_empty() {
            return Ok(Vec::new());
        }
        pronostic::Entity::find()
            .filter(pronostic::Column::TicketId.is_in(ticket_ids.to_vec()))
            .order_by_asc(pronostic::Column::EventDate)
            .order_by_asc(pronostic::Column::Id)
            .all(&self.db)
            .await
    }

    pub async fn count_by_sport(&self, sport_id: i32) -> Result<u64, DbErr> {
        pronostic::Entity::find()
            .filter(pronostic::Column::SportId.eq(sport_id))
            .count(&self.db)
            .await
    }

    pub async fn count_by_competition(&self, competition_id: i32) -> Result<u64, DbErr> {
        pronostic::Entity::find()
            .filter(pronostic::Column::CompetitionId.eq(competition_id))
            .count(&self.db)
            .await
    }

    pub async fn update_status(
        &self,
        pronostic: pronostic::Model,
        status: PronosticStatus,
    ) -> Result<pronostic::Model, DbErr> {
        let mut active: pronostic::ActiveModel = pronostic.into();
        active.status = Set(status);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = pronostic::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
