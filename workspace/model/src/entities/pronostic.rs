use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{competition, sport, ticket};

/// Outcome of a single pronostic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PronosticStatus {
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "win")]
    Win,
    #[sea_orm(string_value = "lose")]
    Lose,
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

/// A single prediction on an event, belonging to one ticket.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pronostics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub ticket_id: i32,
    pub sport_id: i32,
    pub competition_id: i32,
    pub first_team: String,
    pub second_team: String,
    /// The predicted outcome, e.g. "PSG wins" or "over 2.5 goals".
    pub pronostic: String,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub odd: Decimal,
    pub status: PronosticStatus,
    pub event_date: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "ticket::Entity",
        from = "Column::TicketId",
        to = "ticket::Column::Id",
        on_delete = "Cascade"
    )]
    Ticket,
    #[sea_orm(
        belongs_to = "sport::Entity",
        from = "Column::SportId",
        to = "sport::Column::Id",
        on_delete = "Restrict"
    )]
    Sport,
    #[sea_orm(
        belongs_to = "competition::Entity",
        from = "Column::CompetitionId",
        to = "competition::Column::Id",
        on_delete = "Restrict"
    )]
    Competition,
}

impl Related<ticket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ticket.def()
    }
}

impl Related<sport::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sport.def()
    }
}

impl Related<competition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Competition.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveEnum;

    #[test]
    fn test_status_column_values() {
        assert_eq!(PronosticStatus::InProgress.to_value(), "in_progress");
        assert_eq!(PronosticStatus::Canceled.to_value(), "canceled");
        assert_eq!(
            PronosticStatus::try_from_value(&"lose".to_string()).ok(),
            Some(PronosticStatus::Lose)
        );
        assert!(PronosticStatus::try_from_value(&"pending".to_string()).is_err());
    }
}
