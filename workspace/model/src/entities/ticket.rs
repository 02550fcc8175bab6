use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// A named bundle of pronostics. The overall odd and status are derived
/// from the pronostics when the ticket is read and are not stored here.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub stake: Decimal,
    pub public: bool,
    pub live: bool,
    /// Free-form risk label ("low", "medium", "high", ...).
    pub risk: String,
    /// Offer the ticket is published under.
    pub pack: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::pronostic::Entity")]
    Pronostic,
}

impl Related<super::pronostic::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pronostic.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
