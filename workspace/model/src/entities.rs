//! SeaORM entities backing the pronostics backend.
//! One module per table; relations mirror the foreign keys created by the
//! `migration` crate.

pub mod competition;
pub mod pronostic;
pub mod session;
pub mod sport;
pub mod ticket;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::competition::Entity as Competition;
    pub use super::pronostic::Entity as Pronostic;
    pub use super::pronostic::PronosticStatus;
    pub use super::session::Entity as Session;
    pub use super::sport::Entity as Sport;
    pub use super::ticket::Entity as Ticket;
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use chrono::{Duration, TimeZone, Utc};
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let football = sport::ActiveModel {
            name: Set("Football".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let ligue1 = competition::ActiveModel {
            sport_id: Set(football.id),
            name: Set("Ligue 1".to_string()),
            start_at: Set(now),
            end_at: Set(now + Duration::days(270)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let ticket = ticket::ActiveModel {
            title: Set("Saturday combo".to_string()),
            stake: Set(Decimal::new(1000, 2)),
            public: Set(true),
            live: Set(false),
            risk: Set("low".to_string()),
            pack: Set(Some("premium".to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        for (first, second, status) in [
            ("PSG", "OM", PronosticStatus::Win),
            ("OL", "LOSC", PronosticStatus::InProgress),
        ] {
            pronostic::ActiveModel {
                ticket_id: Set(ticket.id),
                sport_id: Set(football.id),
                competition_id: Set(ligue1.id),
                first_team: Set(first.to_string()),
                second_team: Set(second.to_string()),
                pronostic: Set(format!("{first} wins")),
                odd: Set(Decimal::new(150, 2)),
                status: Set(status),
                event_date: Set(now + Duration::days(1)),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&db)
            .await?;
        }

        // Pronostics are reachable through the ticket relation
        let legs = ticket.find_related(Pronostic).all(&db).await?;
        assert_eq!(legs.len(), 2);
        assert!(legs.iter().any(|p| p.status == PronosticStatus::InProgress));

        let sport_of_competition = ligue1.find_related(Sport).one(&db).await?;
        assert_eq!(sport_of_competition.map(|s| s.name), Some("Football".to_string()));

        // Deleting the ticket removes its pronostics
        Ticket::delete_by_id(ticket.id).exec(&db).await?;
        let remaining = Pronostic::find()
            .filter(pronostic::Column::TicketId.eq(ticket.id))
            .all(&db)
            .await?;
        assert!(remaining.is_empty());

        // A referenced sport cannot be deleted
        assert!(Sport::delete_by_id(football.id).exec(&db).await.is_err());

        Ok(())
    }
}
