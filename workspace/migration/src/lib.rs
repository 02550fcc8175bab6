pub use sea_orm_migration::prelude::*;

pub mod entity_iden;
mod m20240301_000001_create_users_and_sessions;
mod m20240301_000002_create_catalog;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_users_and_sessions::Migration),
            Box::new(m20240301_000002_create_catalog::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Database;

    #[tokio::test]
    async fn test_up_then_down_leaves_no_tables() -> Result<(), DbErr> {
        let db = Database::connect("sqlite::memory:").await?;
        Migrator::up(&db, None).await?;

        let manager = SchemaManager::new(&db);
        for table in ["users", "sessions", "sports", "competitions", "tickets", "pronostics"] {
            assert!(manager.has_table(table).await?, "missing table {table}");
        }

        Migrator::down(&db, None).await?;
        for table in ["users", "sessions", "sports", "competitions", "tickets", "pronostics"] {
            assert!(!manager.has_table(table).await?, "table {table} survived rollback");
        }
        Ok(())
    }
}
