use chrono::Utc;
use model::entities::ticket;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

#[derive(Debug, Clone)]
pub struct NewTicket {
    pub title: String,
    pub stake: Decimal,
    pub public: bool,
    pub live: bool,
    pub risk: String,
    pub pack: Option<String>,
}

/// Partial update of a ticket; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct TicketChanges {
    pub title: Option<String>,
    pub stake: Option<Decimal>,
    pub public: Option<bool>,
    pub live: Option<bool>,
    pub risk: Option<String>,
    pub pack: Option<String>,
}

#[derive(Clone, Debug)]
pub struct TicketStore {
    db: DatabaseConnection,
}

impl TicketStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new: NewTicket) -> Result<ticket::Model, DbErr> {
        let now = Utc::now();
        ticket::ActiveModel {
            title: Set(new.title),
            stake: Set(new.stake),
            public: Set(new.public),
            live: Set(new.live),
            risk: Set(new.risk),
            pack: Set(new.pack),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<ticket::Model>, DbErr> {
        ticket::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists tickets, restricted to one pack when given.
    pub async fn list(&self, pack: Option<&str>) -> Result<Vec<ticket::Model>, DbErr> {
        let mut query = ticket::Entity::find();
        if let Some(pack) = pack {
            query = query.filter(ticket::Column::Pack.eq(pack));
        }
        query
            .order_by_desc(ticket::Column::CreatedAt)
            .order_by_desc(ticket::Column::Id)
            .all(&self.db)
            .await
    }

    pub async fn update(
        &self,
        ticket: ticket::Model,
        changes: TicketChanges,
    ) -> Result<ticket::Model, DbErr> {
        let mut active: ticket::ActiveModel = ticket.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(stake) = changes.stake {
            active.stake = Set(stake);
        }
        if let Some(public) = changes.public {
            active.public = Set(public);
        }
        if let Some(live) = changes.live {
            active.live = Set(live);
        }
        if let Some(risk) = changes.risk {
            active.risk = Set(risk);
        }
        if let Some(pack) = changes.pack {
            active.pack = Set(Some(pack));
        }
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = ticket::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::setup_test_db;
    use std::str::FromStr;

    fn new_ticket(title: &str, pack: Option<&str>) -> NewTicket {
        NewTicket {
            title: title.to_string(),
            stake: Decimal::from_str("10.00").unwrap(),
            public: true,
            live: false,
            risk: "low".to_string(),
            pack: pack.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_list_filters_by_pack_newest_first() {
        let store = TicketStore::new(setup_test_db().await);
        let a = store.create(new_ticket("A", Some("premium"))).await.unwrap();
        store.create(new_ticket("B", None)).await.unwrap();
        let c = store.create(new_ticket("C", Some("premium"))).await.unwrap();

        let premium = store.list(Some("premium")).await.unwrap();
        assert_eq!(premium.iter().map(|t| t.id).collect::<Vec<_>>(), vec![c.id, a.id]);
        assert_eq!(store.list(None).await.unwrap().len(), 3);
        assert!(store.list(Some("vip")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partial_update_keeps_untouched_fields() {
        let store = TicketStore::new(setup_test_db().await);
        let ticket = store.create(new_ticket("Sunday", None)).await.unwrap();

        let updated = store
            .update(
                ticket.clone(),
                TicketChanges {
                    live: Some(true),
                    risk: Some("high".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Sunday");
        assert_eq!(updated.stake, ticket.stake);
        assert!(updated.live);
        assert_eq!(updated.risk, "high");
    }
}
