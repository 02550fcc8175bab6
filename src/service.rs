//! Application service: orchestrates the stores and external clients and
//! enforces the business rules the handlers rely on.

use std::sync::Arc;

use compute::TicketAggregate;
use model::entities::{competition, pronostic, sport, ticket};
use sea_orm::DatabaseConnection;

use crate::clients::{Mailer, PaymentClient};
use crate::store::{
    CompetitionStore, PronosticStore, SessionStore, SportStore, TicketStore, UserStore,
};

mod catalog;
mod contact;
mod sessions;
mod subscriptions;
mod tickets;
mod users;

pub use users::Registration;

#[derive(Clone, Debug)]
pub struct ApiService {
    pub(crate) users: UserStore,
    pub(crate) sessions: SessionStore,
    pub(crate) sports: SportStore,
    pub(crate) competitions: CompetitionStore,
    pub(crate) tickets: TicketStore,
    pub(crate) pronostics: PronosticStore,
    payment: Arc<dyn PaymentClient>,
    mailer: Arc<dyn Mailer>,
    session_ttl: chrono::Duration,
}

impl ApiService {
    pub fn new(
        db: DatabaseConnection,
        payment: Arc<dyn PaymentClient>,
        mailer: Arc<dyn Mailer>,
        session_ttl: chrono::Duration,
    ) -> Self {
        Self {
            users: UserStore::new(db.clone()),
            sessions: SessionStore::new(db.clone()),
            sports: SportStore::new(db.clone()),
            competitions: CompetitionStore::new(db.clone()),
            tickets: TicketStore::new(db.clone()),
            pronostics: PronosticStore::new(db),
            payment,
            mailer,
            session_ttl,
        }
    }
}

/// A competition with its sport attached.
#[derive(Debug, Clone)]
pub struct CompetitionView {
    pub competition: competition::Model,
    pub sport: sport::Model,
}

/// A pronostic with the sport and competition it refers to.
#[derive(Debug, Clone)]
pub struct PronosticView {
    pub pronostic: pronostic::Model,
    pub sport: sport::Model,
    pub competition: competition::Model,
}

/// A ticket as read by clients: its pronostics and the aggregate derived from them.
#[derive(Debug, Clone)]
pub struct TicketView {
    pub ticket: ticket::Model,
    pub aggregate: TicketAggregate,
    pub pronostics: Vec<PronosticView>,
}
