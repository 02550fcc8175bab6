//! Record stores: one per entity, plain CRUD over a shared connection.

pub mod competition;
pub mod pronostic;
pub mod session;
pub mod sport;
pub mod ticket;
pub mod user;

pub use competition::{CompetitionStore, NewCompetition};
pub use pronostic::{NewPronostic, PronosticStore};
pub use session::SessionStore;
pub use sport::SportStore;
pub use ticket::{NewTicket, TicketChanges, TicketStore};
pub use user::{NewUser, UserStore};
