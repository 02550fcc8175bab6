pub mod competitions;
pub mod contact;
pub mod health;
pub mod pronostics;
pub mod sessions;
pub mod sports;
pub mod subscriptions;
pub mod tickets;
pub mod users;
