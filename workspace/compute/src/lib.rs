pub mod error;
pub mod ticket;

pub use error::{ComputeError, Result};
pub use ticket::{TicketAggregate, aggregate, aggregate_legs};
