//! Adapters for the third-party services the backend talks to.

use thiserror::Error;

pub mod mailer;
pub mod mailjet;
pub mod payment;
pub mod stripe;

pub use mailer::{ContactMessage, Mailer};
pub use payment::{PaymentClient, Subscription};

/// Timeout applied to every outbound call.
pub(crate) const HTTP_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{service} answered {status}: {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },
    #[error("unexpected payload: {0}")]
    Decode(String),
}
