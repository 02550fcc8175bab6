//! Runtime settings and application state construction.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use sea_orm::Database;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::clients::mailer::{LogMailer, Mailer};
use crate::clients::mailjet::MailjetMailer;
use crate::clients::payment::{DisabledPaymentClient, PaymentClient};
use crate::clients::stripe::StripeClient;
use crate::schemas::AppState;
use crate::service::ApiService;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://pronostics.db?mode=rwc";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
pub const DEFAULT_CONFIG_FILE: &str = "pronostics.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    /// Lifetime of a login session.
    pub session_ttl_hours: i64,
    #[serde(default)]
    pub stripe: Option<StripeSettings>,
    #[serde(default)]
    pub mailer: Option<MailerSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeSettings {
    pub secret_key: String,
    #[serde(default = "default_stripe_base")]
    pub api_base: String,
    /// Plan that gets `promo_coupon` applied on subscription.
    pub promo_plan_id: Option<String>,
    pub promo_coupon: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailerSettings {
    pub api_key: String,
    pub api_secret: String,
    #[serde(default = "default_mailjet_base")]
    pub api_base: String,
    pub from_email: String,
    pub from_name: String,
    /// Recipient of contact messages, `from_email` when unset.
    pub support_email: Option<String>,
}

fn default_stripe_base() -> String {
    "https://api.stripe.com".to_string()
}

fn default_mailjet_base() -> String {
    "https://api.mailjet.com".to_string()
}

impl Settings {
    /// Defaults, then the optional config file, then `PRONOSTICS__*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        debug!("Loading settings from {:?}", file);

        let settings = Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("session_ttl_hours", 48)?
            .add_source(File::from(file).required(path.is_some()))
            .add_source(
                Environment::with_prefix("PRONOSTICS")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .context("failed to read configuration")?
            .try_deserialize::<Settings>()
            .context("invalid configuration")?;

        Ok(settings)
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }
}

/// Connects the database and wires the external clients into the service.
pub async fn initialize_app_state(settings: &Settings) -> Result<AppState> {
    info!("Connecting to database: {}", settings.database_url);
    let db = Database::connect(&settings.database_url).await?;

    let payment: Arc<dyn PaymentClient> = match &settings.stripe {
        Some(stripe) => Arc::new(StripeClient::new(stripe.clone())?),
        None => {
            warn!("No payment processor configured, subscriptions are disabled");
            Arc::new(DisabledPaymentClient)
        }
    };

    let mailer: Arc<dyn Mailer> = match &settings.mailer {
        Some(mailer) => Arc::new(MailjetMailer::new(mailer.clone())?),
        None => {
            warn!("No mailer configured, contact messages will only be logged");
            Arc::new(LogMailer)
        }
    };

    let service = ApiService::new(db.clone(), payment, mailer, settings.session_ttl());
    Ok(AppState { db, service })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::load(Some(Path::new("does-not-exist.toml")));
        assert!(settings.is_err(), "an explicit config path must exist");

        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.session_ttl(), chrono::Duration::hours(settings.session_ttl_hours));
        assert!(settings.session_ttl_hours > 0);
    }
}
