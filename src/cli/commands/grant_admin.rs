use anyhow::Result;
use tracing::{error, info};

use crate::config::{initialize_app_state, Settings};

pub async fn grant_admin(settings: &Settings, email: &str) -> Result<()> {
    let state = initialize_app_state(settings).await?;
    match state.service.grant_admin(email).await {
        Ok(user) => {
            info!("User {} ({}) is now an administrator", user.id, user.email);
            Ok(())
        }
        Err(e) => {
            error!("Failed to grant administrator rights to {}: {}", email, e);
            Err(e.into())
        }
    }
}
