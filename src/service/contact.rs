use tracing::{info, instrument};

use super::ApiService;
use crate::clients::ContactMessage;
use crate::error::ApiResult;

impl ApiService {
    #[instrument(skip(self, message), fields(from = %message.email))]
    pub async fn send_contact(&self, message: ContactMessage) -> ApiResult<()> {
        self.mailer.send_contact(&message).await?;
        info!("Contact message accepted");
        Ok(())
    }
}
