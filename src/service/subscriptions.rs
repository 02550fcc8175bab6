use model::entities::user;
use tracing::{debug, info, instrument, warn};

use super::ApiService;
use crate::clients::Subscription;
use crate::error::{ApiError, ApiResult};

impl ApiService {
    /// Subscribes the user to `plan_id`, paying with `source_id`. The
    /// billing customer is created on the user's first subscription.
    #[instrument(skip(self, user, source_id), fields(user_id = user.id))]
    pub async fn subscription_create(
        &self,
        user: user::Model,
        plan_id: &str,
        source_id: &str,
    ) -> ApiResult<Subscription> {
        let customer_id = match user.customer_id.clone() {
            Some(customer_id) => customer_id,
            None => {
                let customer_id = self.payment.create_customer(&user.email).await?;
                self.users.set_customer_id(user, customer_id.clone()).await?;
                debug!("Stored new billing customer {}", customer_id);
                customer_id
            }
        };

        self.payment.set_payment_card(&customer_id, source_id).await?;
        let subscription = self.payment.create_subscription(&customer_id, plan_id).await?;
        info!("Created subscription {}", subscription.id);
        Ok(subscription)
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub async fn subscription_list(&self, user: &user::Model) -> ApiResult<Vec<Subscription>> {
        match &user.customer_id {
            Some(customer_id) => Ok(self.payment.list_subscriptions(customer_id).await?),
            None => Ok(Vec::new()),
        }
    }

    /// Cancels one of the user's own subscriptions.
    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub async fn subscription_cancel(
        &self,
        user: &user::Model,
        subscription_id: &str,
    ) -> ApiResult<()> {
        let owned = self
            .subscription_list(user)
            .await?
            .iter()
            .any(|subscription| subscription.id == subscription_id);
        if !owned {
            warn!("Subscription {} does not belong to the caller", subscription_id);
            return Err(ApiError::not_found("Subscription", subscription_id));
        }

        self.payment.cancel_subscription(subscription_id).await?;
        info!("Canceled subscription {}", subscription_id);
        Ok(())
    }
}
