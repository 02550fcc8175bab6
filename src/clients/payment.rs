use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::ClientError;

/// A recurring subscription held at the payment processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub id: String,
    pub plan_id: String,
    pub product_id: String,
    pub customer_id: String,
    pub provider: String,
    /// Whether the subscription renews at the end of the period.
    pub auto_renewal: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Billing operations the service relies on.
#[async_trait]
pub trait PaymentClient: Send + Sync + std::fmt::Debug {
    /// Registers a customer and returns its reference.
    async fn create_customer(&self, email: &str) -> Result<String, ClientError>;

    /// Makes `source_id` the customer's default payment source.
    async fn set_payment_card(&self, customer_id: &str, source_id: &str) -> Result<(), ClientError>;

    async fn create_subscription(
        &self,
        customer_id: &str,
        plan_id: &str,
    ) -> Result<Subscription, ClientError>;

    /// Every subscription of the customer, whatever its status.
    async fn list_subscriptions(&self, customer_id: &str) -> Result<Vec<Subscription>, ClientError>;

    async fn cancel_subscription(&self, subscription_id: &str) -> Result<(), ClientError>;
}

/// Stands in when no processor is configured; every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledPaymentClient;

#[async_trait]
impl PaymentClient for DisabledPaymentClient {
    async fn create_customer(&self, _email: &str) -> Result<String, ClientError> {
        Err(ClientError::NotConfigured("payment processor"))
    }

    async fn set_payment_card(&self, _customer_id: &str, _source_id: &str) -> Result<(), ClientError> {
        Err(ClientError::NotConfigured("payment processor"))
    }

    async fn create_subscription(
        &self,
        _customer_id: &str,
        _plan_id: &str,
    ) -> Result<Subscription, ClientError> {
        Err(ClientError::NotConfigured("payment processor"))
    }

    async fn list_subscriptions(&self, _customer_id: &str) -> Result<Vec<Subscription>, ClientError> {
        Err(ClientError::NotConfigured("payment processor"))
    }

    async fn cancel_subscription(&self, _subscription_id: &str) -> Result<(), ClientError> {
        Err(ClientError::NotConfigured("payment processor"))
    }
}
