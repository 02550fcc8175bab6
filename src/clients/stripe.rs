//! Stripe REST adapter. Requests are form-encoded and authenticated with the
//! secret key as bearer token.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::RequestBuilder;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use super::payment::{PaymentClient, Subscription};
use super::{ClientError, HTTP_TIMEOUT};
use crate::config::StripeSettings;

const SERVICE: &str = "stripe";
const PAGE_SIZE: &str = "100";

#[derive(Debug, Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    settings: StripeSettings,
}

#[derive(Debug, Deserialize)]
struct StripeObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct StripeList<T> {
    data: Vec<T>,
    #[serde(default)]
    has_more: bool,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripePrice {
    id: String,
    product: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeItem {
    price: Option<StripePrice>,
    plan: Option<StripePrice>,
    current_period_end: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripeSubscription {
    id: String,
    customer: String,
    status: String,
    created: i64,
    current_period_end: Option<i64>,
    plan: Option<StripePrice>,
    items: Option<StripeList<StripeItem>>,
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, ClientError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| ClientError::Decode(format!("timestamp {secs} out of range")))
}

impl TryFrom<StripeSubscription> for Subscription {
    type Error = ClientError;

    fn try_from(raw: StripeSubscription) -> Result<Self, Self::Error> {
        let first_item = raw.items.as_ref().and_then(|items| items.data.first());

        // Older API versions carry plan and period on the subscription itself
        let plan = raw
            .plan
            .as_ref()
            .or_else(|| first_item.and_then(|item| item.price.as_ref().or(item.plan.as_ref())))
            .ok_or_else(|| ClientError::Decode(format!("subscription {} has no plan", raw.id)))?;
        let period_end = raw
            .current_period_end
            .or_else(|| first_item.and_then(|item| item.current_period_end))
            .ok_or_else(|| {
                ClientError::Decode(format!("subscription {} has no billing period", raw.id))
            })?;

        Ok(Subscription {
            plan_id: plan.id.clone(),
            product_id: plan.product.clone().unwrap_or_default(),
            customer_id: raw.customer,
            provider: "Stripe".to_string(),
            auto_renewal: raw.status == "active",
            created_at: timestamp(raw.created)?,
            expires_at: timestamp(period_end)?,
            id: raw.id,
        })
    }
}

impl StripeClient {
    pub fn new(settings: StripeSettings) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self { http, settings })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.settings.api_base.trim_end_matches('/'), path)
    }

    /// Form fields of a new subscription, with the promotion coupon when the
    /// plan is the promotional one.
    fn subscription_form(&self, customer_id: &str, plan_id: &str) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("customer", customer_id.to_string()),
            ("items[0][plan]", plan_id.to_string()),
        ];
        if let (Some(promo_plan), Some(coupon)) =
            (&self.settings.promo_plan_id, &self.settings.promo_coupon)
        {
            if promo_plan == plan_id {
                form.push(("coupon", coupon.clone()));
            }
        }
        form
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.bearer_auth(&self.settings.secret_key).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = response
            .json::<StripeErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error.message)
            .unwrap_or_else(|| status.to_string());
        warn!(status = status.as_u16(), %message, "Stripe request failed");
        Err(ClientError::Api {
            service: SERVICE,
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl PaymentClient for StripeClient {
    #[instrument(skip(self))]
    async fn create_customer(&self, email: &str) -> Result<String, ClientError> {
        let customer: StripeObject = self
            .send(self.http.post(self.url("customers")).form(&[("email", email)]))
            .await?;
        info!("Created Stripe customer {}", customer.id);
        Ok(customer.id)
    }

    #[instrument(skip(self, source_id))]
    async fn set_payment_card(&self, customer_id: &str, source_id: &str) -> Result<(), ClientError> {
        let _: StripeObject = self
            .send(
                self.http
                    .post(self.url(&format!("customers/{customer_id}")))
                    .form(&[("source", source_id)]),
            )
            .await?;
        debug!("Attached payment source to {}", customer_id);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn create_subscription(
        &self,
        customer_id: &str,
        plan_id: &str,
    ) -> Result<Subscription, ClientError> {
        let form = self.subscription_form(customer_id, plan_id);
        let raw: StripeSubscription = self
            .send(self.http.post(self.url("subscriptions")).form(&form))
            .await?;
        info!("Created Stripe subscription {}", raw.id);
        raw.try_into()
    }

    #[instrument(skip(self))]
    async fn list_subscriptions(&self, customer_id: &str) -> Result<Vec<Subscription>, ClientError> {
        let mut subscriptions = Vec::new();
        let mut starting_after: Option<String> = None;

        loop {
            let mut query = vec![
                ("customer", customer_id.to_string()),
                ("status", "all".to_string()),
                ("limit", PAGE_SIZE.to_string()),
            ];
            if let Some(cursor) = &starting_after {
                query.push(("starting_after", cursor.clone()));
            }

            let page: StripeList<StripeSubscription> = self
                .send(self.http.get(self.url("subscriptions")).query(&query))
                .await?;
            let has_more = page.has_more;
            starting_after = page.data.last().map(|s| s.id.clone());

            for raw in page.data {
                subscriptions.push(Subscription::try_from(raw)?);
            }
            if !has_more || starting_after.is_none() {
                break;
            }
        }

        debug!("Customer {} has {} subscriptions", customer_id, subscriptions.len());
        Ok(subscriptions)
    }

    #[instrument(skip(self))]
    async fn cancel_subscription(&self, subscription_id: &str) -> Result<(), ClientError> {
        let _: StripeObject = self
            .send(
                self.http
                    .delete(self.url(&format!("subscriptions/{subscription_id}"))),
            )
            .await?;
        info!("Canceled Stripe subscription {}", subscription_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(promo: Option<(&str, &str)>) -> StripeClient {
        StripeClient::new(StripeSettings {
            secret_key: "sk_test_123".to_string(),
            api_base: "https://api.stripe.com/".to_string(),
            promo_plan_id: promo.map(|(plan, _)| plan.to_string()),
            promo_coupon: promo.map(|(_, coupon)| coupon.to_string()),
        })
        .unwrap()
    }

    #[test]
    fn test_legacy_subscription_payload() {
        let raw: StripeSubscription = serde_json::from_str(
            r#"{
                "id": "sub_1",
                "object": "subscription",
                "customer": "cus_9",
                "status": "active",
                "created": 1704067200,
                "current_period_end": 1706745600,
                "plan": {"id": "plan_monthly", "product": "prod_vip"}
            }"#,
        )
        .unwrap();

        let subscription = Subscription::try_from(raw).unwrap();
        assert_eq!(subscription.id, "sub_1");
        assert_eq!(subscription.plan_id, "plan_monthly");
        assert_eq!(subscription.product_id, "prod_vip");
        assert_eq!(subscription.customer_id, "cus_9");
        assert!(subscription.auto_renewal);
        assert_eq!(subscription.created_at.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(subscription.expires_at.to_rfc3339(), "2024-02-01T00:00:00+00:00");
    }

    #[test]
    fn test_item_level_plan_and_period() {
        let raw: StripeSubscription = serde_json::from_str(
            r#"{
                "id": "sub_2",
                "customer": "cus_9",
                "status": "canceled",
                "created": 1704067200,
                "items": {
                    "object": "list",
                    "data": [{
                        "id": "si_1",
                        "price": {"id": "price_yearly", "product": "prod_vip"},
                        "current_period_end": 1735689600
                    }],
                    "has_more": false
                }
            }"#,
        )
        .unwrap();

        let subscription = Subscription::try_from(raw).unwrap();
        assert_eq!(subscription.plan_id, "price_yearly");
        assert!(!subscription.auto_renewal);
        assert_eq!(subscription.expires_at.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_subscription_without_plan_is_rejected() {
        let raw: StripeSubscription = serde_json::from_str(
            r#"{"id": "sub_3", "customer": "cus_1", "status": "active", "created": 1704067200}"#,
        )
        .unwrap();
        assert!(matches!(Subscription::try_from(raw), Err(ClientError::Decode(_))));
    }

    #[test]
    fn test_coupon_only_on_promotional_plan() {
        let stripe = client(Some(("plan_promo", "WELCOME50")));
        let promo = stripe.subscription_form("cus_1", "plan_promo");
        assert!(promo.contains(&("coupon", "WELCOME50".to_string())));

        let regular = stripe.subscription_form("cus_1", "plan_monthly");
        assert!(regular.iter().all(|(key, _)| *key != "coupon"));
        assert!(regular.contains(&("items[0][plan]", "plan_monthly".to_string())));

        assert_eq!(stripe.url("subscriptions"), "https://api.stripe.com/v1/subscriptions");
    }
}
