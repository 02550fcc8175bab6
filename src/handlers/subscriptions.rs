use crate::auth::CurrentUser;
use crate::clients::Subscription;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for subscribing to a plan
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateSubscriptionRequest {
    /// Plan identifier at the payment processor
    #[validate(length(min = 1))]
    pub plan_id: String,
    /// Tokenized payment source (card) to charge
    #[validate(length(min = 1))]
    pub source_id: String,
}

/// Subscription response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: String,
    pub plan_id: String,
    pub product_id: String,
    pub customer_id: String,
    pub provider: String,
    pub auto_renewal: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            id: subscription.id,
            plan_id: subscription.plan_id,
            product_id: subscription.product_id,
            customer_id: subscription.customer_id,
            provider: subscription.provider,
            auto_renewal: subscription.auto_renewal,
            created_at: subscription.created_at,
            expires_at: subscription.expires_at,
        }
    }
}

/// Subscribe the authenticated user to a plan
#[utoipa::path(
    post,
    path = "/api/v1/subscription",
    tag = "subscriptions",
    request_body = CreateSubscriptionRequest,
    responses(
        (status = 201, description = "Subscription created", body = ApiResponse<SubscriptionResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 500, description = "Payment processor error", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip_all)]
pub async fn create_subscription(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Valid(Json(request)): Valid<Json<CreateSubscriptionRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<SubscriptionResponse>>), ApiError> {
    trace!("Entering create_subscription function");
    debug!("User {} subscribing to plan {}", caller.user.id, request.plan_id);

    let subscription = state
        .service
        .subscription_create(caller.user, &request.plan_id, &request.source_id)
        .await?;

    info!("Subscription {} created", subscription.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            SubscriptionResponse::from(subscription),
            "Subscription created successfully",
        )),
    ))
}

/// List the subscriptions of the authenticated user
#[utoipa::path(
    get,
    path = "/api/v1/users/subscription",
    tag = "subscriptions",
    responses(
        (status = 200, description = "Subscriptions retrieved", body = ApiResponse<Vec<SubscriptionResponse>>),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 500, description = "Payment processor error", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip_all)]
pub async fn get_subscriptions(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<ApiResponse<Vec<SubscriptionResponse>>>, ApiError> {
    trace!("Entering get_subscriptions function");

    let subscriptions: Vec<SubscriptionResponse> = state
        .service
        .subscription_list(&caller.user)
        .await?
        .into_iter()
        .map(SubscriptionResponse::from)
        .collect();

    debug!("Returning {} subscriptions", subscriptions.len());
    Ok(Json(ApiResponse::new(
        subscriptions,
        "Subscriptions retrieved successfully",
    )))
}

/// Cancel one of the authenticated user's subscriptions
#[utoipa::path(
    delete,
    path = "/api/v1/users/subscription/{subscription_id}",
    tag = "subscriptions",
    params(
        ("subscription_id" = String, Path, description = "Subscription ID")
    ),
    responses(
        (status = 200, description = "Subscription canceled", body = ApiResponse<String>),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 404, description = "Subscription not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, caller))]
pub async fn cancel_subscription(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(subscription_id): Path<String>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering cancel_subscription function");

    state
        .service
        .subscription_cancel(&caller.user, &subscription_id)
        .await?;

    info!("Subscription {} canceled", subscription_id);
    Ok(Json(ApiResponse::new(
        format!("Subscription {subscription_id} canceled"),
        "Subscription canceled successfully",
    )))
}
