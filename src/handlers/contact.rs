use crate::clients::ContactMessage;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};
use axum::{extract::State, http::StatusCode, response::Json};
use axum_valid::Valid;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

/// Request body of the contact form
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Address the support team replies to
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 32))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
}

/// Send a message to the support team
#[utoipa::path(
    post,
    path = "/api/v1/contact",
    tag = "contact",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Message sent", body = ApiResponse<String>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Mail delivery failed", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn send_contact(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<ContactRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<String>>), ApiError> {
    trace!("Entering send_contact function");

    state
        .service
        .send_contact(ContactMessage {
            name: request.name,
            email: request.email,
            phone: request.phone,
            message: request.message,
        })
        .await?;

    info!("Contact message forwarded");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "Message sent".to_string(),
            "Contact message sent successfully",
        )),
    ))
}
