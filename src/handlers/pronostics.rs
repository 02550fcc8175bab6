use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::handlers::competitions::CompetitionSummary;
use crate::handlers::sports::SportResponse;
use crate::schemas::{ApiResponse, AppState};
use crate::service::PronosticView;
use crate::store::NewPronostic;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::pronostic::PronosticStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Rejects odds below 1.
pub(crate) fn validate_odd(odd: &Decimal) -> Result<(), ValidationError> {
    if *odd < Decimal::ONE {
        return Err(ValidationError::new("odd_below_one"));
    }
    Ok(())
}

/// Request body for adding a pronostic to a ticket
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreatePronosticRequest {
    pub ticket_id: i32,
    pub sport_id: i32,
    /// Must belong to `sport_id`
    pub competition_id: i32,
    #[validate(length(min = 1, max = 100))]
    pub first_team: String,
    #[validate(length(min = 1, max = 100))]
    pub second_team: String,
    /// Predicted outcome, e.g. "PSG wins"
    #[validate(length(min = 1, max = 255))]
    pub pronostic: String,
    #[validate(custom(function = "validate_odd"))]
    #[schema(value_type = String, example = "1.85")]
    pub odd: Decimal,
    /// Defaults to `in_progress`
    #[schema(value_type = Option<String>, example = "in_progress")]
    pub status: Option<PronosticStatus>,
    pub event_date: DateTime<Utc>,
}

/// Request body for settling a pronostic
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdatePronosticRequest {
    /// One of `in_progress`, `win`, `lose`, `canceled`
    #[schema(value_type = String, example = "win")]
    pub status: PronosticStatus,
}

/// Pronostic response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PronosticResponse {
    pub id: i32,
    pub ticket_id: i32,
    pub first_team: String,
    pub second_team: String,
    pub pronostic: String,
    #[schema(value_type = String, example = "1.85")]
    pub odd: Decimal,
    #[schema(value_type = String, example = "in_progress")]
    pub status: PronosticStatus,
    pub event_date: DateTime<Utc>,
    pub sport: SportResponse,
    pub competition: CompetitionSummary,
}

impl From<PronosticView> for PronosticResponse {
    fn from(view: PronosticView) -> Self {
        Self {
            id: view.pronostic.id,
            ticket_id: view.pronostic.ticket_id,
            first_team: view.pronostic.first_team,
            second_team: view.pronostic.second_team,
            pronostic: view.pronostic.pronostic,
            odd: view.pronostic.odd,
            status: view.pronostic.status,
            event_date: view.pronostic.event_date,
            sport: SportResponse::from(view.sport),
            competition: CompetitionSummary::from(view.competition),
        }
    }
}

/// Add a pronostic to a ticket
#[utoipa::path(
    post,
    path = "/api/v1/pronostics",
    tag = "pronostics",
    request_body = CreatePronosticRequest,
    responses(
        (status = 201, description = "Pronostic created", body = ApiResponse<PronosticResponse>),
        (status = 400, description = "Invalid request or unknown reference", body = ErrorResponse),
        (status = 403, description = "Administrator rights required", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, admin), fields(admin_id = admin.user.id))]
pub async fn create_pronostic(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Valid(Json(request)): Valid<Json<CreatePronosticRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<PronosticResponse>>), ApiError> {
    trace!("Entering create_pronostic function");

    let view = state
        .service
        .create_pronostic(NewPronostic {
            ticket_id: request.ticket_id,
            sport_id: request.sport_id,
            competition_id: request.competition_id,
            first_team: request.first_team,
            second_team: request.second_team,
            pronostic: request.pronostic,
            odd: request.odd,
            status: request.status.unwrap_or(PronosticStatus::InProgress),
            event_date: request.event_date,
        })
        .await?;

    info!("Pronostic created with ID: {}", view.pronostic.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            PronosticResponse::from(view),
            "Pronostic created successfully",
        )),
    ))
}

/// List pronostics
#[utoipa::path(
    get,
    path = "/api/v1/pronostics",
    tag = "pronostics",
    responses(
        (status = 200, description = "Pronostics retrieved", body = ApiResponse<Vec<PronosticResponse>>)
    )
)]
#[instrument(skip(state))]
pub async fn get_pronostics(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PronosticResponse>>>, ApiError> {
    trace!("Entering get_pronostics function");

    let pronostics: Vec<PronosticResponse> = state
        .service
        .list_pronostics()
        .await?
        .into_iter()
        .map(PronosticResponse::from)
        .collect();

    debug!("Returning {} pronostics", pronostics.len());
    Ok(Json(ApiResponse::new(
        pronostics,
        "Pronostics retrieved successfully",
    )))
}

/// Get a pronostic by ID
#[utoipa::path(
    get,
    path = "/api/v1/pronostics/{pronostic_id}",
    tag = "pronostics",
    params(
        ("pronostic_id" = i32, Path, description = "Pronostic ID")
    ),
    responses(
        (status = 200, description = "Pronostic retrieved", body = ApiResponse<PronosticResponse>),
        (status = 404, description = "Pronostic not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_pronostic(
    State(state): State<AppState>,
    Path(pronostic_id): Path<i32>,
) -> Result<Json<ApiResponse<PronosticResponse>>, ApiError> {
    trace!("Entering get_pronostic function");
    let view = state.service.get_pronostic(pronostic_id).await?;
    Ok(Json(ApiResponse::new(
        PronosticResponse::from(view),
        "Pronostic retrieved successfully",
    )))
}

/// Update the status of a pronostic
#[utoipa::path(
    put,
    path = "/api/v1/pronostics/{pronostic_id}",
    tag = "pronostics",
    params(
        ("pronostic_id" = i32, Path, description = "Pronostic ID")
    ),
    request_body = UpdatePronosticRequest,
    responses(
        (status = 200, description = "Pronostic updated", body = ApiResponse<PronosticResponse>),
        (status = 403, description = "Administrator rights required", body = ErrorResponse),
        (status = 404, description = "Pronostic not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, admin), fields(admin_id = admin.user.id))]
pub async fn update_pronostic(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(pronostic_id): Path<i32>,
    Json(request): Json<UpdatePronosticRequest>,
) -> Result<Json<ApiResponse<PronosticResponse>>, ApiError> {
    trace!("Entering update_pronostic function");

    let view = state
        .service
        .update_pronostic_status(pronostic_id, request.status)
        .await?;

    info!("Pronostic {} updated", pronostic_id);
    Ok(Json(ApiResponse::new(
        PronosticResponse::from(view),
        "Pronostic updated successfully",
    )))
}

/// Delete a pronostic
#[utoipa::path(
    delete,
    path = "/api/v1/pronostics/{pronostic_id}",
    tag = "pronostics",
    params(
        ("pronostic_id" = i32, Path, description = "Pronostic ID")
    ),
    responses(
        (status = 200, description = "Pronostic deleted", body = ApiResponse<String>),
        (status = 403, description = "Administrator rights required", body = ErrorResponse),
        (status = 404, description = "Pronostic not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, admin), fields(admin_id = admin.user.id))]
pub async fn delete_pronostic(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(pronostic_id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_pronostic function");

    state.service.delete_pronostic(pronostic_id).await?;

    info!("Pronostic {} deleted", pronostic_id);
    Ok(Json(ApiResponse::new(
        format!("Pronostic {pronostic_id} deleted"),
        "Pronostic deleted successfully",
    )))
}
