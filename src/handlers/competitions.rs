use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::handlers::sports::SportResponse;
use crate::schemas::{ApiResponse, AppState};
use crate::service::CompetitionView;
use crate::store::NewCompetition;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::competition;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a competition
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateCompetitionRequest {
    /// Sport the competition belongs to
    pub sport_id: i32,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

/// Competition fields without the sport, as embedded in pronostics
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompetitionSummary {
    pub id: i32,
    pub name: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

impl From<competition::Model> for CompetitionSummary {
    fn from(model: competition::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            start_at: model.start_at,
            end_at: model.end_at,
        }
    }
}

/// Competition response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompetitionResponse {
    pub id: i32,
    pub name: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub sport: SportResponse,
}

impl From<CompetitionView> for CompetitionResponse {
    fn from(view: CompetitionView) -> Self {
        Self {
            id: view.competition.id,
            name: view.competition.name,
            start_at: view.competition.start_at,
            end_at: view.competition.end_at,
            sport: SportResponse::from(view.sport),
        }
    }
}

/// Create a competition
#[utoipa::path(
    post,
    path = "/api/v1/competitions",
    tag = "competitions",
    request_body = CreateCompetitionRequest,
    responses(
        (status = 201, description = "Competition created", body = ApiResponse<CompetitionResponse>),
        (status = 400, description = "Invalid request or unknown sport", body = ErrorResponse),
        (status = 403, description = "Administrator rights required", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, admin), fields(admin_id = admin.user.id))]
pub async fn create_competition(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Valid(Json(request)): Valid<Json<CreateCompetitionRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<CompetitionResponse>>), ApiError> {
    trace!("Entering create_competition function");

    let view = state
        .service
        .create_competition(NewCompetition {
            sport_id: request.sport_id,
            name: request.name,
            start_at: request.start_at,
            end_at: request.end_at,
        })
        .await?;

    info!("Competition created with ID: {}", view.competition.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            CompetitionResponse::from(view),
            "Competition created successfully",
        )),
    ))
}

/// List competitions
#[utoipa::path(
    get,
    path = "/api/v1/competitions",
    tag = "competitions",
    responses(
        (status = 200, description = "Competitions retrieved", body = ApiResponse<Vec<CompetitionResponse>>)
    )
)]
#[instrument(skip(state))]
pub async fn get_competitions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CompetitionResponse>>>, ApiError> {
    trace!("Entering get_competitions function");

    let competitions: Vec<CompetitionResponse> = state
        .service
        .list_competitions()
        .await?
        .into_iter()
        .map(CompetitionResponse::from)
        .collect();

    debug!("Returning {} competitions", competitions.len());
    Ok(Json(ApiResponse::new(
        competitions,
        "Competitions retrieved successfully",
    )))
}

/// Get a competition by ID
#[utoipa::path(
    get,
    path = "/api/v1/competitions/{competition_id}",
    tag = "competitions",
    params(
        ("competition_id" = i32, Path, description = "Competition ID")
    ),
    responses(
        (status = 200, description = "Competition retrieved", body = ApiResponse<CompetitionResponse>),
        (status = 404, description = "Competition not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_competition(
    State(state): State<AppState>,
    Path(competition_id): Path<i32>,
) -> Result<Json<ApiResponse<CompetitionResponse>>, ApiError> {
    trace!("Entering get_competition function");
    let view = state.service.get_competition(competition_id).await?;
    Ok(Json(ApiResponse::new(
        CompetitionResponse::from(view),
        "Competition retrieved successfully",
    )))
}

/// Delete a competition
#[utoipa::path(
    delete,
    path = "/api/v1/competitions/{competition_id}",
    tag = "competitions",
    params(
        ("competition_id" = i32, Path, description = "Competition ID")
    ),
    responses(
        (status = 200, description = "Competition deleted", body = ApiResponse<String>),
        (status = 403, description = "Administrator rights required", body = ErrorResponse),
        (status = 404, description = "Competition not found", body = ErrorResponse),
        (status = 409, description = "Competition still referenced", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, admin), fields(admin_id = admin.user.id))]
pub async fn delete_competition(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(competition_id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_competition function");

    state.service.delete_competition(competition_id).await?;

    info!("Competition {} deleted", competition_id);
    Ok(Json(ApiResponse::new(
        format!("Competition {competition_id} deleted"),
        "Competition deleted successfully",
    )))
}
