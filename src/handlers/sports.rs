use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::sport;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a sport
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateSportRequest {
    /// Sport name (must be unique)
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// Sport response model
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SportResponse {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<sport::Model> for SportResponse {
    fn from(model: sport::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at,
        }
    }
}

/// Create a sport
#[utoipa::path(
    post,
    path = "/api/v1/sports",
    tag = "sports",
    request_body = CreateSportRequest,
    responses(
        (status = 201, description = "Sport created", body = ApiResponse<SportResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Administrator rights required", body = ErrorResponse),
        (status = 409, description = "Sport already exists", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, admin), fields(admin_id = admin.user.id))]
pub async fn create_sport(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Valid(Json(request)): Valid<Json<CreateSportRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<SportResponse>>), ApiError> {
    trace!("Entering create_sport function");

    let sport = state.service.create_sport(&request.name).await?;

    info!("Sport created with ID: {}", sport.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(SportResponse::from(sport), "Sport created successfully")),
    ))
}

/// List sports
#[utoipa::path(
    get,
    path = "/api/v1/sports",
    tag = "sports",
    responses(
        (status = 200, description = "Sports retrieved", body = ApiResponse<Vec<SportResponse>>)
    )
)]
#[instrument(skip(state))]
pub async fn get_sports(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SportResponse>>>, ApiError> {
    trace!("Entering get_sports function");

    let sports: Vec<SportResponse> = state
        .service
        .list_sports()
        .await?
        .into_iter()
        .map(SportResponse::from)
        .collect();

    debug!("Returning {} sports", sports.len());
    Ok(Json(ApiResponse::new(sports, "Sports retrieved successfully")))
}

/// Get a sport by ID
#[utoipa::path(
    get,
    path = "/api/v1/sports/{sport_id}",
    tag = "sports",
    params(
        ("sport_id" = i32, Path, description = "Sport ID")
    ),
    responses(
        (status = 200, description = "Sport retrieved", body = ApiResponse<SportResponse>),
        (status = 404, description = "Sport not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_sport(
    State(state): State<AppState>,
    Path(sport_id): Path<i32>,
) -> Result<Json<ApiResponse<SportResponse>>, ApiError> {
    trace!("Entering get_sport function");
    let sport = state.service.get_sport(sport_id).await?;
    Ok(Json(ApiResponse::new(
        SportResponse::from(sport),
        "Sport retrieved successfully",
    )))
}

/// Delete a sport
#[utoipa::path(
    delete,
    path = "/api/v1/sports/{sport_id}",
    tag = "sports",
    params(
        ("sport_id" = i32, Path, description = "Sport ID")
    ),
    responses(
        (status = 200, description = "Sport deleted", body = ApiResponse<String>),
        (status = 403, description = "Administrator rights required", body = ErrorResponse),
        (status = 404, description = "Sport not found", body = ErrorResponse),
        (status = 409, description = "Sport still referenced", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, admin), fields(admin_id = admin.user.id))]
pub async fn delete_sport(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(sport_id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_sport function");

    state.service.delete_sport(sport_id).await?;

    info!("Sport {} deleted", sport_id);
    Ok(Json(ApiResponse::new(
        format!("Sport {sport_id} deleted"),
        "Sport deleted successfully",
    )))
}
