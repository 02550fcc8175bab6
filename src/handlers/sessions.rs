use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::handlers::users::UserResponse;
use crate::schemas::{ApiResponse, AppState};
use axum::{extract::State, http::StatusCode, response::Json};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

/// Credentials for opening a session
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// An opened session
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    /// Bearer token to send in the `Authorization` header
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

/// Log in
#[utoipa::path(
    post,
    path = "/api/v1/login",
    tag = "sessions",
    request_body = LoginRequest,
    responses(
        (status = 201, description = "Session created", body = ApiResponse<SessionResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<LoginRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<SessionResponse>>), ApiError> {
    trace!("Entering login function");

    let (session, user) = state
        .service
        .create_session(&request.email, &request.password)
        .await?;

    info!("User {} logged in", user.id);
    let response = SessionResponse {
        access_token: session.id,
        expires_at: session.expires_at,
        user: UserResponse::from(user),
    };
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(response, "Session created successfully")),
    ))
}

/// Log out, closing the session used for this request
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    tag = "sessions",
    responses(
        (status = 204, description = "Session closed"),
        (status = 401, description = "Authentication required", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<StatusCode, ApiError> {
    trace!("Entering logout function");
    state.service.remove_session(&caller.session).await?;
    Ok(StatusCode::NO_CONTENT)
}
