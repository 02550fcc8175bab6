use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};
use crate::service::Registration;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::user;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a new user
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    /// Email address (must be unique)
    #[validate(email)]
    pub email: String,
    /// Password, at least 8 characters
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub firstname: String,
    #[validate(length(min = 1, max = 100))]
    pub lastname: String,
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(length(min = 1, max = 32))]
    pub phone_number: Option<String>,
}

/// Request body for changing the password of the current user
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

/// Request body for changing the email of the current user
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct ChangeEmailRequest {
    /// Current password, required to confirm the change
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(email)]
    pub email: String,
}

/// User response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub phone_number: Option<String>,
    pub admin: bool,
    /// Whether a billing customer exists for the user
    pub has_customer: bool,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            firstname: model.firstname,
            lastname: model.lastname,
            username: model.username,
            phone_number: model.phone_number,
            admin: model.admin,
            has_customer: model.customer_id.is_some(),
            created_at: model.created_at,
            confirmed_at: model.confirmed_at,
        }
    }
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn create_user(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateUserRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    trace!("Entering create_user function");

    let user = state
        .service
        .create_user(Registration {
            email: request.email,
            password: request.password,
            firstname: request.firstname,
            lastname: request.lastname,
            username: request.username,
            phone_number: request.phone_number,
        })
        .await?;

    info!("User created successfully with ID: {}", user.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(UserResponse::from(user), "User created successfully")),
    ))
}

/// Get all users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, _caller))]
pub async fn get_users(
    State(state): State<AppState>,
    _caller: CurrentUser,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    trace!("Entering get_users function");

    let users: Vec<UserResponse> = state
        .service
        .list_users()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    debug!("Returning {} users", users.len());
    Ok(Json(ApiResponse::new(users, "Users retrieved successfully")))
}

/// Get the authenticated user
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserResponse>),
        (status = 401, description = "Authentication required", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip_all)]
pub async fn get_current_user(
    CurrentUser(caller): CurrentUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    trace!("Entering get_current_user function");
    Ok(Json(ApiResponse::new(
        UserResponse::from(caller.user),
        "User retrieved successfully",
    )))
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserResponse>),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, _caller))]
pub async fn get_user(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    trace!("Entering get_user function");

    let user = state.service.get_user(user_id).await?;
    debug!("Found user {}", user.id);
    Ok(Json(ApiResponse::new(
        UserResponse::from(user),
        "User retrieved successfully",
    )))
}

/// Change the password of the authenticated user
#[utoipa::path(
    post,
    path = "/api/v1/users/change_password",
    tag = "users",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not authenticated or wrong current password", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip_all)]
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Valid(Json(request)): Valid<Json<ChangePasswordRequest>>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    trace!("Entering change_password function");

    let user = state
        .service
        .change_password(caller.user, &request.current_password, &request.new_password)
        .await?;

    info!("Password changed for user {}", user.id);
    Ok(Json(ApiResponse::new(
        UserResponse::from(user),
        "Password changed successfully",
    )))
}

/// Change the email of the authenticated user
#[utoipa::path(
    post,
    path = "/api/v1/users/change_email",
    tag = "users",
    request_body = ChangeEmailRequest,
    responses(
        (status = 200, description = "Email changed", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not authenticated or wrong password", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip_all)]
pub async fn change_email(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Valid(Json(request)): Valid<Json<ChangeEmailRequest>>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    trace!("Entering change_email function");

    let user = state
        .service
        .change_email(caller.user, &request.password, &request.email)
        .await?;

    info!("Email changed for user {}", user.id);
    Ok(Json(ApiResponse::new(
        UserResponse::from(user),
        "Email changed successfully",
    )))
}

/// Delete the authenticated user (soft delete)
#[utoipa::path(
    delete,
    path = "/api/v1/users/me",
    tag = "users",
    responses(
        (status = 200, description = "User deleted successfully", body = ApiResponse<String>),
        (status = 401, description = "Authentication required", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip_all)]
pub async fn delete_current_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_current_user function");

    let user_id = caller.user.id;
    state.service.delete_user(caller.user).await?;

    info!("User {} deleted", user_id);
    Ok(Json(ApiResponse::new(
        format!("User {user_id} deleted"),
        "User deleted successfully",
    )))
}
