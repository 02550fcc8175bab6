use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi, ToSchema,
};

use crate::handlers::{
    competitions::{CompetitionResponse, CompetitionSummary, CreateCompetitionRequest},
    contact::ContactRequest,
    pronostics::{CreatePronosticRequest, PronosticResponse, UpdatePronosticRequest},
    sessions::{LoginRequest, SessionResponse},
    sports::{CreateSportRequest, SportResponse},
    subscriptions::{CreateSubscriptionRequest, SubscriptionResponse},
    tickets::{CreateTicketRequest, TicketQuery, TicketResponse, UpdateTicketRequest},
    users::{ChangeEmailRequest, ChangePasswordRequest, CreateUserRequest, UserResponse},
};
use crate::service::ApiService;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Business operations over the stores and external clients
    pub service: ApiService,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Registers the `bearer` scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::create_user,
        crate::handlers::users::get_users,
        crate::handlers::users::get_current_user,
        crate::handlers::users::get_user,
        crate::handlers::users::change_password,
        crate::handlers::users::change_email,
        crate::handlers::users::delete_current_user,
        crate::handlers::sessions::login,
        crate::handlers::sessions::logout,
        crate::handlers::subscriptions::create_subscription,
        crate::handlers::subscriptions::get_subscriptions,
        crate::handlers::subscriptions::cancel_subscription,
        crate::handlers::tickets::create_ticket,
        crate::handlers::tickets::get_tickets,
        crate::handlers::tickets::get_ticket,
        crate::handlers::tickets::update_ticket,
        crate::handlers::tickets::delete_ticket,
        crate::handlers::pronostics::create_pronostic,
        crate::handlers::pronostics::get_pronostics,
        crate::handlers::pronostics::get_pronostic,
        crate::handlers::pronostics::update_pronostic,
        crate::handlers::pronostics::delete_pronostic,
        crate::handlers::sports::create_sport,
        crate::handlers::sports::get_sports,
        crate::handlers::sports::get_sport,
        crate::handlers::sports::delete_sport,
        crate::handlers::competitions::create_competition,
        crate::handlers::competitions::get_competitions,
        crate::handlers::competitions::get_competition,
        crate::handlers::competitions::delete_competition,
        crate::handlers::contact::send_contact,
    ),
    components(
        schemas(
            ApiResponse<String>,
            ApiResponse<UserResponse>,
            ApiResponse<Vec<UserResponse>>,
            ApiResponse<SessionResponse>,
            ApiResponse<SubscriptionResponse>,
            ApiResponse<Vec<SubscriptionResponse>>,
            ApiResponse<TicketResponse>,
            ApiResponse<Vec<TicketResponse>>,
            ApiResponse<PronosticResponse>,
            ApiResponse<Vec<PronosticResponse>>,
            ApiResponse<SportResponse>,
            ApiResponse<Vec<SportResponse>>,
            ApiResponse<CompetitionResponse>,
            ApiResponse<Vec<CompetitionResponse>>,
            ErrorResponse,
            HealthResponse,
            CreateUserRequest,
            ChangePasswordRequest,
            ChangeEmailRequest,
            UserResponse,
            LoginRequest,
            SessionResponse,
            CreateSubscriptionRequest,
            SubscriptionResponse,
            CreateTicketRequest,
            UpdateTicketRequest,
            TicketQuery,
            TicketResponse,
            CreatePronosticRequest,
            UpdatePronosticRequest,
            PronosticResponse,
            CreateSportRequest,
            SportResponse,
            CreateCompetitionRequest,
            CompetitionSummary,
            CompetitionResponse,
            ContactRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User accounts"),
        (name = "sessions", description = "Login and logout"),
        (name = "subscriptions", description = "Paid subscriptions"),
        (name = "tickets", description = "Betting tickets with their derived odd and status"),
        (name = "pronostics", description = "Individual predictions of a ticket"),
        (name = "sports", description = "Sports catalog"),
        (name = "competitions", description = "Competitions catalog"),
        (name = "contact", description = "Support contact form"),
    ),
    info(
        title = "Pronostics API",
        description = "Sports prediction tickets, user accounts and subscriptions",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
