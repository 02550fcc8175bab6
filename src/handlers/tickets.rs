use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::handlers::pronostics::PronosticResponse;
use crate::schemas::{ApiResponse, AppState};
use crate::service::TicketView;
use crate::store::{NewTicket, TicketChanges};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::pronostic::PronosticStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

fn validate_stake(stake: &Decimal) -> Result<(), ValidationError> {
    if stake.is_sign_negative() || stake.is_zero() {
        return Err(ValidationError::new("stake_not_positive"));
    }
    Ok(())
}

/// Request body for creating a ticket
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateTicketRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(custom(function = "validate_stake"))]
    #[schema(value_type = String, example = "10.00")]
    pub stake: Decimal,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub live: bool,
    /// Risk label, e.g. "low" or "high"
    #[validate(length(min = 1, max = 50))]
    pub risk: String,
    /// Offer the ticket is published under
    #[validate(length(min = 1, max = 50))]
    pub pack: Option<String>,
}

/// Request body for updating a ticket; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateTicketRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(custom(function = "validate_stake"))]
    #[schema(value_type = Option<String>, example = "25.00")]
    pub stake: Option<Decimal>,
    pub public: Option<bool>,
    pub live: Option<bool>,
    #[validate(length(min = 1, max = 50))]
    pub risk: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub pack: Option<String>,
}

/// Query parameters for listing tickets
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct TicketQuery {
    /// Only return tickets of this pack
    pub pack: Option<String>,
}

/// Ticket response model. `odd` and `status` are derived from the pronostics.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TicketResponse {
    pub id: i32,
    pub title: String,
    #[schema(value_type = String, example = "10.00")]
    pub stake: Decimal,
    pub public: bool,
    pub live: bool,
    pub risk: String,
    pub pack: Option<String>,
    /// Product of the non-canceled pronostic odds, two decimals
    #[schema(value_type = String, example = "3.89")]
    pub odd: Decimal,
    #[schema(value_type = String, example = "in_progress")]
    pub status: PronosticStatus,
    pub pronostics: Vec<PronosticResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TicketView> for TicketResponse {
    fn from(view: TicketView) -> Self {
        Self {
            id: view.ticket.id,
            title: view.ticket.title,
            stake: view.ticket.stake,
            public: view.ticket.public,
            live: view.ticket.live,
            risk: view.ticket.risk,
            pack: view.ticket.pack,
            odd: view.aggregate.odd,
            status: view.aggregate.status,
            pronostics: view
                .pronostics
                .into_iter()
                .map(PronosticResponse::from)
                .collect(),
            created_at: view.ticket.created_at,
            updated_at: view.ticket.updated_at,
        }
    }
}

/// Create a ticket
#[utoipa::path(
    post,
    path = "/api/v1/tickets",
    tag = "tickets",
    request_body = CreateTicketRequest,
    responses(
        (status = 201, description = "Ticket created", body = ApiResponse<TicketResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Administrator rights required", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, admin), fields(admin_id = admin.user.id))]
pub async fn create_ticket(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Valid(Json(request)): Valid<Json<CreateTicketRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<TicketResponse>>), ApiError> {
    trace!("Entering create_ticket function");

    let view = state
        .service
        .create_ticket(NewTicket {
            title: request.title,
            stake: request.stake,
            public: request.public,
            live: request.live,
            risk: request.risk,
            pack: request.pack,
        })
        .await?;

    info!("Ticket created with ID: {}", view.ticket.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(TicketResponse::from(view), "Ticket created successfully")),
    ))
}

/// List tickets with their pronostics
#[utoipa::path(
    get,
    path = "/api/v1/tickets",
    tag = "tickets",
    params(TicketQuery),
    responses(
        (status = 200, description = "Tickets retrieved", body = ApiResponse<Vec<TicketResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_tickets(
    State(state): State<AppState>,
    Query(query): Query<TicketQuery>,
) -> Result<Json<ApiResponse<Vec<TicketResponse>>>, ApiError> {
    trace!("Entering get_tickets function");

    let tickets: Vec<TicketResponse> = state
        .service
        .list_tickets(query.pack.as_deref())
        .await?
        .into_iter()
        .map(TicketResponse::from)
        .collect();

    debug!("Returning {} tickets", tickets.len());
    Ok(Json(ApiResponse::new(tickets, "Tickets retrieved successfully")))
}

/// Get a ticket by ID
#[utoipa::path(
    get,
    path = "/api/v1/tickets/{ticket_id}",
    tag = "tickets",
    params(
        ("ticket_id" = i32, Path, description = "Ticket ID")
    ),
    responses(
        (status = 200, description = "Ticket retrieved", body = ApiResponse<TicketResponse>),
        (status = 404, description = "Ticket not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<i32>,
) -> Result<Json<ApiResponse<TicketResponse>>, ApiError> {
    trace!("Entering get_ticket function");
    let view = state.service.get_ticket(ticket_id).await?;
    Ok(Json(ApiResponse::new(
        TicketResponse::from(view),
        "Ticket retrieved successfully",
    )))
}

/// Update a ticket
#[utoipa::path(
    put,
    path = "/api/v1/tickets/{ticket_id}",
    tag = "tickets",
    params(
        ("ticket_id" = i32, Path, description = "Ticket ID")
    ),
    request_body = UpdateTicketRequest,
    responses(
        (status = 200, description = "Ticket updated", body = ApiResponse<TicketResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Administrator rights required", body = ErrorResponse),
        (status = 404, description = "Ticket not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, admin), fields(admin_id = admin.user.id))]
pub async fn update_ticket(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(ticket_id): Path<i32>,
    Valid(Json(request)): Valid<Json<UpdateTicketRequest>>,
) -> Result<Json<ApiResponse<TicketResponse>>, ApiError> {
    trace!("Entering update_ticket function");

    let view = state
        .service
        .update_ticket(
            ticket_id,
            TicketChanges {
                title: request.title,
                stake: request.stake,
                public: request.public,
                live: request.live,
                risk: request.risk,
                pack: request.pack,
            },
        )
        .await?;

    info!("Ticket {} updated", ticket_id);
    Ok(Json(ApiResponse::new(
        TicketResponse::from(view),
        "Ticket updated successfully",
    )))
}

/// Delete a ticket and its pronostics
#[utoipa::path(
    delete,
    path = "/api/v1/tickets/{ticket_id}",
    tag = "tickets",
    params(
        ("ticket_id" = i32, Path, description = "Ticket ID")
    ),
    responses(
        (status = 200, description = "Ticket deleted", body = ApiResponse<String>),
        (status = 403, description = "Administrator rights required", body = ErrorResponse),
        (status = 404, description = "Ticket not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, admin), fields(admin_id = admin.user.id))]
pub async fn delete_ticket(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(ticket_id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_ticket function");

    state.service.delete_ticket(ticket_id).await?;

    info!("Ticket {} deleted", ticket_id);
    Ok(Json(ApiResponse::new(
        format!("Ticket {ticket_id} deleted"),
        "Ticket deleted successfully",
    )))
}
